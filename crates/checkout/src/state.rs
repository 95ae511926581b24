//! Checkout state machine.

use serde::{Deserialize, Serialize};

/// The state of one checkout attempt.
///
/// State transitions:
/// ```text
/// Started ──► AddressResolved ──► OrderCreated ──► PaymentRecorded
///    │              │                  │                │
///    │              ▼                  ▼                ▼
///    └──────────► Failed ◄── InventoryReserved ──► CartCleared ──► Complete
/// ```
/// `Failed` is reachable from every non-`Complete` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutState {
    /// Attempt created, nothing validated yet.
    #[default]
    Started,

    /// Cart and shipping address resolved.
    AddressResolved,

    /// Order snapshot assembled from the cart.
    OrderCreated,

    /// Order, payment, and line items persisted.
    PaymentRecorded,

    /// Inventory decremented for every line.
    InventoryReserved,

    /// Cart emptied and saved.
    CartCleared,

    /// Checkout finished successfully (terminal state).
    Complete,

    /// Attempt failed; completed steps have been compensated
    /// (terminal state).
    Failed,
}

impl CheckoutState {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::Complete | CheckoutState::Failed)
    }

    /// Returns true if the attempt can still fail over to `Failed`.
    pub fn can_fail(&self) -> bool {
        !matches!(self, CheckoutState::Complete | CheckoutState::Failed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Started => "Started",
            CheckoutState::AddressResolved => "AddressResolved",
            CheckoutState::OrderCreated => "OrderCreated",
            CheckoutState::PaymentRecorded => "PaymentRecorded",
            CheckoutState::InventoryReserved => "InventoryReserved",
            CheckoutState::CartCleared => "CartCleared",
            CheckoutState::Complete => "Complete",
            CheckoutState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
