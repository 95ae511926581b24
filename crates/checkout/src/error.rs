//! Checkout error types.

use common::{AddressId, CustomerEmail, ProductId};
use domain::StoreError;
use inventory::InventoryError;
use thiserror::Error;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No cart exists for the customer.
    #[error("Cart not found for customer {customer}")]
    CartNotFound { customer: CustomerEmail },

    /// The shipping address does not exist.
    #[error("Address not found: {address_id}")]
    AddressNotFound { address_id: AddressId },

    /// The cart exists but has no line items.
    #[error("Cart is empty for customer {customer}")]
    EmptyCart { customer: CustomerEmail },

    /// A concurrent checkout won the race for the remaining stock.
    #[error(
        "Insufficient stock for {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// A ledger operation failed for a reason other than stock cover.
    #[error("Inventory error: {0}")]
    Inventory(InventoryError),

    /// A collaborator store failed before any side effect needed
    /// compensation.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Compensation of a completed step failed; the checkout may have
    /// left partial state behind. Not safe to retry blindly.
    #[error("Rollback of step '{step}' failed: {reason}")]
    RollbackFailed { step: String, reason: String },
}

impl CheckoutError {
    /// Fatal errors must not be retried blindly; everything else left
    /// no partial state behind and is safe to retry or correct.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CheckoutError::RollbackFailed { .. })
    }
}

impl From<InventoryError> for CheckoutError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InsufficientStock {
                product_id,
                requested,
                available,
            } => CheckoutError::InsufficientStock {
                product_id,
                requested,
                available,
            },
            other => CheckoutError::Inventory(other),
        }
    }
}

/// Result type for checkout operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;
