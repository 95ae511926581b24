//! Checkout engine for the storefront core.
//!
//! Converts a customer's mutable cart into an immutable order as one
//! unit of work:
//! 1. Validate cart, address, and non-emptiness (safe to retry).
//! 2. Persist the order snapshot with its payment and frozen lines.
//! 3. Reserve inventory for every line, all-or-nothing.
//! 4. Clear the cart.
//!
//! If any step fails after the order is persisted, previously completed
//! steps are compensated in reverse order, so the customer is never
//! charged without inventory being reserved and inventory is never
//! reserved without an order existing.

pub mod attempt;
pub mod engine;
pub mod error;
pub mod state;
pub mod steps;

pub use attempt::CheckoutAttempt;
pub use engine::{CheckoutEngine, PlaceOrder, PlacedOrder};
pub use error::CheckoutError;
pub use state::CheckoutState;
