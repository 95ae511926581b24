//! Inventory ledger for the storefront core.
//!
//! Tracks per-product available quantity and exposes reserve/release
//! operations. Concurrent reservations against the same product are
//! serialized so that two checkouts racing for the last unit cannot
//! both succeed; multi-line reservation is all-or-nothing.

pub mod error;
pub mod ledger;

pub use error::InventoryError;
pub use ledger::{InMemoryInventoryLedger, InventoryLedger, StockReservation};
