//! Inventory error types.

use common::ProductId;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Available quantity cannot cover the requested quantity.
    #[error(
        "Insufficient stock for {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The product has no stock record in the ledger.
    #[error("Product not tracked in inventory: {0}")]
    ProductNotTracked(ProductId),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
