//! Domain error types.

use common::{CustomerEmail, ProductId};
use inventory::InventoryError;
use thiserror::Error;

use crate::cart::CartError;
use crate::collaborators::StoreError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A cart aggregate invariant was violated.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// No cart exists for the customer.
    #[error("Cart not found for customer {customer}")]
    CartNotFound { customer: CustomerEmail },

    /// The product does not exist in the catalog.
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: ProductId },

    /// The product has no available stock at all.
    #[error("Product {product_id} is out of stock")]
    OutOfStock { product_id: ProductId },

    /// Available stock cannot cover the requested quantity.
    #[error(
        "Insufficient stock for {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// A ledger operation failed.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// A collaborator store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
