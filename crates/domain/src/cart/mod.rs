//! Cart aggregate and orchestration service.

mod aggregate;
mod service;

pub use aggregate::{Cart, CartLineItem};
pub use service::CartService;

use common::ProductId;
use thiserror::Error;

/// Errors raised by cart aggregate mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product already has a line item in this cart.
    #[error("Product {product_id} already exists in the cart")]
    DuplicateItem { product_id: ProductId },

    /// No line item exists for the product.
    #[error("Item not found in cart: {product_id}")]
    ItemNotFound { product_id: ProductId },

    /// Quantity must resolve to a positive number of units.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: i64 },
}
