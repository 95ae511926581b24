//! Collaborator contracts consumed by the core.
//!
//! The catalog, address book, and persistence layer are external
//! systems; the core only sees these traits. In-memory implementations
//! live in the `store` crate.

use async_trait::async_trait;
use common::{AddressId, CustomerEmail, OrderId, ProductId};
use thiserror::Error;

use crate::address::Address;
use crate::cart::Cart;
use crate::order::Order;
use crate::product::Product;

/// Errors surfaced by collaborator implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not complete the operation.
    #[error("store unavailable during {operation}: {reason}")]
    Unavailable {
        operation: &'static str,
        reason: String,
    },

    /// A conditional save lost the race against a concurrent writer.
    /// The expected version did not match the stored version.
    #[error("version conflict for cart of {customer}: expected {expected}, found {actual}")]
    VersionConflict {
        customer: CustomerEmail,
        expected: u64,
        actual: u64,
    },
}

/// Result type for collaborator operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Product lookup.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Looks up a product by ID.
    async fn get_product(&self, product_id: &ProductId) -> Result<Option<Product>>;

    /// Looks up a product by exact name. Used to reject duplicate
    /// product names at registration time.
    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>>;
}

/// Shipping address lookup.
#[async_trait]
pub trait AddressBook: Send + Sync {
    /// Looks up an address by ID.
    async fn get_address(&self, address_id: AddressId) -> Result<Option<Address>>;
}

/// Durable cart storage, keyed by customer.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Returns the customer's cart, if one exists.
    async fn find_by_customer(&self, customer: &CustomerEmail) -> Result<Option<Cart>>;

    /// Returns every cart holding a line item for the product.
    ///
    /// Used to propagate product price changes to open carts.
    async fn carts_with_product(&self, product_id: &ProductId) -> Result<Vec<Cart>>;

    /// Persists the cart, conditional on its version.
    ///
    /// The save succeeds only when the cart's version is exactly one
    /// ahead of the stored revision (zero for a cart not yet stored);
    /// otherwise it fails with [`StoreError::VersionConflict`] and the
    /// stored cart is untouched. Callers load, mutate, call
    /// [`Cart::bump_version`] once, save, and retry from a fresh load
    /// on conflict, so concurrent writers to the same cart serialize
    /// instead of losing updates.
    async fn save(&self, cart: &Cart) -> Result<()>;
}

/// Durable order storage. Orders persist together with their payment
/// and line items.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a newly placed order.
    async fn insert(&self, order: &Order) -> Result<()>;

    /// Looks up an order by ID.
    async fn get(&self, order_id: OrderId) -> Result<Option<Order>>;

    /// Removes an order. Used by checkout rollback.
    async fn delete(&self, order_id: OrderId) -> Result<()>;
}
