//! Shared types for the storefront core.
//!
//! Identifier newtypes and the [`Money`] value type used across the
//! inventory, domain, checkout, and API crates.

mod types;

pub use types::{AddressId, CartId, CustomerEmail, Money, OrderId, ProductId};
