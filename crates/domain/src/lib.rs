//! Domain layer for the storefront core.
//!
//! This crate provides:
//! - the Pricing Policy ([`pricing::special_price`])
//! - the [`Cart`] aggregate and [`CartService`] orchestration
//! - immutable [`Order`]/[`Payment`]/[`OrderLineItem`] snapshots
//! - collaborator contracts ([`Catalog`], [`AddressBook`],
//!   [`CartStore`], [`OrderStore`]) consumed by the core

pub mod address;
pub mod cart;
pub mod collaborators;
pub mod error;
pub mod order;
pub mod pricing;
pub mod product;

pub use address::Address;
pub use cart::{Cart, CartError, CartLineItem, CartService};
pub use collaborators::{AddressBook, Catalog, CartStore, OrderStore, StoreError};
pub use error::DomainError;
pub use order::{Order, OrderLineItem, OrderStatus, Payment};
pub use product::{DELETED_PRODUCT_PLACEHOLDER, Product};
