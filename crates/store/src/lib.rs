//! In-memory implementations of the collaborator contracts.
//!
//! Each implementation is `Clone` over shared interior state, so a
//! handle can be kept for seeding and inspection while another is
//! handed to a service. The cart and order stores expose
//! failure-injection switches used by checkout rollback tests.

mod address_book;
mod cart_store;
mod catalog;
mod order_store;

pub use address_book::InMemoryAddressBook;
pub use cart_store::InMemoryCartStore;
pub use catalog::InMemoryCatalog;
pub use order_store::InMemoryOrderStore;
