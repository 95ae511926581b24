//! Route handlers and shared application state.

pub mod addresses;
pub mod carts;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;

use checkout::CheckoutEngine;
use domain::CartService;
use inventory::InMemoryInventoryLedger;
use store::{InMemoryAddressBook, InMemoryCartStore, InMemoryCatalog, InMemoryOrderStore};

/// Shared application state accessible from all handlers.
///
/// The stores are `Clone` over shared interior state, so the services
/// and the raw handles here all see the same data.
pub struct AppState {
    pub catalog: InMemoryCatalog,
    pub addresses: InMemoryAddressBook,
    pub orders: InMemoryOrderStore,
    pub ledger: InMemoryInventoryLedger,
    pub cart_service: CartService<InMemoryCatalog, InMemoryCartStore, InMemoryInventoryLedger>,
    pub checkout_engine: CheckoutEngine<
        InMemoryAddressBook,
        InMemoryCartStore,
        InMemoryOrderStore,
        InMemoryInventoryLedger,
    >,
}
