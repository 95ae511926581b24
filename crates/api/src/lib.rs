//! HTTP API server with observability for the storefront checkout core.
//!
//! Provides REST endpoints for product and address administration, cart
//! mutation, and order placement, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post, put};
use checkout::CheckoutEngine;
use domain::CartService;
use inventory::InMemoryInventoryLedger;
use metrics_exporter_prometheus::PrometheusHandle;
use store::{InMemoryAddressBook, InMemoryCartStore, InMemoryCatalog, InMemoryOrderStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", post(routes::products::register))
        .route("/products/{id}", get(routes::products::get))
        .route("/products/{id}/price", put(routes::products::update_price))
        .route("/addresses", post(routes::addresses::create))
        .route("/addresses/{id}", get(routes::addresses::get))
        .route("/carts/{email}", get(routes::carts::get))
        .route("/carts/{email}/items", post(routes::carts::add_item))
        .route(
            "/carts/{email}/items/{product_id}",
            patch(routes::carts::update_item_quantity).delete(routes::carts::remove_item),
        )
        .route("/orders", post(routes::orders::place))
        .route("/orders/{id}", get(routes::orders::get))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over shared in-memory stores.
pub fn create_default_state() -> Arc<AppState> {
    let catalog = InMemoryCatalog::new();
    let addresses = InMemoryAddressBook::new();
    let carts = InMemoryCartStore::new();
    let orders = InMemoryOrderStore::new();
    let ledger = InMemoryInventoryLedger::new();

    let cart_service = CartService::new(catalog.clone(), carts.clone(), ledger.clone());
    let checkout_engine = CheckoutEngine::new(
        addresses.clone(),
        carts.clone(),
        orders.clone(),
        ledger.clone(),
    );

    Arc::new(AppState {
        catalog,
        addresses,
        orders,
        ledger,
        cart_service,
        checkout_engine,
    })
}
