//! Product registration and pricing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::{Money, ProductId};
use domain::Product;
use domain::collaborators::Catalog;
use inventory::InventoryLedger;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct RegisterProductRequest {
    pub id: String,
    pub name: String,
    pub list_price_cents: i64,
    pub discount_percent: u32,
    pub available_quantity: u32,
}

#[derive(Deserialize)]
pub struct UpdatePriceRequest {
    pub list_price_cents: i64,
    pub discount_percent: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub list_price_cents: i64,
    pub special_price_cents: i64,
    pub discount_percent: u32,
    pub available_quantity: u32,
}

#[derive(Serialize)]
pub struct PriceUpdatedResponse {
    pub product: ProductResponse,
    pub carts_refreshed: usize,
}

fn product_response(product: &Product, available_quantity: u32) -> ProductResponse {
    ProductResponse {
        id: product.id.to_string(),
        name: product.name.clone(),
        list_price_cents: product.list_price.cents(),
        special_price_cents: product.special_price().cents(),
        discount_percent: product.discount_percent,
        available_quantity,
    }
}

// -- Handlers --

/// POST /products — register a product and seed its stock.
#[tracing::instrument(skip(state, req), fields(product_id = %req.id))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterProductRequest>,
) -> Result<(axum::http::StatusCode, Json<ProductResponse>), ApiError> {
    if state
        .catalog
        .find_product_by_name(&req.name)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(format!(
            "Product with name '{}' already exists",
            req.name
        )));
    }

    let product = Product::new(
        req.id.as_str(),
        req.name.as_str(),
        Money::from_cents(req.list_price_cents),
        req.discount_percent,
    );
    state.catalog.put_product(product.clone()).await;
    state
        .ledger
        .set_stock(product.id.clone(), req.available_quantity)
        .await;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(product_response(&product, req.available_quantity)),
    ))
}

/// GET /products/:id — product with live availability.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id = ProductId::new(id.as_str());
    let product = state
        .catalog
        .get_product(&product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;

    let available = state.ledger.available(&product_id).await?;

    Ok(Json(product_response(&product, available)))
}

/// PUT /products/:id/price — reprice a product and propagate the change
/// to every open cart holding it.
#[tracing::instrument(skip(state, req))]
pub async fn update_price(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePriceRequest>,
) -> Result<Json<PriceUpdatedResponse>, ApiError> {
    let product_id = ProductId::new(id.as_str());
    let mut product = state
        .catalog
        .get_product(&product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;

    product.list_price = Money::from_cents(req.list_price_cents);
    product.discount_percent = req.discount_percent;
    state.catalog.put_product(product.clone()).await;

    let carts_refreshed = state
        .cart_service
        .sync_price_on_product_change(&product_id)
        .await?;

    let available = state.ledger.available(&product_id).await?;

    Ok(Json(PriceUpdatedResponse {
        product: product_response(&product, available),
        carts_refreshed,
    }))
}
