//! Cart mutation and retrieval endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::{CustomerEmail, ProductId};
use domain::Cart;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub delta: i64,
}

// -- Response types --

#[derive(Serialize)]
pub struct CartResponse {
    pub id: String,
    pub customer: String,
    pub items: Vec<CartItemResponse>,
    pub total_cents: i64,
}

#[derive(Serialize)]
pub struct CartItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub discount_percent: u32,
    pub line_total_cents: i64,
}

fn cart_response(cart: &Cart) -> CartResponse {
    let mut items: Vec<CartItemResponse> = cart
        .lines()
        .map(|line| CartItemResponse {
            product_id: line.product_id.to_string(),
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            unit_price_cents: line.unit_price.cents(),
            discount_percent: line.discount_percent,
            line_total_cents: line.line_total().cents(),
        })
        .collect();
    items.sort_by(|a, b| a.product_id.cmp(&b.product_id));

    CartResponse {
        id: cart.id().to_string(),
        customer: cart.customer().to_string(),
        items,
        total_cents: cart.total().cents(),
    }
}

// -- Handlers --

/// POST /carts/:email/items — add a product to the customer's cart.
#[tracing::instrument(skip(state, req))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<(axum::http::StatusCode, Json<CartResponse>), ApiError> {
    let customer = CustomerEmail::new(email);
    let product_id = ProductId::new(req.product_id);

    let cart = state
        .cart_service
        .add_item(&customer, &product_id, req.quantity)
        .await?;

    Ok((axum::http::StatusCode::CREATED, Json(cart_response(&cart))))
}

/// PATCH /carts/:email/items/:product_id — adjust a line's quantity by
/// a signed delta.
#[tracing::instrument(skip(state, req))]
pub async fn update_item_quantity(
    State(state): State<Arc<AppState>>,
    Path((email, product_id)): Path<(String, String)>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let customer = CustomerEmail::new(email);
    let product_id = ProductId::new(product_id);

    let cart = state
        .cart_service
        .update_item_quantity(&customer, &product_id, req.delta)
        .await?;

    Ok(Json(cart_response(&cart)))
}

/// DELETE /carts/:email/items/:product_id — remove a line item.
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((email, product_id)): Path<(String, String)>,
) -> Result<Json<CartResponse>, ApiError> {
    let customer = CustomerEmail::new(email);
    let product_id = ProductId::new(product_id);

    let cart = state
        .cart_service
        .remove_item(&customer, &product_id)
        .await?;

    Ok(Json(cart_response(&cart)))
}

/// GET /carts/:email — the customer's cart.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let customer = CustomerEmail::new(email);
    let cart = state.cart_service.get_cart(&customer).await?;

    Ok(Json(cart_response(&cart)))
}
