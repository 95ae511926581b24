//! Order placement and retrieval endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use checkout::PlaceOrder;
use common::{CustomerEmail, OrderId};
use domain::Order;
use domain::collaborators::OrderStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::AppState;
use crate::routes::addresses::AddressResponse;

// -- Request types --

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    pub customer: String,
    pub address_id: String,
    pub payment: PaymentRequest,
}

#[derive(Deserialize)]
pub struct PaymentRequest {
    pub method: String,
    pub gateway_payment_id: String,
    pub gateway_status: String,
    pub gateway_message: String,
    pub gateway_name: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub customer: String,
    pub order_date: String,
    pub status: String,
    pub total_cents: i64,
    pub shipping_address: AddressResponse,
    pub items: Vec<OrderItemResponse>,
    pub payment: PaymentResponse,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub discount_percent: u32,
    pub ordered_price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Serialize)]
pub struct PaymentResponse {
    pub method: String,
    pub gateway_payment_id: String,
    pub gateway_status: String,
    pub gateway_name: String,
}

fn order_response(order: &Order) -> OrderResponse {
    let items = order
        .items
        .iter()
        .map(|line| OrderItemResponse {
            product_id: line.product_id.to_string(),
            product_name: line.display_name().to_string(),
            quantity: line.quantity,
            discount_percent: line.discount_percent,
            ordered_price_cents: line.ordered_price.cents(),
            line_total_cents: line.line_total().cents(),
        })
        .collect();

    OrderResponse {
        id: order.id.to_string(),
        customer: order.customer.to_string(),
        order_date: order.order_date.to_string(),
        status: order.status.to_string(),
        total_cents: order.total.cents(),
        shipping_address: AddressResponse {
            id: order.shipping_address.id.to_string(),
            street: order.shipping_address.street.clone(),
            building: order.shipping_address.building.clone(),
            city: order.shipping_address.city.clone(),
            state: order.shipping_address.state.clone(),
            country: order.shipping_address.country.clone(),
            postal_code: order.shipping_address.postal_code.clone(),
        },
        items,
        payment: PaymentResponse {
            method: order.payment.method.clone(),
            gateway_payment_id: order.payment.gateway_payment_id.clone(),
            gateway_status: order.payment.gateway_status.clone(),
            gateway_name: order.payment.gateway_name.clone(),
        },
    }
}

// -- Handlers --

/// POST /orders — place an order from the customer's cart.
#[tracing::instrument(skip(state, req), fields(customer = %req.customer))]
pub async fn place(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<OrderResponse>), ApiError> {
    let address_id = crate::routes::addresses::parse_address_id(&req.address_id)?;

    let cmd = PlaceOrder {
        customer: CustomerEmail::new(req.customer),
        address_id,
        payment_method: req.payment.method,
        gateway_payment_id: req.payment.gateway_payment_id,
        gateway_status: req.payment.gateway_status,
        gateway_message: req.payment.gateway_message,
        gateway_name: req.payment.gateway_name,
    };

    let placed = state.checkout_engine.place_order(cmd).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(order_response(&placed.order)),
    ))
}

/// GET /orders/:id — look up a placed order.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .orders
        .get(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(order_response(&order)))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order ID: {e}")))?;
    Ok(OrderId::from(uuid))
}
