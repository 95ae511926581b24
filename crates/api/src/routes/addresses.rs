//! Shipping address endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::AddressId;
use domain::Address;
use domain::collaborators::AddressBook;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Deserialize)]
pub struct CreateAddressRequest {
    pub street: String,
    pub building: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

#[derive(Serialize)]
pub struct AddressResponse {
    pub id: String,
    pub street: String,
    pub building: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

fn address_response(address: &Address) -> AddressResponse {
    AddressResponse {
        id: address.id.to_string(),
        street: address.street.clone(),
        building: address.building.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        country: address.country.clone(),
        postal_code: address.postal_code.clone(),
    }
}

/// POST /addresses — store a shipping address.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAddressRequest>,
) -> Result<(axum::http::StatusCode, Json<AddressResponse>), ApiError> {
    let address = Address::new(
        req.street,
        req.building,
        req.city,
        req.state,
        req.country,
        req.postal_code,
    );
    let response = address_response(&address);
    state.addresses.put_address(address).await;

    Ok((axum::http::StatusCode::CREATED, Json(response)))
}

/// GET /addresses/:id — look up a stored address.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AddressResponse>, ApiError> {
    let address_id = parse_address_id(&id)?;
    let address = state
        .addresses
        .get_address(address_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Address {id} not found")))?;

    Ok(Json(address_response(&address)))
}

pub(crate) fn parse_address_id(id: &str) -> Result<AddressId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid address ID: {e}")))?;
    Ok(AddressId::from(uuid))
}
