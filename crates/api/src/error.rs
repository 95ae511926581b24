//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use domain::{CartError, DomainError};
use inventory::InventoryError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Request conflicts with current state.
    Conflict(String),
    /// Cart or catalog logic error.
    Domain(DomainError),
    /// Checkout execution error.
    Checkout(CheckoutError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, fatal) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, false),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, false),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, false),
            ApiError::Domain(err) => {
                let (status, msg) = domain_error_to_response(err);
                (status, msg, false)
            }
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, false)
            }
        };

        let body = if fatal {
            serde_json::json!({ "error": message, "fatal": true })
        } else {
            serde_json::json!({ "error": message })
        };
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::Cart(cart_err) => match cart_err {
            CartError::DuplicateItem { .. } => (StatusCode::CONFLICT, err.to_string()),
            CartError::ItemNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
            CartError::InvalidQuantity { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        },
        DomainError::CartNotFound { .. } | DomainError::ProductNotFound { .. } => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        DomainError::OutOfStock { .. } | DomainError::InsufficientStock { .. } => {
            (StatusCode::CONFLICT, err.to_string())
        }
        DomainError::Inventory(InventoryError::InsufficientStock { .. }) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        DomainError::Inventory(InventoryError::ProductNotTracked(_)) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        DomainError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String, bool) {
    match &err {
        CheckoutError::CartNotFound { .. } | CheckoutError::AddressNotFound { .. } => {
            (StatusCode::NOT_FOUND, err.to_string(), false)
        }
        CheckoutError::EmptyCart { .. } | CheckoutError::InsufficientStock { .. } => {
            (StatusCode::CONFLICT, err.to_string(), false)
        }
        CheckoutError::RollbackFailed { .. } => {
            tracing::error!(error = %err, "checkout rollback failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), true)
        }
        CheckoutError::Inventory(_) | CheckoutError::Store(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), false)
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<domain::StoreError> for ApiError {
    fn from(err: domain::StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::ProductNotTracked(_) => ApiError::NotFound(err.to_string()),
            InventoryError::InsufficientStock { .. } => ApiError::Conflict(err.to_string()),
        }
    }
}
