//! Error-to-response mapping at the request boundary.
//!
//! Validation failures carry the offending item in `detail`; unexpected
//! store failures become a generic 500 with the underlying message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use storefront_checkout::OrderError;
use storefront_store::StoreError;

pub fn json_error(status: StatusCode, code: &'static str, detail: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": code,
            "detail": detail.into(),
        })),
    )
        .into_response()
}

pub fn store_error_response(err: &StoreError) -> Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

pub fn order_error_response(err: OrderError) -> Response {
    match &err {
        OrderError::EmptyOrder
        | OrderError::InvalidProductId(_)
        | OrderError::InvalidQuantity { .. } => {
            json_error(StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
        }
        OrderError::ProductNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        OrderError::InsufficientStock { .. } => {
            json_error(StatusCode::BAD_REQUEST, "insufficient_stock", err.to_string())
        }
        OrderError::Store(store_err) => store_error_response(store_err),
    }
}
