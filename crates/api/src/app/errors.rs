//! Consistent JSON error responses and error-to-status mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use souk_store::{OrderError, StoreError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn validation_error(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

pub fn authentication_error(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

pub fn authorization_error(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", message)
}

pub fn not_found(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Map a storage failure onto the HTTP taxonomy. Unique violations are
/// conflicts; everything else is an opaque storage failure (the durable
/// unit already rolled back).
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::UniqueViolation { constraint } => json_error(
            StatusCode::CONFLICT,
            "conflict",
            format!("duplicate value for {constraint}"),
        ),
        StoreError::ForeignKeyViolation => json_error(
            StatusCode::CONFLICT,
            "conflict",
            "operation violates a reference from existing records",
        ),
        other => {
            tracing::error!(error = %other, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", "storage failure")
        }
    }
}

pub fn order_error_to_response(err: OrderError) -> axum::response::Response {
    match err {
        OrderError::ProductNotFound => not_found("product not found"),
        OrderError::InvalidQuantity(q) => {
            validation_error(format!("quantity must be positive, got {q}"))
        }
        OrderError::InsufficientStock { .. } => {
            json_error(StatusCode::BAD_REQUEST, "insufficient_stock", "insufficient product quantity")
        }
        OrderError::Conflict => json_error(
            StatusCode::CONFLICT,
            "conflict",
            "conflicting concurrent purchases, please retry",
        ),
        OrderError::Store(e) => store_error_to_response(e),
    }
}
