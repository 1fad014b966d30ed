//! Transaction routes: order creation (customer) and scoped history for
//! both roles.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use souk_core::{ProductId, TransactionId};
use souk_store::TransactionScope;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::Principal;

pub fn customer_router() -> Router {
    Router::new()
        .route("/", get(list_customer_transactions).post(create_transaction))
        .route("/:id", get(get_customer_transaction))
}

pub fn merchant_router() -> Router {
    Router::new()
        .route("/", get(list_merchant_transactions))
        .route("/:id", get(get_merchant_transaction))
}

pub async fn create_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> axum::response::Response {
    let product_id = ProductId::from_i64(body.product_id);

    match services
        .db()
        .orders()
        .create_order(principal.user_id(), product_id, body.quantity)
        .await
    {
        Ok(transaction) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "transaction created successfully",
                "transaction": dto::transaction_to_json(&transaction),
            })),
        )
            .into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn list_customer_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    list_transactions(&services, TransactionScope::Customer(principal.user_id()), query).await
}

pub async fn list_merchant_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    list_transactions(&services, TransactionScope::Merchant(principal.user_id()), query).await
}

async fn list_transactions(
    services: &AppServices,
    scope: TransactionScope,
    query: dto::PageQuery,
) -> axum::response::Response {
    let page = query.normalize();
    match services.db().transactions().list(scope, page).await {
        Ok((items, total_records)) => {
            let items = items.iter().map(dto::transaction_view_to_json).collect();
            (StatusCode::OK, Json(dto::paginated(items, total_records, page))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_customer_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    get_transaction(&services, TransactionScope::Customer(principal.user_id()), &id).await
}

pub async fn get_merchant_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    get_transaction(&services, TransactionScope::Merchant(principal.user_id()), &id).await
}

async fn get_transaction(
    services: &AppServices,
    scope: TransactionScope,
    raw_id: &str,
) -> axum::response::Response {
    let id: TransactionId = match raw_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::validation_error("invalid transaction id"),
    };

    match services.db().transactions().find(id, scope).await {
        Ok(Some(view)) => {
            (StatusCode::OK, Json(dto::transaction_view_to_json(&view))).into_response()
        }
        Ok(None) => errors::not_found("transaction not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
