//! Merchant product routes: CRUD and listing scoped to the authenticated
//! merchant's own catalog.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use souk_catalog::{NewProduct, ProductPatch};
use souk_core::ProductId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::Principal;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_own_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let new = match NewProduct::new(body.name, body.description, body.price, body.quantity) {
        Ok(new) => new,
        Err(e) => return errors::validation_error(e.to_string()),
    };

    match services.db().products().insert(principal.user_id(), new).await {
        Ok(product) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "product created successfully",
                "product": dto::product_to_json(&product),
            })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::validation_error("invalid product id"),
    };

    match services.db().products().get_owned(id, principal.user_id()).await {
        Ok(Some(detail)) => {
            (StatusCode::OK, Json(dto::product_detail_to_json(&detail))).into_response()
        }
        Ok(None) => errors::not_found("product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_own_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    let page = query.normalize();
    match services
        .db()
        .products()
        .list_by_merchant(principal.user_id(), page)
        .await
    {
        Ok((items, total_records)) => {
            let items = items.iter().map(dto::product_detail_to_json).collect();
            (StatusCode::OK, Json(dto::paginated(items, total_records, page))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::validation_error("invalid product id"),
    };

    let patch = ProductPatch {
        name: body.name,
        description: body.description,
        price: body.price,
        quantity: body.quantity,
    };
    if let Err(e) = patch.validate() {
        return errors::validation_error(e.to_string());
    }

    match services
        .db()
        .products()
        .update(id, principal.user_id(), &patch)
        .await
    {
        Ok(Some(product)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "product updated successfully",
                "product": dto::product_to_json(&product),
            })),
        )
            .into_response(),
        Ok(None) => errors::not_found("product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::validation_error("invalid product id"),
    };

    match services.db().products().delete(id, principal.user_id()).await {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "product deleted successfully" })),
        )
            .into_response(),
        Ok(false) => errors::not_found("product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
