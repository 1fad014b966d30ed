//! Customer catalog routes: filtered browse and product lookup.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use souk_core::ProductId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListProductsQuery>,
) -> axum::response::Response {
    let filter = query.filter();
    let page = query.page();

    match services.db().products().list(&filter, page).await {
        Ok((items, total_records)) => {
            let items = items.iter().map(dto::product_detail_to_json).collect();
            (StatusCode::OK, Json(dto::paginated(items, total_records, page))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::validation_error("invalid product id"),
    };

    match services.db().products().get_detail(id).await {
        Ok(Some(detail)) => {
            (StatusCode::OK, Json(dto::product_detail_to_json(&detail))).into_response()
        }
        Ok(None) => errors::not_found("product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
