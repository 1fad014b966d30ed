//! Request DTOs and JSON mapping helpers.

use serde::Deserialize;

use souk_catalog::{Product, ProductDetail, ProductFilter};
use souk_core::{PageParams, total_pages};
use souk_orders::{Transaction, TransactionView};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
}

/// Partial update: absent fields leave the product unchanged; present
/// fields are written as-is, zero included.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub product_id: i64,
    #[serde(default)]
    pub quantity: i64,
}

/// Raw pagination query parameters; normalized before use.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
}

impl PageQuery {
    pub fn normalize(&self) -> PageParams {
        PageParams::normalize(self.page, self.limit)
    }
}

/// Catalog browse query: filter fields plus pagination.
///
/// Filter optionality is sentinel-based (empty string / non-positive number
/// means "no constraint"), matching the store's filter contract.
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub max_price: f64,
    #[serde(default)]
    pub merchant_name: String,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
}

impl ListProductsQuery {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            min_price: self.min_price,
            max_price: self.max_price,
            merchant_name: self.merchant_name.clone(),
        }
    }

    pub fn page(&self) -> PageParams {
        PageParams::normalize(self.page, self.limit)
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": p.id,
        "name": p.name,
        "description": p.description,
        "price": p.price,
        "merchant_id": p.merchant_id,
        "quantity": p.quantity,
        "created_at": p.created_at,
        "updated_at": p.updated_at,
    })
}

pub fn product_detail_to_json(d: &ProductDetail) -> serde_json::Value {
    serde_json::json!({
        "id": d.product.id,
        "name": d.product.name,
        "description": d.product.description,
        "price": d.product.price,
        "merchant_name": d.merchant_name,
        "quantity": d.product.quantity,
    })
}

pub fn transaction_to_json(t: &Transaction) -> serde_json::Value {
    serde_json::json!({
        "id": t.id,
        "product_id": t.product_id,
        "quantity": t.quantity,
        "total_price": t.total_price,
        "customer_id": t.customer_id,
        "created_at": t.created_at,
        "updated_at": t.updated_at,
    })
}

pub fn transaction_view_to_json(t: &TransactionView) -> serde_json::Value {
    serde_json::json!({
        "id": t.id,
        "product_id": t.product_id,
        "product_name": t.product_name,
        "quantity": t.quantity,
        "total_price": t.total_price,
        "customer": t.customer,
        "merchant": t.merchant,
        "created_at": t.created_at,
        "updated_at": t.updated_at,
    })
}

/// Standard list envelope: items, the filter's total count, and the
/// normalized pagination echo.
pub fn paginated(
    items: Vec<serde_json::Value>,
    total_records: i64,
    page: PageParams,
) -> serde_json::Value {
    serde_json::json!({
        "items": items,
        "total_records": total_records,
        "current_page": page.page(),
        "page_size": page.limit(),
        "total_pages": total_pages(total_records, page.limit()),
    })
}
