use chrono::{DateTime, Utc};
use serde::Serialize;

use souk_core::{DomainError, DomainResult, ProductId, UserId};

/// A catalog entry owned by a single merchant.
///
/// # Invariants
/// - `quantity >= 0` at rest; stock is only mutated through the inventory
///   ledger's conditional decrement (or the owning merchant's update).
/// - `merchant_id` is immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub merchant_id: UserId,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i64,
}

impl NewProduct {
    pub fn new(name: String, description: String, price: f64, quantity: i64) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(DomainError::validation("price must be a non-negative number"));
        }
        if quantity < 0 {
            return Err(DomainError::validation("quantity must not be negative"));
        }
        Ok(Self {
            name,
            description,
            price,
            quantity,
        })
    }
}

/// Partial update of a product.
///
/// Every field is optional: an absent field leaves the stored value
/// unchanged, a present field sets it, including to zero. "Set quantity to
/// 0" and "leave quantity alone" are therefore distinct requests.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::validation("name must not be blank"));
        }
        if self.price.is_some_and(|p| !p.is_finite() || p < 0.0) {
            return Err(DomainError::validation("price must be a non-negative number"));
        }
        if self.quantity.is_some_and(|q| q < 0) {
            return Err(DomainError::validation("quantity must not be negative"));
        }
        Ok(())
    }
}

/// Read-only projection: a product joined with its merchant's display name.
///
/// Derived by the store's listing queries, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub merchant_name: String,
}
