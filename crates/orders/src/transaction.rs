use chrono::{DateTime, Utc};
use serde::Serialize;

use souk_core::{ProductId, TransactionId, UserId};

/// A recorded purchase.
///
/// # Invariants
/// - Immutable once created: there is no update or delete operation.
/// - `quantity > 0`, and at creation time it did not exceed the product's
///   stock on hand.
/// - `total_price` was computed once by the pricing policy and is never
///   recomputed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub total_price: f64,
    pub customer_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-only projection joining a transaction with display names.
///
/// `customer` and `merchant` are the related users' names; `product_name` is
/// the product's name at read time. Derived by listing queries, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub id: TransactionId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub total_price: f64,
    pub customer: String,
    pub merchant: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
