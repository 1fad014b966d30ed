//! Transaction repository: scoped history listings and lookups.
//!
//! Transactions are written exclusively by the order processor; this
//! repository only reads them back, always under a mandatory scope
//! predicate (the requesting customer or the product's merchant).

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteConnection;
use sqlx::{QueryBuilder, SqlitePool};

use souk_catalog::{Predicate, customer_scope, merchant_scope};
use souk_core::{PageParams, ProductId, TransactionId, UserId};
use souk_orders::{Transaction, TransactionView};

use crate::error::{StoreError, StoreResult};
use crate::query::push_predicates;

/// Mandatory scope for every transaction read.
#[derive(Debug, Copy, Clone)]
pub enum TransactionScope {
    /// Transactions the customer created.
    Customer(UserId),
    /// Transactions on products the merchant owns.
    Merchant(UserId),
}

impl TransactionScope {
    fn predicate(&self) -> Predicate {
        match self {
            TransactionScope::Customer(id) => customer_scope(*id),
            TransactionScope::Merchant(id) => merchant_scope(*id),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionViewRow {
    id: i64,
    product_id: i64,
    product_name: Option<String>,
    quantity: i64,
    total_price: f64,
    customer: Option<String>,
    merchant: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TransactionViewRow> for TransactionView {
    fn from(row: TransactionViewRow) -> Self {
        TransactionView {
            id: TransactionId::from_i64(row.id),
            product_id: ProductId::from_i64(row.product_id),
            product_name: row.product_name.unwrap_or_default(),
            quantity: row.quantity,
            total_price: row.total_price,
            customer: row.customer.unwrap_or_default(),
            merchant: row.merchant.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const VIEW_SELECT: &str = "SELECT t.id, t.product_id, p.name AS product_name, t.quantity, \
     t.total_price, c.name AS customer, m.name AS merchant, t.created_at, t.updated_at ";

const VIEW_FROM: &str = "FROM transactions t \
     LEFT JOIN products p ON t.product_id = p.id \
     LEFT JOIN users c ON t.customer_id = c.id AND c.role = 'customer' \
     LEFT JOIN users m ON p.merchant_id = m.id AND m.role = 'merchant'";

#[derive(Debug, Clone)]
pub struct TransactionStore {
    pool: SqlitePool,
}

impl TransactionStore {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionStore { pool }
    }

    /// Persist a new transaction row on the caller's connection, so the
    /// write can share the order processor's durable unit.
    pub(crate) async fn insert(
        &self,
        conn: &mut SqliteConnection,
        product_id: ProductId,
        quantity: i64,
        total_price: f64,
        customer_id: UserId,
    ) -> StoreResult<Transaction> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (product_id, quantity, total_price, customer_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(product_id.as_i64())
        .bind(quantity)
        .bind(total_price)
        .bind(customer_id.as_i64())
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(StoreError::from)?;

        Ok(Transaction {
            id: TransactionId::from_i64(result.last_insert_rowid()),
            product_id,
            quantity,
            total_price,
            customer_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Scoped history page with its total count; the two queries share one
    /// predicate.
    pub async fn list(
        &self,
        scope: TransactionScope,
        page: PageParams,
    ) -> StoreResult<(Vec<TransactionView>, i64)> {
        let predicates = [scope.predicate()];

        let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) {VIEW_FROM} WHERE 1 = 1"));
        push_predicates(&mut count_qb, &predicates);
        let total_records: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut page_qb = QueryBuilder::new(format!("{VIEW_SELECT}{VIEW_FROM} WHERE 1 = 1"));
        push_predicates(&mut page_qb, &predicates);
        page_qb.push(" ORDER BY t.id LIMIT ");
        page_qb.push_bind(page.limit());
        page_qb.push(" OFFSET ");
        page_qb.push_bind(page.offset());

        let rows: Vec<TransactionViewRow> = page_qb.build_query_as().fetch_all(&self.pool).await?;
        Ok((rows.into_iter().map(TransactionView::from).collect(), total_records))
    }

    /// Scoped single lookup: `None` when the transaction does not exist or
    /// falls outside the caller's scope.
    pub async fn find(
        &self,
        id: TransactionId,
        scope: TransactionScope,
    ) -> StoreResult<Option<TransactionView>> {
        let mut qb = QueryBuilder::new(format!("{VIEW_SELECT}{VIEW_FROM} WHERE 1 = 1"));
        push_predicates(&mut qb, &[scope.predicate()]);
        qb.push(" AND t.id = ");
        qb.push_bind(id.as_i64());

        let row: Option<TransactionViewRow> = qb.build_query_as().fetch_optional(&self.pool).await?;
        Ok(row.map(TransactionView::from))
    }
}
