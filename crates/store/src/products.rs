//! Product repository: merchant-scoped CRUD, catalog listing, and the
//! inventory ledger's check-and-reserve operation.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteConnection;
use sqlx::{QueryBuilder, SqlitePool};
use thiserror::Error;
use tracing::debug;

use souk_catalog::{NewProduct, Predicate, Product, ProductDetail, ProductFilter, ProductPatch, merchant_scope};
use souk_core::{PageParams, ProductId, UserId};

use crate::error::{StoreError, StoreResult};
use crate::query::push_predicates;

/// Failure modes of the stock reservation.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("product not found")]
    NotFound,

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    /// A concurrent modification invalidated the read snapshot the caller
    /// validated against. Retry candidate.
    #[error("concurrent stock modification")]
    Conflict,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    merchant_id: i64,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId::from_i64(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            merchant_id: UserId::from_i64(row.merchant_id),
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductDetailRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    merchant_id: i64,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    merchant_name: Option<String>,
}

impl From<ProductDetailRow> for ProductDetail {
    fn from(row: ProductDetailRow) -> Self {
        ProductDetail {
            product: Product {
                id: ProductId::from_i64(row.id),
                name: row.name,
                description: row.description,
                price: row.price,
                merchant_id: UserId::from_i64(row.merchant_id),
                quantity: row.quantity,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            merchant_name: row.merchant_name.unwrap_or_default(),
        }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, merchant_id, quantity, created_at, updated_at";

/// Join used by every product listing. Merchant names resolve only against
/// users that actually hold the merchant role.
const DETAIL_FROM: &str = "FROM products p \
     LEFT JOIN users m ON p.merchant_id = m.id AND m.role = 'merchant'";

const DETAIL_SELECT: &str = "SELECT p.id, p.name, p.description, p.price, p.merchant_id, \
     p.quantity, p.created_at, p.updated_at, m.name AS merchant_name ";

/// Repository for catalog rows; also the authority on stock levels.
#[derive(Debug, Clone)]
pub struct ProductStore {
    pool: SqlitePool,
}

impl ProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        ProductStore { pool }
    }

    /// Insert a product under its owning merchant.
    pub async fn insert(&self, merchant_id: UserId, new: NewProduct) -> StoreResult<Product> {
        debug!(merchant_id = %merchant_id, name = %new.name, "inserting product");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price, merchant_id, quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(merchant_id.as_i64())
        .bind(new.quantity)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: ProductId::from_i64(result.last_insert_rowid()),
            name: new.name,
            description: new.description,
            price: new.price,
            merchant_id,
            quantity: new.quantity,
            created_at: now,
            updated_at: now,
        })
    }

    /// Current stock snapshot for a product.
    pub async fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Product::from))
    }

    /// Product joined with its merchant's display name.
    pub async fn get_detail(&self, id: ProductId) -> StoreResult<Option<ProductDetail>> {
        let row: Option<ProductDetailRow> =
            sqlx::query_as(&format!("{DETAIL_SELECT}{DETAIL_FROM} WHERE p.id = ?1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(ProductDetail::from))
    }

    /// Merchant-scoped detail lookup: `None` when the product does not exist
    /// *or* belongs to a different merchant.
    pub async fn get_owned(
        &self,
        id: ProductId,
        merchant_id: UserId,
    ) -> StoreResult<Option<ProductDetail>> {
        let row: Option<ProductDetailRow> = sqlx::query_as(&format!(
            "{DETAIL_SELECT}{DETAIL_FROM} WHERE p.id = ?1 AND p.merchant_id = ?2"
        ))
        .bind(id.as_i64())
        .bind(merchant_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ProductDetail::from))
    }

    /// Catalog browse: free-text filter plus pagination.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: PageParams,
    ) -> StoreResult<(Vec<ProductDetail>, i64)> {
        self.list_with(&filter.predicates(), page).await
    }

    /// Merchant listing: same machinery with the merchant id as the single
    /// mandatory equality predicate.
    pub async fn list_by_merchant(
        &self,
        merchant_id: UserId,
        page: PageParams,
    ) -> StoreResult<(Vec<ProductDetail>, i64)> {
        self.list_with(&[merchant_scope(merchant_id)], page).await
    }

    /// Shared listing path. The count query and the page query are built
    /// from the same predicate slice; the count runs before limit/offset are
    /// applied.
    async fn list_with(
        &self,
        predicates: &[Predicate],
        page: PageParams,
    ) -> StoreResult<(Vec<ProductDetail>, i64)> {
        let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) {DETAIL_FROM} WHERE 1 = 1"));
        push_predicates(&mut count_qb, predicates);
        let total_records: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut page_qb = QueryBuilder::new(format!("{DETAIL_SELECT}{DETAIL_FROM} WHERE 1 = 1"));
        push_predicates(&mut page_qb, predicates);
        page_qb.push(" ORDER BY p.id LIMIT ");
        page_qb.push_bind(page.limit());
        page_qb.push(" OFFSET ");
        page_qb.push_bind(page.offset());

        let rows: Vec<ProductDetailRow> = page_qb.build_query_as().fetch_all(&self.pool).await?;
        Ok((rows.into_iter().map(ProductDetail::from).collect(), total_records))
    }

    /// Apply a partial update to a product owned by `merchant_id`.
    ///
    /// Absent patch fields leave the row untouched; present fields are
    /// written as-is (zero included). Returns the updated product, or `None`
    /// when no row matched the id + owner pair.
    pub async fn update(
        &self,
        id: ProductId,
        merchant_id: UserId,
        patch: &ProductPatch,
    ) -> StoreResult<Option<Product>> {
        debug!(id = %id, merchant_id = %merchant_id, "updating product");

        let mut qb = QueryBuilder::new("UPDATE products SET updated_at = ");
        qb.push_bind(Utc::now());
        if let Some(name) = &patch.name {
            qb.push(", name = ");
            qb.push_bind(name.clone());
        }
        if let Some(description) = &patch.description {
            qb.push(", description = ");
            qb.push_bind(description.clone());
        }
        if let Some(price) = patch.price {
            qb.push(", price = ");
            qb.push_bind(price);
        }
        if let Some(quantity) = patch.quantity {
            qb.push(", quantity = ");
            qb.push_bind(quantity);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id.as_i64());
        qb.push(" AND merchant_id = ");
        qb.push_bind(merchant_id.as_i64());

        let result = qb.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Delete a product owned by `merchant_id`. Returns whether a row was
    /// removed.
    pub async fn delete(&self, id: ProductId, merchant_id: UserId) -> StoreResult<bool> {
        debug!(id = %id, merchant_id = %merchant_id, "deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND merchant_id = ?2")
            .bind(id.as_i64())
            .bind(merchant_id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically check and decrement stock.
    ///
    /// A single conditional UPDATE guards the invariant: the decrement only
    /// happens if `quantity >= requested` still holds at write time, checked
    /// via the affected-row count. Runs on the caller's connection so it can
    /// participate in the order processor's transaction.
    pub async fn reserve_and_decrement(
        &self,
        conn: &mut SqliteConnection,
        id: ProductId,
        quantity: i64,
    ) -> Result<Product, LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - ?1, updated_at = ?2
            WHERE id = ?3 AND quantity >= ?1
            "#,
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(id.as_i64())
        .execute(&mut *conn)
        .await
        .map_err(StoreError::from)?;

        if result.rows_affected() == 0 {
            // No mutation happened. Re-read on the same connection to tell
            // "gone" from "not enough stock" from "snapshot went stale".
            let row: Option<ProductRow> =
                sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"))
                    .bind(id.as_i64())
                    .fetch_optional(&mut *conn)
                    .await
                    .map_err(StoreError::from)?;
            return match row {
                None => Err(LedgerError::NotFound),
                Some(p) if p.quantity < quantity => Err(LedgerError::InsufficientStock {
                    requested: quantity,
                    available: p.quantity,
                }),
                Some(_) => Err(LedgerError::Conflict),
            };
        }

        let row: ProductRow =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"))
                .bind(id.as_i64())
                .fetch_one(&mut *conn)
                .await
                .map_err(StoreError::from)?;
        Ok(Product::from(row))
    }
}
