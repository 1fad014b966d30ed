//! Order processor: validation, pricing, and the durable unit that records
//! a purchase and decrements stock together.

use thiserror::Error;
use tracing::{info, warn};

use souk_core::{ProductId, UserId};
use souk_orders::{Transaction, pricing};

use crate::error::StoreError;
use crate::pool::Database;
use crate::products::LedgerError;

/// How many times a lost stock race is retried before the order fails.
const MAX_ORDER_ATTEMPTS: u32 = 3;

/// Order creation failure.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("product not found")]
    ProductNotFound,

    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    /// The stock race was lost on every attempt.
    #[error("conflicting concurrent purchases, please retry")]
    Conflict,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            // Busy/locked storage is a retry candidate, not a hard failure.
            StoreError::Busy => OrderError::Conflict,
            other => OrderError::Store(other),
        }
    }
}

/// Orchestrates a purchase: fetch product, validate quantity, price via the
/// pricing policy, persist the transaction, decrement stock.
#[derive(Debug, Clone)]
pub struct OrderProcessor {
    db: Database,
}

impl OrderProcessor {
    pub fn new(db: Database) -> Self {
        OrderProcessor { db }
    }

    /// Create an order for `quantity` units of `product_id`.
    ///
    /// The transaction insert and the stock decrement commit together or not
    /// at all; a lost race against a concurrent purchase of the same product
    /// is retried up to [`MAX_ORDER_ATTEMPTS`] times before surfacing
    /// [`OrderError::Conflict`].
    pub async fn create_order(
        &self,
        customer_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Transaction, OrderError> {
        let mut attempt = 1;
        loop {
            match self.try_create(customer_id, product_id, quantity).await {
                Err(OrderError::Conflict) if attempt < MAX_ORDER_ATTEMPTS => {
                    warn!(
                        product_id = %product_id,
                        attempt,
                        "stock race lost, retrying order"
                    );
                    attempt += 1;
                }
                Ok(transaction) => {
                    info!(
                        transaction_id = %transaction.id,
                        product_id = %product_id,
                        customer_id = %customer_id,
                        quantity,
                        total_price = transaction.total_price,
                        "order created"
                    );
                    return Ok(transaction);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_create(
        &self,
        customer_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Transaction, OrderError> {
        let products = self.db.products();

        let product = products
            .get(product_id)
            .await?
            .ok_or(OrderError::ProductNotFound)?;

        if quantity <= 0 {
            return Err(OrderError::InvalidQuantity(quantity));
        }
        if product.quantity < quantity {
            return Err(OrderError::InsufficientStock {
                requested: quantity,
                available: product.quantity,
            });
        }

        let total_price = pricing::compute_total(product.price, quantity);

        // Durable unit: the transaction row and the stock decrement commit
        // together; dropping `tx` on any early return rolls both back.
        let mut tx = self.db.pool().begin().await.map_err(StoreError::from)?;

        let transaction = self
            .db
            .transactions()
            .insert(&mut *tx, product_id, quantity, total_price, customer_id)
            .await?;

        match products.reserve_and_decrement(&mut *tx, product_id, quantity).await {
            Ok(_) => {}
            Err(LedgerError::NotFound) => return Err(OrderError::ProductNotFound),
            // The snapshot validated above went stale under us: retryable.
            Err(LedgerError::InsufficientStock { .. }) | Err(LedgerError::Conflict) => {
                return Err(OrderError::Conflict);
            }
            Err(LedgerError::Store(e)) => return Err(e.into()),
        }

        tx.commit().await.map_err(StoreError::from)?;
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use souk_auth::{NewUser, Role};
    use souk_catalog::NewProduct;

    async fn seed_user(db: &Database, email: &str, role: Role) -> UserId {
        db.users()
            .insert(NewUser {
                name: email.split('@').next().unwrap_or("user").to_string(),
                email: email.to_string(),
                password_hash: "$argon2id$fake".to_string(),
                role,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_product(db: &Database, merchant: UserId, price: f64, stock: i64) -> ProductId {
        db.products()
            .insert(
                merchant,
                NewProduct::new("Kopi".to_string(), String::new(), price, stock).unwrap(),
            )
            .await
            .unwrap()
            .id
    }

    async fn in_memory() -> Database {
        Database::connect(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn successful_order_decrements_stock_and_prices_it() {
        let db = in_memory().await;
        let merchant = seed_user(&db, "m@example.com", Role::Merchant).await;
        let customer = seed_user(&db, "c@example.com", Role::Customer).await;
        let product_id = seed_product(&db, merchant, 10_000.0, 5).await;

        let tx = db
            .orders()
            .create_order(customer, product_id, 3)
            .await
            .unwrap();
        assert_eq!(tx.quantity, 3);
        assert_eq!(tx.total_price, 35_000.0); // 3 x 10000 + 5000 delivery fee
        assert_eq!(tx.customer_id, customer);

        let product = db.products().get(product_id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 2);
    }

    #[tokio::test]
    async fn discount_tier_applies_to_expensive_products() {
        let db = in_memory().await;
        let merchant = seed_user(&db, "m@example.com", Role::Merchant).await;
        let customer = seed_user(&db, "c@example.com", Role::Customer).await;
        let product_id = seed_product(&db, merchant, 60_000.0, 5).await;

        let tx = db
            .orders()
            .create_order(customer, product_id, 2)
            .await
            .unwrap();
        assert_eq!(tx.total_price, 108_000.0); // 2 x (60000 - 6000)
    }

    #[tokio::test]
    async fn draining_stock_exactly_then_overselling() {
        let db = in_memory().await;
        let merchant = seed_user(&db, "m@example.com", Role::Merchant).await;
        let customer = seed_user(&db, "c@example.com", Role::Customer).await;
        let product_id = seed_product(&db, merchant, 10_000.0, 5).await;
        let orders = db.orders();

        orders.create_order(customer, product_id, 5).await.unwrap();
        assert_eq!(db.products().get(product_id).await.unwrap().unwrap().quantity, 0);

        let err = orders.create_order(customer, product_id, 1).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::InsufficientStock { requested: 1, available: 0 }
        ));
        assert_eq!(db.products().get(product_id).await.unwrap().unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn invalid_quantity_rejected() {
        let db = in_memory().await;
        let merchant = seed_user(&db, "m@example.com", Role::Merchant).await;
        let customer = seed_user(&db, "c@example.com", Role::Customer).await;
        let product_id = seed_product(&db, merchant, 10_000.0, 5).await;
        let orders = db.orders();

        assert!(matches!(
            orders.create_order(customer, product_id, 0).await.unwrap_err(),
            OrderError::InvalidQuantity(0)
        ));
        assert!(matches!(
            orders.create_order(customer, product_id, -2).await.unwrap_err(),
            OrderError::InvalidQuantity(-2)
        ));
        assert_eq!(db.products().get(product_id).await.unwrap().unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn unknown_product_rejected() {
        let db = in_memory().await;
        let customer = seed_user(&db, "c@example.com", Role::Customer).await;

        let err = db
            .orders()
            .create_order(customer, ProductId::from_i64(404), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ProductNotFound));
    }

    #[tokio::test]
    async fn failed_order_leaves_no_transaction_row() {
        let db = in_memory().await;
        let merchant = seed_user(&db, "m@example.com", Role::Merchant).await;
        let customer = seed_user(&db, "c@example.com", Role::Customer).await;
        let product_id = seed_product(&db, merchant, 10_000.0, 2).await;

        let _ = db.orders().create_order(customer, product_id, 3).await.unwrap_err();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    /// Concurrent purchases racing on one product must account for every
    /// unit exactly once and never drive stock negative.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_orders_never_oversell() {
        let path = std::env::temp_dir().join(format!("souk-race-{}.db", uuid::Uuid::now_v7()));
        let db = Database::connect(DbConfig::new(&path).max_connections(8))
            .await
            .unwrap();

        let merchant = seed_user(&db, "m@example.com", Role::Merchant).await;
        let customer = seed_user(&db, "c@example.com", Role::Customer).await;

        // Exactly enough stock for every order to succeed.
        let product_id = seed_product(&db, merchant, 10_000.0, 50).await;

        let mut handles = Vec::new();
        for _ in 0..10 {
            let orders = db.orders();
            handles.push(tokio::spawn(async move {
                orders.create_order(customer, product_id, 5).await
            }));
        }

        let mut successes = 0i64;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(OrderError::InsufficientStock { .. }) | Err(OrderError::Conflict) => {}
                Err(other) => panic!("unexpected order failure: {other}"),
            }
        }

        let final_stock = db.products().get(product_id).await.unwrap().unwrap().quantity;
        assert!(final_stock >= 0);
        assert_eq!(final_stock, 50 - successes * 5);

        let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(recorded, successes);

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(path.with_extension(format!("db{suffix}")));
        }
    }

    /// Over-subscribed contention: more demand than stock. Whatever the
    /// interleaving, units sold plus units remaining equals the initial
    /// stock.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn contended_orders_account_for_every_unit() {
        let path = std::env::temp_dir().join(format!("souk-race-{}.db", uuid::Uuid::now_v7()));
        let db = Database::connect(DbConfig::new(&path).max_connections(8))
            .await
            .unwrap();

        let merchant = seed_user(&db, "m@example.com", Role::Merchant).await;
        let customer = seed_user(&db, "c@example.com", Role::Customer).await;
        let product_id = seed_product(&db, merchant, 10_000.0, 7).await;

        let mut handles = Vec::new();
        for _ in 0..10 {
            let orders = db.orders();
            handles.push(tokio::spawn(async move {
                orders.create_order(customer, product_id, 2).await
            }));
        }

        let mut successes = 0i64;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(OrderError::InsufficientStock { .. }) | Err(OrderError::Conflict) => {}
                Err(other) => panic!("unexpected order failure: {other}"),
            }
        }

        let final_stock = db.products().get(product_id).await.unwrap().unwrap().quantity;
        assert!(final_stock >= 0);
        assert_eq!(final_stock, 7 - successes * 2);

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(path.with_extension(format!("db{suffix}")));
        }
    }
}
