//! `souk-store` — SQLite persistence: pool, repositories, and the order
//! processor (the only writer that spans multiple tables).

pub mod error;
pub mod orders;
pub mod pool;
pub mod products;
pub mod query;
pub mod transactions;
pub mod users;

pub use error::{StoreError, StoreResult};
pub use orders::{OrderError, OrderProcessor};
pub use pool::{Database, DbConfig};
pub use products::{LedgerError, ProductStore};
pub use transactions::{TransactionScope, TransactionStore};
pub use users::UserStore;
