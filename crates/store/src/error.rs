//! Store error types and sqlx error mapping.

use thiserror::Error;

/// Storage-layer error.
///
/// Wraps sqlx failures with enough categorization for the API layer to map
/// them onto the HTTP taxonomy (409 for unique violations, 500 otherwise)
/// and for the order processor to recognize retryable contention.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write (e.g. duplicate email).
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A FOREIGN KEY constraint rejected the write.
    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    /// The database was busy/locked; the operation may succeed on retry.
    #[error("database busy")]
    Busy,

    /// Connecting or pooling failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Applying migrations failed.
    #[error("migration failed: {0}")]
    Migration(String),

    /// A query failed for a non-constraint reason.
    #[error("query failed: {0}")]
    Query(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();
                // SQLite reports constraint failures in the message text:
                //   "UNIQUE constraint failed: users.email"
                //   "FOREIGN KEY constraint failed"
                //   "database is locked" (SQLITE_BUSY)
                if msg.contains("UNIQUE constraint failed") {
                    let constraint = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    StoreError::UniqueViolation { constraint }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    StoreError::ForeignKeyViolation
                } else if msg.contains("database is locked") || msg.contains("database table is locked") {
                    StoreError::Busy
                } else {
                    StoreError::Query(msg)
                }
            }
            sqlx::Error::PoolTimedOut => StoreError::Busy,
            sqlx::Error::PoolClosed => StoreError::Connection("pool is closed".to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Migration(err.to_string())
    }
}
