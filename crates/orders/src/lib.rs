//! `souk-orders` — pure order domain: pricing policy and transaction types.

pub mod pricing;
pub mod transaction;

pub use pricing::compute_total;
pub use transaction::{Transaction, TransactionView};
