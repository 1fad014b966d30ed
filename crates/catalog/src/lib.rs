//! `souk-catalog` — product domain types and the catalog filter model.

pub mod filter;
pub mod product;

pub use filter::{Field, Predicate, ProductFilter, Scalar, customer_scope, merchant_scope};
pub use product::{NewProduct, Product, ProductDetail, ProductPatch};
