//! Predicate compilation.
//!
//! Listing queries build their WHERE clause from typed [`Predicate`] values
//! in one pass. The count query and the page query for a listing call
//! [`push_predicates`] with the same slice, which is what keeps
//! `total_records` honest for every filter combination.

use sqlx::{QueryBuilder, Sqlite};

use souk_catalog::{Field, Predicate, Scalar};

/// SQL column for a field, in terms of the listing join aliases:
/// `p` = products, `t` = transactions, `m` = merchant user, `c` = customer
/// user. Both the product and the transaction listings use these aliases.
fn column(field: Field) -> &'static str {
    match field {
        Field::ProductName => "p.name",
        Field::ProductDescription => "p.description",
        Field::Price => "p.price",
        Field::MerchantName => "m.name",
        Field::MerchantId => "p.merchant_id",
        Field::CustomerId => "t.customer_id",
    }
}

fn push_scalar(qb: &mut QueryBuilder<'_, Sqlite>, value: Scalar) {
    match value {
        Scalar::Int(v) => {
            qb.push_bind(v);
        }
        Scalar::Float(v) => {
            qb.push_bind(v);
        }
    }
}

/// Append `AND <predicate>` for every predicate, binding all values.
///
/// The base query must already carry a WHERE clause (`WHERE 1 = 1` when
/// there is no mandatory predicate).
pub fn push_predicates(qb: &mut QueryBuilder<'_, Sqlite>, predicates: &[Predicate]) {
    for predicate in predicates {
        match predicate {
            Predicate::Equals(field, value) => {
                qb.push(" AND ");
                qb.push(column(*field));
                qb.push(" = ");
                push_scalar(qb, *value);
            }
            Predicate::LikeSubstring(field, needle) => {
                qb.push(" AND ");
                qb.push(column(*field));
                qb.push(" LIKE ");
                qb.push_bind(format!("%{needle}%"));
            }
            Predicate::Range { field, min, max } => {
                if let Some(min) = min {
                    qb.push(" AND ");
                    qb.push(column(*field));
                    qb.push(" >= ");
                    qb.push_bind(*min);
                }
                if let Some(max) = max {
                    qb.push(" AND ");
                    qb.push(column(*field));
                    qb.push(" <= ");
                    qb.push_bind(*max);
                }
            }
        }
    }
}
