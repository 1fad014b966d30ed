//! Catalog filter model: typed predicates composed by listing queries.
//!
//! Filters accumulate as tagged [`Predicate`] values and are compiled to SQL
//! in a single pass by the store, so the count query and the page query are
//! predicate-identical by construction.

use serde::Deserialize;

use souk_core::UserId;

/// Queryable fields. Each maps to exactly one column of the listing joins.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    ProductName,
    ProductDescription,
    Price,
    MerchantName,
    MerchantId,
    CustomerId,
}

/// A typed bind value for equality predicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
}

/// One filter predicate; predicates on a query are ANDed together.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field = value`
    Equals(Field, Scalar),
    /// `field LIKE %needle%`
    LikeSubstring(Field, String),
    /// `field >= min AND field <= max` (either bound may be absent).
    Range {
        field: Field,
        min: Option<f64>,
        max: Option<f64>,
    },
}

/// Free-text catalog browse filter.
///
/// Optionality is sentinel-based, matching the query-string contract: an
/// empty string or non-positive number means "no constraint". In particular
/// `price = 0` is indistinguishable from "no price filter", a known
/// limitation of the request format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub max_price: f64,
    #[serde(default)]
    pub merchant_name: String,
}

impl ProductFilter {
    /// Convert the sentinel-optional fields into typed predicates.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if !self.name.is_empty() {
            predicates.push(Predicate::LikeSubstring(Field::ProductName, self.name.clone()));
        }
        if !self.description.is_empty() {
            predicates.push(Predicate::LikeSubstring(
                Field::ProductDescription,
                self.description.clone(),
            ));
        }

        let min = (self.min_price > 0.0).then_some(self.min_price);
        let max = (self.max_price > 0.0).then_some(self.max_price);
        if min.is_some() || max.is_some() {
            predicates.push(Predicate::Range {
                field: Field::Price,
                min,
                max,
            });
        }

        if self.price > 0.0 {
            predicates.push(Predicate::Equals(Field::Price, Scalar::Float(self.price)));
        }
        if !self.merchant_name.is_empty() {
            predicates.push(Predicate::LikeSubstring(
                Field::MerchantName,
                self.merchant_name.clone(),
            ));
        }

        predicates
    }
}

/// Mandatory equality predicate scoping a listing to one merchant.
pub fn merchant_scope(merchant_id: UserId) -> Predicate {
    Predicate::Equals(Field::MerchantId, Scalar::Int(merchant_id.as_i64()))
}

/// Mandatory equality predicate scoping a listing to one customer.
pub fn customer_scope(customer_id: UserId) -> Predicate {
    Predicate::Equals(Field::CustomerId, Scalar::Int(customer_id.as_i64()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_yields_no_predicates() {
        assert!(ProductFilter::default().predicates().is_empty());
    }

    #[test]
    fn sentinel_values_mean_no_constraint() {
        let filter = ProductFilter {
            name: String::new(),
            price: 0.0,
            min_price: -5.0,
            ..Default::default()
        };
        assert!(filter.predicates().is_empty());
    }

    #[test]
    fn all_fields_become_predicates() {
        let filter = ProductFilter {
            name: "kopi".into(),
            description: "arabica".into(),
            price: 12_000.0,
            min_price: 10_000.0,
            max_price: 20_000.0,
            merchant_name: "toko".into(),
        };
        let predicates = filter.predicates();
        assert_eq!(predicates.len(), 5);
        assert!(predicates.contains(&Predicate::LikeSubstring(Field::ProductName, "kopi".into())));
        assert!(predicates.contains(&Predicate::Equals(Field::Price, Scalar::Float(12_000.0))));
        assert!(predicates.contains(&Predicate::Range {
            field: Field::Price,
            min: Some(10_000.0),
            max: Some(20_000.0),
        }));
    }

    #[test]
    fn half_open_range_kept() {
        let filter = ProductFilter {
            min_price: 5_000.0,
            ..Default::default()
        };
        assert_eq!(
            filter.predicates(),
            vec![Predicate::Range {
                field: Field::Price,
                min: Some(5_000.0),
                max: None,
            }]
        );
    }

    #[test]
    fn scopes_are_equality_predicates() {
        assert_eq!(
            merchant_scope(UserId::from_i64(3)),
            Predicate::Equals(Field::MerchantId, Scalar::Int(3))
        );
        assert_eq!(
            customer_scope(UserId::from_i64(9)),
            Predicate::Equals(Field::CustomerId, Scalar::Int(9))
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every produced Range carries at least one bound, and
            /// non-positive numeric sentinels never constrain the query.
            #[test]
            fn ranges_are_never_empty(min in -50_000.0f64..50_000.0, max in -50_000.0f64..50_000.0) {
                let filter = ProductFilter {
                    min_price: min,
                    max_price: max,
                    ..Default::default()
                };
                for predicate in filter.predicates() {
                    if let Predicate::Range { min, max, .. } = predicate {
                        prop_assert!(min.is_some() || max.is_some());
                        if let Some(b) = min { prop_assert!(b > 0.0); }
                        if let Some(b) = max { prop_assert!(b > 0.0); }
                    }
                }
            }

            /// Property: the predicate count matches the number of
            /// non-sentinel fields.
            #[test]
            fn predicate_count_matches_active_fields(
                name in "[a-z]{0,8}",
                price in -10_000.0f64..10_000.0,
            ) {
                let filter = ProductFilter {
                    name: name.clone(),
                    price,
                    ..Default::default()
                };
                let expected = usize::from(!name.is_empty()) + usize::from(price > 0.0);
                prop_assert_eq!(filter.predicates().len(), expected);
            }
        }
    }
}
