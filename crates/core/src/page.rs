//! Pagination primitives shared by every listing path.
//!
//! Raw `page`/`limit` query parameters are normalized **before** any query
//! executes, so repositories only ever see well-formed values.

/// Page size applied when the caller supplies no usable `limit`.
///
/// This is the sole externally observable pagination default.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Normalized pagination parameters.
///
/// Construct via [`PageParams::normalize`]; the fields are kept private so a
/// non-normalized pair can never reach a query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageParams {
    page: i64,
    limit: i64,
}

impl PageParams {
    /// Clamp raw parameters: `page <= 0` becomes 1, `limit <= 0` becomes
    /// [`DEFAULT_PAGE_LIMIT`]. Idempotent.
    pub fn normalize(page: i64, limit: i64) -> Self {
        Self {
            page: if page <= 0 { 1 } else { page },
            limit: if limit <= 0 { DEFAULT_PAGE_LIMIT } else { limit },
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Row offset for the current page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Total number of pages for `total_records` rows at `limit` rows per page.
///
/// Zero when there are no records; otherwise the ceiling of the division.
pub fn total_pages(total_records: i64, limit: i64) -> i64 {
    if total_records == 0 {
        return 0;
    }
    (total_records + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied() {
        let p = PageParams::normalize(0, 0);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn negative_values_clamped() {
        let p = PageParams::normalize(-3, -1);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn valid_values_untouched() {
        let p = PageParams::normalize(4, 25);
        assert_eq!(p.page(), 4);
        assert_eq!(p.limit(), 25);
        assert_eq!(p.offset(), 75);
    }

    #[test]
    fn total_pages_zero_records() {
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn total_pages_exact_and_partial() {
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(21, 10), 3);
        assert_eq!(total_pages(1, 10), 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: normalization is idempotent.
            #[test]
            fn normalize_is_idempotent(page in -1000i64..1000, limit in -1000i64..1000) {
                let once = PageParams::normalize(page, limit);
                let twice = PageParams::normalize(once.page(), once.limit());
                prop_assert_eq!(once, twice);
            }

            /// Property: normalized values are always usable for a query.
            #[test]
            fn normalized_values_are_positive(page in -1000i64..1000, limit in -1000i64..1000) {
                let p = PageParams::normalize(page, limit);
                prop_assert!(p.page() >= 1);
                prop_assert!(p.limit() > 0);
                prop_assert!(p.offset() >= 0);
            }

            /// Property: total_pages is 0 iff there are no records, else the
            /// exact ceiling of total/limit.
            #[test]
            fn total_pages_matches_ceiling(total in 0i64..100_000, limit in 1i64..1_000) {
                let pages = total_pages(total, limit);
                if total == 0 {
                    prop_assert_eq!(pages, 0);
                } else {
                    prop_assert_eq!(pages, (total + limit - 1) / limit);
                    prop_assert!(pages * limit >= total);
                    prop_assert!((pages - 1) * limit < total);
                }
            }
        }
    }
}
