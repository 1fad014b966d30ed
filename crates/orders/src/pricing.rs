//! Tiered pricing policy.
//!
//! Prices are in minor currency units. The charge is computed once at order
//! creation and persisted; it is never recomputed afterwards.

/// Flat delivery fee added to low-priced items.
pub const DELIVERY_FEE: i64 = 5_000;

/// Unit prices strictly below this get the delivery fee added.
pub const DELIVERY_FEE_THRESHOLD: f64 = 15_000.0;

/// Unit prices strictly above this get a 10% discount per unit.
pub const DISCOUNT_THRESHOLD: f64 = 50_000.0;

/// Compute the total charge for `quantity` units at `unit_price`.
///
/// Tiers:
/// - `unit_price < 15000`: `quantity * unit_price + 5000` (flat delivery fee).
/// - `unit_price > 50000`: `quantity * (unit_price - 10%)`.
/// - `15000 <= unit_price <= 50000`: total is **0**. Not a free tier: the
///   upstream policy never assigned this band a formula. Changing it would
///   alter recorded charges, so it stays until the policy owner rules
///   otherwise.
///
/// Per-unit amounts are truncated to whole currency units before
/// multiplication, matching the original arithmetic.
pub fn compute_total(unit_price: f64, quantity: i64) -> f64 {
    let total = if unit_price < DELIVERY_FEE_THRESHOLD {
        quantity * unit_price as i64 + DELIVERY_FEE
    } else if unit_price > DISCOUNT_THRESHOLD {
        quantity * (unit_price - unit_price * 10.0 / 100.0) as i64
    } else {
        0
    };
    total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_tier_adds_delivery_fee() {
        // 3 x 10000 + 5000
        assert_eq!(compute_total(10_000.0, 3), 35_000.0);
        assert_eq!(compute_total(1.0, 1), 5_001.0);
    }

    #[test]
    fn high_tier_discounts_ten_percent() {
        // 2 x (60000 - 6000)
        assert_eq!(compute_total(60_000.0, 2), 108_000.0);
        assert_eq!(compute_total(100_000.0, 1), 90_000.0);
    }

    #[test]
    fn middle_band_charges_nothing() {
        assert_eq!(compute_total(15_000.0, 4), 0.0);
        assert_eq!(compute_total(30_000.0, 1), 0.0);
        assert_eq!(compute_total(50_000.0, 10), 0.0);
    }

    #[test]
    fn boundaries_are_exclusive() {
        // 14999.0 is below the fee threshold, 50001.0 above the discount one.
        assert_eq!(compute_total(14_999.0, 1), 19_999.0);
        assert_eq!(compute_total(50_001.0, 1), 45_000.0); // 50001 * 0.9 = 45000.9 -> 45000
    }

    #[test]
    fn fractional_prices_truncate_per_unit() {
        // 10000.9 truncates to 10000 before the multiply.
        assert_eq!(compute_total(10_000.9, 2), 25_000.0);
    }

    #[test]
    fn zero_quantity_still_charges_the_fee_tier() {
        // The policy is total over its domain; quantity validation is the
        // order processor's job, not the pricing policy's.
        assert_eq!(compute_total(10_000.0, 0), 5_000.0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: the policy is deterministic.
            #[test]
            fn deterministic(price in 0.0f64..1_000_000.0, quantity in 0i64..10_000) {
                prop_assert_eq!(compute_total(price, quantity), compute_total(price, quantity));
            }

            /// Property: every input lands in exactly one tier and matches
            /// that tier's formula.
            #[test]
            fn matches_tier_formula(price in 0.0f64..1_000_000.0, quantity in 0i64..10_000) {
                let total = compute_total(price, quantity);
                if price < DELIVERY_FEE_THRESHOLD {
                    prop_assert_eq!(total, (quantity * price as i64 + DELIVERY_FEE) as f64);
                } else if price > DISCOUNT_THRESHOLD {
                    prop_assert_eq!(total, (quantity * (price - price * 10.0 / 100.0) as i64) as f64);
                } else {
                    prop_assert_eq!(total, 0.0);
                }
            }

            /// Property: totals are whole currency units and never negative.
            #[test]
            fn whole_and_non_negative(price in 0.0f64..1_000_000.0, quantity in 0i64..10_000) {
                let total = compute_total(price, quantity);
                prop_assert!(total >= 0.0);
                prop_assert_eq!(total.fract(), 0.0);
            }
        }
    }
}
