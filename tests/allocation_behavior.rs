//! Behaviour tests for allocation, valuation and rebalancing on aligned sets.

use backtester_core::{AlignedSet, Allocation, CoreError, TimeSeriesSet};
use backtester_tests::{approx_eq, monthly_series};
use time::macros::date;

/// A doubles over the year while B is flat; B starts two months later.
fn two_asset_set() -> AlignedSet {
    let a: Vec<f64> = (0..12).map(|i| 100.0 * (1.0 + f64::from(i) / 11.0)).collect();
    let b = vec![50.0; 10];
    TimeSeriesSet::new(vec![
        monthly_series("A", 2020, 1, &a),
        monthly_series("B", 2020, 3, &b),
    ])
    .align()
    .expect("series overlap")
}

// =============================================================================
// Allocate / value
// =============================================================================

#[test]
fn allocation_is_worth_its_amount_on_the_purchase_date() {
    // Given: an aligned set starting on 2020-03-01
    let set = two_asset_set();
    let start = set.first_date();

    // When: 1000 is split 50/50 on the first common date
    let allocation = set
        .allocate(1000.0, &[50.0, 50.0], start)
        .expect("valid allocation");

    // Then: the holdings are worth 1000 on that same date
    let value = set.value_of(&allocation, start).expect("in range");
    assert!(approx_eq(value, 1000.0), "value was {value}");
}

#[test]
fn quantities_are_cash_share_divided_by_price() {
    let set = two_asset_set();

    let allocation = set
        .allocate(1000.0, &[25.0, 75.0], date!(2020 - 03 - 01))
        .expect("valid allocation");

    let price_a = set.values(0).expect("member A")[0];
    let quantities = allocation.quantities();
    assert!(approx_eq(quantities[0], 250.0 / price_a));
    assert!(approx_eq(quantities[1], 750.0 / 50.0));
}

#[test]
fn value_tracks_price_moves_of_the_holdings() {
    let set = two_asset_set();
    let allocation = Allocation::new(vec![2.0, 4.0]);

    let last = set.last_date();
    let price_a = *set.values(0).expect("member A").last().expect("non-empty");
    let value = set.value_of(&allocation, last).expect("in range");

    assert!(approx_eq(value, 2.0 * price_a + 4.0 * 50.0));
}

#[test]
fn percents_need_not_sum_to_100() {
    let set = two_asset_set();
    let start = set.first_date();

    let allocation = set
        .allocate(1000.0, &[30.0, 30.0], start)
        .expect("weights are not normalized");

    let value = set.value_of(&allocation, start).expect("in range");
    assert!(approx_eq(value, 600.0));
}

// =============================================================================
// Rebalance
// =============================================================================

#[test]
fn rebalancing_preserves_value_and_resets_weights() {
    // Given: a 50/50 allocation that drifted as A rallied
    let set = two_asset_set();
    let allocation = set
        .allocate(1000.0, &[50.0, 50.0], set.first_date())
        .expect("valid allocation");
    let later = date!(2020 - 09 - 01);
    let before = set.value_of(&allocation, later).expect("in range");

    // When: the portfolio is rebalanced back to 50/50
    let rebalanced = set
        .rebalance(&allocation, &[50.0, 50.0], later)
        .expect("valid rebalance");

    // Then: total value is unchanged and each leg holds half of it
    let after = set.value_of(&rebalanced, later).expect("in range");
    assert!(approx_eq(before, after));
    assert!(approx_eq(rebalanced.quantities()[1] * 50.0, after / 2.0));
    assert!(rebalanced.quantities()[1] > allocation.quantities()[1]);
}

// =============================================================================
// Dates and mismatches
// =============================================================================

#[test]
fn allocating_before_the_common_range_fails() {
    let set = two_asset_set();

    let err = set
        .allocate(1000.0, &[50.0, 50.0], date!(2020 - 01 - 01))
        .expect_err("outside common range");
    assert!(matches!(err, CoreError::OutOfRange { .. }));
}

#[test]
fn a_date_between_observations_prices_at_the_next_observation() {
    let set = two_asset_set();
    let allocation = Allocation::new(vec![1.0, 0.0]);

    let mid_month = set.value_of(&allocation, date!(2020 - 04 - 15)).expect("in range");
    let next = set.value_of(&allocation, date!(2020 - 05 - 01)).expect("in range");
    assert_eq!(mid_month, next);
}

#[test]
fn weight_count_must_match_member_count() {
    let set = two_asset_set();

    let err = set
        .allocate(1000.0, &[100.0], set.first_date())
        .expect_err("one weight for two members");
    assert_eq!(err, CoreError::WeightCountMismatch { expected: 2, actual: 1 });
}

#[test]
fn allocation_size_must_match_member_count() {
    let set = two_asset_set();

    let err = set
        .value_of(&Allocation::new(vec![1.0, 2.0, 3.0]), set.first_date())
        .expect_err("three quantities for two members");
    assert_eq!(err, CoreError::AllocationSizeMismatch { expected: 2, actual: 3 });
}

#[test]
fn zero_price_propagates_as_infinity() {
    let set = TimeSeriesSet::new(vec![monthly_series("Z", 2020, 1, &[0.0, 1.0])])
        .align()
        .expect("single member aligns");

    let allocation = set
        .allocate(100.0, &[100.0], date!(2020 - 01 - 01))
        .expect("structurally valid");
    assert!(allocation.quantities()[0].is_infinite());
}
