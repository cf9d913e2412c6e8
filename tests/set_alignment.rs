//! Behaviour tests for common-date-range alignment.

use backtester_core::{CoreError, TimeSeries, TimeSeriesSet};
use backtester_tests::{monthly_series, monthly_series_with_gaps};
use time::macros::date;

fn ramp(count: usize, base: f64) -> Vec<f64> {
    (0..count).map(|i| base + i as f64).collect()
}

// =============================================================================
// Common date range
// =============================================================================

#[test]
fn when_one_series_spans_a_subrange_the_common_range_equals_that_subrange() {
    // Given: A spans Jan-Dec and B spans Mar-Oct
    let set = TimeSeriesSet::new(vec![
        monthly_series("A", 2020, 1, &ramp(12, 100.0)),
        monthly_series("B", 2020, 3, &ramp(8, 50.0)),
    ]);

    // When: the set is aligned
    let aligned = set.align().expect("series overlap");

    // Then: the common range is exactly Mar-Oct
    let expected: Vec<String> = (3..=10).map(|m| format!("2020-{m:02}-01")).collect();
    assert_eq!(aligned.date_strings(), expected);
    assert_eq!(set.common_dates(), aligned.dates());
}

#[test]
fn when_a_member_has_a_gap_the_common_range_stops_at_the_gap() {
    // Given: B is missing May inside an otherwise complete overlap with A
    let set = TimeSeriesSet::new(vec![
        monthly_series("A", 2020, 1, &ramp(12, 100.0)),
        monthly_series_with_gaps("B", 2020, 1, &ramp(12, 50.0), &[4]),
    ]);

    // Then: only the run anchored at the first agreement survives (Jan-Apr),
    // even though Jun-Dec is also shared by both members
    let aligned = set.align().expect("series overlap");
    assert_eq!(
        aligned.date_strings(),
        vec!["2020-01-01", "2020-02-01", "2020-03-01", "2020-04-01"]
    );
    assert!(set.is_defined_on(date!(2020 - 06 - 01)));
}

#[test]
fn the_first_member_defines_the_candidate_axis() {
    // Given: the first member is the shortest
    let set = TimeSeriesSet::new(vec![
        monthly_series("short", 2020, 6, &ramp(3, 10.0)),
        monthly_series("long", 2019, 1, &ramp(36, 20.0)),
    ]);

    let aligned = set.align().expect("series overlap");
    assert_eq!(aligned.first_date(), date!(2020 - 06 - 01));
    assert_eq!(aligned.last_date(), date!(2020 - 08 - 01));
}

#[test]
fn membership_is_exact_not_range_containment() {
    let set = TimeSeriesSet::new(vec![monthly_series("A", 2020, 1, &ramp(12, 1.0))]);

    assert!(set.is_defined_on(date!(2020 - 04 - 01)));
    assert!(!set.is_defined_on(date!(2020 - 04 - 15)));
}

// =============================================================================
// Aligned values
// =============================================================================

#[test]
fn aligned_values_start_at_each_members_own_offset() {
    let set = TimeSeriesSet::new(vec![
        monthly_series("A", 2020, 1, &ramp(12, 100.0)),
        monthly_series("B", 2020, 3, &ramp(8, 50.0)),
    ]);

    let aligned = set.align().expect("series overlap");
    let values = aligned.aligned_values();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0], ramp(8, 102.0));
    assert_eq!(values[1], ramp(8, 50.0));
}

#[test]
fn member_data_out_of_order_is_an_alignment_error() {
    // Given: B holds all of A's dates, but not in ascending order
    let a = TimeSeries::new("A", ["2020-01-01", "2020-02-01", "2020-03-01"], vec![1.0, 2.0, 3.0])
        .expect("valid");
    let b = TimeSeries::new("B", ["2020-02-01", "2020-03-01", "2020-01-01"], vec![2.0, 3.0, 1.0])
        .expect("valid");

    let err = TimeSeriesSet::new(vec![a, b]).align().expect_err("must fail");
    assert_eq!(
        err,
        CoreError::Alignment {
            series: String::from("B"),
            date: String::from("2020-01-01"),
        }
    );
}

#[test]
fn aligned_view_is_unaffected_by_later_membership_changes() {
    // Given: an aligned view taken from a two-member set
    let mut set = TimeSeriesSet::new(vec![
        monthly_series("A", 2020, 1, &ramp(12, 100.0)),
        monthly_series("B", 2020, 1, &ramp(12, 50.0)),
    ]);
    let aligned = set.align().expect("series overlap");

    // When: a narrower member is added to the set afterwards
    set.push(monthly_series("C", 2020, 6, &ramp(2, 1.0)));

    // Then: the existing view keeps its range; a fresh alignment reflects the change
    assert_eq!(aligned.dates().len(), 12);
    assert_eq!(aligned.len(), 2);
    assert_eq!(set.align().expect("still overlaps").dates().len(), 2);
}

// =============================================================================
// Date lookup
// =============================================================================

#[test]
fn date_before_the_common_range_is_out_of_range() {
    let aligned = TimeSeriesSet::new(vec![
        monthly_series("A", 2020, 1, &ramp(12, 100.0)),
        monthly_series("B", 2020, 3, &ramp(8, 50.0)),
    ])
    .align()
    .expect("series overlap");

    let err = aligned
        .date_index(date!(2020 - 02 - 01))
        .expect_err("before the common range");
    assert_eq!(
        err,
        CoreError::OutOfRange {
            date: String::from("2020-02-01"),
            start: String::from("2020-03-01"),
            end: String::from("2020-10-01"),
        }
    );
    assert!(aligned.date_index(date!(2020 - 11 - 01)).is_err());
}

#[test]
fn date_between_axis_points_maps_to_the_next_point() {
    let aligned = TimeSeriesSet::new(vec![monthly_series("A", 2020, 1, &ramp(12, 100.0))])
        .align()
        .expect("single member aligns");

    assert_eq!(aligned.date_index(date!(2020 - 01 - 01)), Ok(0));
    assert_eq!(aligned.date_index(date!(2020 - 03 - 10)), Ok(3));
    assert_eq!(aligned.date_index(date!(2020 - 12 - 01)), Ok(11));
}
