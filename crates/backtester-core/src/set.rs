//! Collections of time series and their aligned view.
//!
//! Alignment is an explicit step: a [`TimeSeriesSet`] is a plain list of
//! members, and [`TimeSeriesSet::align`] produces an immutable [`AlignedSet`]
//! holding the common date range and per-member values restricted to it.
//! Allocation arithmetic only exists on the aligned view.
//!
//! ```rust
//! use backtester_core::{TimeSeries, TimeSeriesSet};
//!
//! let stocks = TimeSeries::new("VTI", ["2020-01-01", "2020-02-01"], vec![100.0, 110.0])?;
//! let bonds = TimeSeries::new("BND", ["2020-01-01", "2020-02-01"], vec![50.0, 50.0])?;
//! let aligned = TimeSeriesSet::new(vec![stocks, bonds]).align()?;
//!
//! let start = aligned.first_date();
//! let allocation = aligned.allocate(1000.0, &[50.0, 50.0], start)?;
//! assert_eq!(allocation.quantities(), &[5.0, 10.0]);
//! # Ok::<(), backtester_core::CoreError>(())
//! ```

use serde::{Deserialize, Serialize};
use time::Date;
use tracing::debug;

use crate::domain::format_date;
use crate::{CoreError, TimeSeries};

/// Share quantities, one per set member, in member order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation(Vec<f64>);

impl Allocation {
    pub fn new(quantities: Vec<f64>) -> Self {
        Self(quantities)
    }

    pub fn quantities(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for Allocation {
    fn from(value: Vec<f64>) -> Self {
        Self(value)
    }
}

/// Ordered collection of series. Member order defines the positional mapping
/// used by percent vectors and allocations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesSet {
    members: Vec<TimeSeries>,
}

impl TimeSeriesSet {
    pub fn new(members: Vec<TimeSeries>) -> Self {
        Self { members }
    }

    pub fn push(&mut self, series: TimeSeries) {
        self.members.push(series);
    }

    pub fn members(&self) -> &[TimeSeries] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True iff every member has a value on exactly `date`.
    pub fn is_defined_on(&self, date: Date) -> bool {
        self.members.iter().all(|series| series.contains_date(date))
    }

    /// Dates on which all members are defined.
    ///
    /// Scans the first member's dates for the first date every member shares,
    /// then extends while agreement holds. The result is the first contiguous
    /// run of agreement, not the full intersection: a gap in any member ends
    /// the run even if agreement resumes later.
    pub fn common_dates(&self) -> Vec<Date> {
        let Some(first) = self.members.first() else {
            return Vec::new();
        };
        let candidates = first.dates();

        let start = candidates
            .iter()
            .position(|date| self.is_defined_on(*date))
            .unwrap_or(candidates.len());
        let end = candidates[start..]
            .iter()
            .position(|date| !self.is_defined_on(*date))
            .map_or(candidates.len(), |offset| start + offset);

        candidates[start..end].to_vec()
    }

    /// Compute the common date range and aligned values.
    pub fn align(&self) -> Result<AlignedSet, CoreError> {
        if self.members.is_empty() {
            return Err(CoreError::EmptySet);
        }

        let common_dates = self.common_dates();
        let Some(&first_common) = common_dates.first() else {
            return Err(CoreError::NoCommonDates);
        };

        let values = self
            .members
            .iter()
            .map(|series| {
                let misaligned = || CoreError::Alignment {
                    series: series.name().to_owned(),
                    date: format_date(first_common),
                };
                let start = series.position_of(first_common).ok_or_else(misaligned)?;
                series
                    .values()
                    .get(start..start + common_dates.len())
                    .map(<[f64]>::to_vec)
                    .ok_or_else(misaligned)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            members = self.members.len(),
            common = common_dates.len(),
            start = %format_date(first_common),
            "aligned time series set"
        );

        Ok(AlignedSet {
            names: self
                .members
                .iter()
                .map(|series| series.name().to_owned())
                .collect(),
            dates: common_dates,
            values,
        })
    }
}

impl From<Vec<TimeSeries>> for TimeSeriesSet {
    fn from(value: Vec<TimeSeries>) -> Self {
        Self::new(value)
    }
}

impl FromIterator<TimeSeries> for TimeSeriesSet {
    fn from_iter<T: IntoIterator<Item = TimeSeries>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Immutable aligned view over a [`TimeSeriesSet`].
///
/// `dates` is non-empty and every entry of `values` has `dates.len()` values.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSet {
    names: Vec<String>,
    dates: Vec<Date>,
    values: Vec<Vec<f64>>,
}

impl AlignedSet {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The common date range.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    pub fn date_strings(&self) -> Vec<String> {
        self.dates.iter().copied().map(format_date).collect()
    }

    pub fn first_date(&self) -> Date {
        self.dates[0]
    }

    pub fn last_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Per-member values over the common date range, in member order.
    pub fn aligned_values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn values(&self, member: usize) -> Option<&[f64]> {
        self.values.get(member).map(Vec::as_slice)
    }

    /// Each member restricted to the common range, as standalone series.
    pub fn member_series(&self) -> Vec<TimeSeries> {
        self.names
            .iter()
            .zip(&self.values)
            .filter_map(|(name, values)| {
                TimeSeries::from_dates(name.clone(), self.dates.clone(), values.clone()).ok()
            })
            .collect()
    }

    /// Index of the first common date `>= date`.
    pub fn date_index(&self, date: Date) -> Result<usize, CoreError> {
        let (start, end) = (self.first_date(), self.last_date());
        if date < start || date > end {
            return Err(CoreError::OutOfRange {
                date: format_date(date),
                start: format_date(start),
                end: format_date(end),
            });
        }

        Ok(self.dates.partition_point(|candidate| *candidate < date))
    }

    /// Member values on the common date at `index`.
    fn values_at(&self, index: usize) -> Vec<f64> {
        self.values.iter().map(|values| values[index]).collect()
    }

    /// Convert cash into share quantities matching `percents` on `date`.
    pub fn allocate(
        &self,
        amount: f64,
        percents: &[f64],
        date: Date,
    ) -> Result<Allocation, CoreError> {
        if percents.len() != self.len() {
            return Err(CoreError::WeightCountMismatch {
                expected: self.len(),
                actual: percents.len(),
            });
        }

        let prices = self.values_at(self.date_index(date)?);
        let quantities = percents
            .iter()
            .zip(prices)
            .map(|(percent, price)| amount * percent / 100.0 / price)
            .collect();

        Ok(Allocation(quantities))
    }

    /// Market value of `allocation` on `date`.
    pub fn value_of(&self, allocation: &Allocation, date: Date) -> Result<f64, CoreError> {
        if allocation.len() != self.len() {
            return Err(CoreError::AllocationSizeMismatch {
                expected: self.len(),
                actual: allocation.len(),
            });
        }

        let prices = self.values_at(self.date_index(date)?);
        Ok(allocation
            .quantities()
            .iter()
            .zip(prices)
            .map(|(quantity, price)| quantity * price)
            .sum())
    }

    /// Reset `allocation` to `percents` on `date`, keeping its total value.
    pub fn rebalance(
        &self,
        allocation: &Allocation,
        percents: &[f64],
        date: Date,
    ) -> Result<Allocation, CoreError> {
        let amount = self.value_of(allocation, date)?;
        self.allocate(amount, percents, date)
    }
}
