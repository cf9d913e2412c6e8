//! A single named sequence of dated values.
//!
//! [`TimeSeries`] is validated once at construction and immutable afterwards.
//! Statistics follow IEEE semantics: a zero first value, a zero-length span or
//! an empty set of yearly returns yields `inf`/`NaN` instead of an error.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::{format_date, fractional_years, parse_date};
use crate::ValidationError;

/// Number of monthly observations between consecutive yearly returns.
pub const MONTHS_PER_YEAR: usize = 12;

/// Immutable, validated series of `(date, value)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimeSeriesRecord", into = "TimeSeriesRecord")]
pub struct TimeSeries {
    name: String,
    dates: Vec<Date>,
    values: Vec<f64>,
}

/// Wire shape of a series: dates as `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TimeSeriesRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    dates: Vec<String>,
    #[serde(default)]
    values: Vec<f64>,
}

impl TimeSeries {
    /// Validate raw date strings and values into a series.
    pub fn new<I, S>(
        name: impl Into<String>,
        dates: I,
        values: Vec<f64>,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw: Vec<S> = dates.into_iter().collect();
        check_shape(raw.len(), values.len())?;

        let dates = raw
            .iter()
            .enumerate()
            .map(|(index, date)| parse_date(index, date.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.into(),
            dates,
            values,
        })
    }

    /// Build a series from already-parsed dates.
    pub fn from_dates(
        name: impl Into<String>,
        dates: Vec<Date>,
        values: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        check_shape(dates.len(), values.len())?;
        Ok(Self {
            name: name.into(),
            dates,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    pub fn date_strings(&self) -> Vec<String> {
        self.dates.iter().copied().map(format_date).collect()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: construction rejects empty series.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_date(&self) -> Date {
        self.dates[0]
    }

    pub fn last_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Position of `date` in this series, by exact match.
    pub fn position_of(&self, date: Date) -> Option<usize> {
        self.dates.iter().position(|candidate| *candidate == date)
    }

    pub fn contains_date(&self, date: Date) -> bool {
        self.dates.contains(&date)
    }

    /// Each value as a percentage of the first value.
    pub fn percent_changes(&self) -> Vec<f64> {
        let first = self.values[0];
        self.values.iter().map(|value| 100.0 * value / first).collect()
    }

    /// Annualized percent rate of return from the first to the last value.
    pub fn annualized_return(&self) -> f64 {
        let years = fractional_years(self.first_date(), self.last_date());
        let ratio = self.values[self.values.len() - 1] / self.values[0];
        100.0 * (ratio.powf(1.0 / years) - 1.0)
    }

    /// Consecutive 12-observation returns, as percentages, from the start.
    ///
    /// Assumes monthly observations; fewer than 13 values yields no returns.
    pub fn yearly_returns(&self) -> Vec<f64> {
        (MONTHS_PER_YEAR..self.values.len())
            .step_by(MONTHS_PER_YEAR)
            .map(|end| 100.0 * self.values[end] / self.values[end - MONTHS_PER_YEAR])
            .collect()
    }

    /// Population variance of [`yearly_returns`](Self::yearly_returns).
    pub fn variance(&self) -> f64 {
        population_variance(&self.yearly_returns())
    }

    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Summary statistics for presentation.
    pub fn stats(&self) -> SeriesStats {
        let yearly_returns = self.yearly_returns();
        let variance = population_variance(&yearly_returns);

        SeriesStats {
            name: self.name.clone(),
            start: format_date(self.first_date()),
            end: format_date(self.last_date()),
            observations: self.len(),
            first_value: self.values[0],
            last_value: self.values[self.values.len() - 1],
            annualized_return: self.annualized_return(),
            yearly_returns,
            variance,
            standard_deviation: variance.sqrt(),
        }
    }
}

/// Divide-by-count variance; `NaN` for an empty slice.
pub fn population_variance(values: &[f64]) -> f64 {
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    values
        .iter()
        .map(|value| (value - mean) * (value - mean))
        .sum::<f64>()
        / count
}

fn check_shape(dates: usize, values: usize) -> Result<(), ValidationError> {
    if dates == 0 {
        return Err(ValidationError::MissingDates);
    }
    if values == 0 {
        return Err(ValidationError::MissingValues);
    }
    if dates != values {
        return Err(ValidationError::LengthMismatch { dates, values });
    }
    Ok(())
}

impl TryFrom<TimeSeriesRecord> for TimeSeries {
    type Error = ValidationError;

    fn try_from(record: TimeSeriesRecord) -> Result<Self, Self::Error> {
        Self::new(record.name, record.dates, record.values)
    }
}

impl From<TimeSeries> for TimeSeriesRecord {
    fn from(series: TimeSeries) -> Self {
        Self {
            dates: series.date_strings(),
            name: series.name,
            values: series.values,
        }
    }
}

/// Single-series statistics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub name: String,
    pub start: String,
    pub end: String,
    pub observations: usize,
    pub first_value: f64,
    pub last_value: f64,
    pub annualized_return: f64,
    pub yearly_returns: Vec<f64>,
    pub variance: f64,
    pub standard_deviation: f64,
}
