//! Periodic-rebalancing backtest over an aligned set.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::format_date;
use crate::{AlignedSet, Allocation, CoreError, SeriesStats, TimeSeries, ValidationError};

/// Name given to the portfolio value series.
pub const PORTFOLIO_SERIES_NAME: &str = "portfolio";

/// How often the portfolio is reset to its target weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceSchedule {
    Never,
    Monthly,
    Quarterly,
    #[default]
    Yearly,
    /// Every `n` observations of the common date range.
    EveryMonths(usize),
}

impl RebalanceSchedule {
    /// Observation stride between rebalances, `None` when rebalancing is off.
    pub const fn period(self) -> Option<usize> {
        match self {
            Self::Never => None,
            Self::Monthly => Some(1),
            Self::Quarterly => Some(3),
            Self::Yearly => Some(12),
            Self::EveryMonths(0) => None,
            Self::EveryMonths(n) => Some(n),
        }
    }

    pub fn fires_at(self, index: usize) -> bool {
        index > 0 && self.period().is_some_and(|period| index % period == 0)
    }
}

impl Display for RebalanceSchedule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Never => f.write_str("never"),
            Self::Monthly => f.write_str("monthly"),
            Self::Quarterly => f.write_str("quarterly"),
            Self::Yearly => f.write_str("yearly"),
            Self::EveryMonths(n) => write!(f, "every {n} months"),
        }
    }
}

impl FromStr for RebalanceSchedule {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "never" | "none" => Ok(Self::Never),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" | "annual" => Ok(Self::Yearly),
            other => other
                .parse::<usize>()
                .map(Self::EveryMonths)
                .map_err(|_| ValidationError::InvalidSchedule {
                    value: other.to_owned(),
                }),
        }
    }
}

/// Buy-and-rebalance simulation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Backtest {
    amount: f64,
    percents: Vec<f64>,
    schedule: RebalanceSchedule,
}

impl Backtest {
    pub fn new(
        amount: f64,
        percents: Vec<f64>,
        schedule: RebalanceSchedule,
    ) -> Result<Self, ValidationError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount {
                value: amount.to_string(),
            });
        }

        Ok(Self {
            amount,
            percents,
            schedule,
        })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn percents(&self) -> &[f64] {
        &self.percents
    }

    pub fn schedule(&self) -> RebalanceSchedule {
        self.schedule
    }

    /// Invest on the first common date, rebalance on schedule, and value the
    /// holdings on every common date.
    pub fn run(&self, aligned: &AlignedSet) -> Result<BacktestReport, CoreError> {
        let dates = aligned.dates();
        let mut allocation = aligned.allocate(self.amount, &self.percents, dates[0])?;
        let mut values = Vec::with_capacity(dates.len());
        let mut rebalance_dates = Vec::new();

        for (index, &date) in dates.iter().enumerate() {
            if self.schedule.fires_at(index) {
                allocation = aligned.rebalance(&allocation, &self.percents, date)?;
                rebalance_dates.push(format_date(date));
            }
            values.push(aligned.value_of(&allocation, date)?);
        }

        debug!(
            observations = values.len(),
            rebalances = rebalance_dates.len(),
            schedule = %self.schedule,
            "backtest complete"
        );

        let portfolio = TimeSeries::from_dates(PORTFOLIO_SERIES_NAME, dates.to_vec(), values)?;
        Ok(BacktestReport {
            members: aligned.names().to_vec(),
            percents: self.percents.clone(),
            schedule: self.schedule,
            rebalance_dates,
            final_allocation: allocation,
            stats: portfolio.stats(),
            portfolio,
        })
    }
}

/// Outcome of a [`Backtest`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub members: Vec<String>,
    pub percents: Vec<f64>,
    pub schedule: RebalanceSchedule,
    pub rebalance_dates: Vec<String>,
    pub final_allocation: Allocation,
    pub portfolio: TimeSeries,
    pub stats: SeriesStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimeSeriesSet;

    fn series(name: &str, values: &[f64]) -> TimeSeries {
        let dates: Vec<String> = (0..values.len())
            .map(|i| format!("{:04}-{:02}-01", 2010 + i / 12, i % 12 + 1))
            .collect();
        TimeSeries::new(name, dates, values.to_vec()).expect("valid series")
    }

    #[test]
    fn parses_schedules() {
        assert_eq!("Yearly".parse(), Ok(RebalanceSchedule::Yearly));
        assert_eq!("never".parse(), Ok(RebalanceSchedule::Never));
        assert_eq!("6".parse(), Ok(RebalanceSchedule::EveryMonths(6)));
        assert!(matches!(
            "weekly".parse::<RebalanceSchedule>(),
            Err(ValidationError::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn schedule_fires_on_period_boundaries_after_start() {
        let quarterly = RebalanceSchedule::Quarterly;
        assert!(!quarterly.fires_at(0));
        assert!(quarterly.fires_at(3));
        assert!(!quarterly.fires_at(4));
        assert!(!RebalanceSchedule::Never.fires_at(12));
        assert!(!RebalanceSchedule::EveryMonths(0).fires_at(12));
    }

    #[test]
    fn rejects_non_positive_amount() {
        let err = Backtest::new(0.0, vec![100.0], RebalanceSchedule::Never).expect_err("must fail");
        assert!(matches!(err, ValidationError::NonPositiveAmount { .. }));
    }

    #[test]
    fn buy_and_hold_tracks_single_asset() {
        let aligned = TimeSeriesSet::new(vec![series("A", &[10.0, 12.0, 15.0])])
            .align()
            .expect("aligns");
        let report = Backtest::new(1000.0, vec![100.0], RebalanceSchedule::Never)
            .expect("valid backtest")
            .run(&aligned)
            .expect("runs");

        assert_eq!(report.portfolio.values(), &[1000.0, 1200.0, 1500.0]);
        assert!(report.rebalance_dates.is_empty());
        assert_eq!(report.final_allocation.quantities(), &[100.0]);
    }

    #[test]
    fn monthly_rebalancing_resets_weights_without_changing_value() {
        let aligned = TimeSeriesSet::new(vec![
            series("A", &[10.0, 20.0, 20.0]),
            series("B", &[10.0, 10.0, 10.0]),
        ])
        .align()
        .expect("aligns");
        let report = Backtest::new(1000.0, vec![50.0, 50.0], RebalanceSchedule::Monthly)
            .expect("valid backtest")
            .run(&aligned)
            .expect("runs");

        // 50 shares of A and 50 of B are worth 1500 after A doubles.
        assert!((report.portfolio.values()[1] - 1500.0).abs() < 1e-9);
        assert_eq!(report.rebalance_dates, vec!["2010-02-01", "2010-03-01"]);

        let quantities = report.final_allocation.quantities();
        assert!((quantities[0] - 37.5).abs() < 1e-9);
        assert!((quantities[1] - 75.0).abs() < 1e-9);
    }
}
