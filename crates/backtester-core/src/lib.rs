//! # Backtester Core
//!
//! Time-series alignment and portfolio allocation arithmetic for monthly
//! portfolio backtests.
//!
//! ## Overview
//!
//! - **Time series**: validated `(date, value)` sequences with single-series
//!   statistics (percent changes, annualized return, yearly returns, variance)
//! - **Sets**: common-date-range alignment across members, then allocation,
//!   valuation and rebalancing on the aligned view
//! - **Backtests**: buy-and-rebalance simulation producing a portfolio series
//! - **Quotes**: monthly series acquisition from a quote server or file
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`backtest`] | Rebalancing schedules and the backtest runner |
//! | [`config`] | Quote server configuration and environment overrides |
//! | [`domain`] | Ticker symbols and `YYYY-MM-DD` dates |
//! | [`error`] | Validation and set-operation errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`quotes`] | Quote payloads, sources and the server client |
//! | [`retry`] | Backoff policy for quote fetches |
//! | [`series`] | [`TimeSeries`] and its statistics |
//! | [`set`] | [`TimeSeriesSet`], [`AlignedSet`] and [`Allocation`] |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │ MonthlyQuote     │────▶│ HTTP Client      │
//! │ Source           │     │ (reqwest + retry)│
//! └────────┬─────────┘     └──────────────────┘
//!          │ QuoteSet
//!          ▼
//! ┌──────────────────┐ align ┌──────────────────┐
//! │ TimeSeriesSet    │──────▶│ AlignedSet       │
//! └──────────────────┘       │ allocate/value/  │
//!                            │ rebalance        │
//!                            └────────┬─────────┘
//!                                     ▼
//!                            ┌──────────────────┐
//!                            │ Backtest report  │
//!                            └──────────────────┘
//! ```
//!
//! ## Numeric degeneracy
//!
//! Statistics and allocation arithmetic follow IEEE semantics: a zero price,
//! a zero first value or a zero-length span produces `inf`/`NaN` rather than
//! an error. Structural problems (length mismatches, out-of-range dates,
//! missing overlap) are reported as [`CoreError`] / [`ValidationError`].

pub mod backtest;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod quotes;
pub mod retry;
pub mod series;
pub mod set;

pub use backtest::{Backtest, BacktestReport, RebalanceSchedule, PORTFOLIO_SERIES_NAME};
pub use config::QuoteServerConfig;
pub use domain::{format_date, parse_date_str, Symbol};
pub use error::{CoreError, ValidationError};
pub use http_client::{HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use quotes::{
    load_quote_file, parse_quote_payload, FetchError, FetchErrorKind, MonthlyQuoteSource,
    QuoteServerClient, QuoteSeries, QuoteSet,
};
pub use retry::{Backoff, RetryConfig};
pub use series::{population_variance, SeriesStats, TimeSeries};
pub use set::{AlignedSet, Allocation, TimeSeriesSet};
pub use time::Date;
