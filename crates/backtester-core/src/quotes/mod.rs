//! Quote acquisition layer.
//!
//! Raw monthly date/price series keyed by ticker, the [`MonthlyQuoteSource`]
//! contract used to obtain them, and the conversion into [`TimeSeries`] /
//! [`TimeSeriesSet`] for the arithmetic core.
//!
//! # Payloads
//!
//! Two JSON shapes are accepted, from the server and from files alike:
//!
//! ```json
//! [{"ticker": "VTI", "dates": ["2020-01-01"], "prices": [150.2]}]
//! {"VTI": {"dates": ["2020-01-01"], "values": [150.2]}}
//! ```

mod server;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Symbol, TimeSeries, TimeSeriesSet, ValidationError};

pub use server::QuoteServerClient;

/// Fetch failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Unavailable,
    InvalidRequest,
    InvalidResponse,
    MissingTicker,
}

/// Structured acquisition error reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
    retryable: bool,
}

impl FetchError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::InvalidResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn missing_ticker(ticker: &Symbol) -> Self {
        Self {
            kind: FetchErrorKind::MissingTicker,
            message: format!("no quote series returned for ticker '{ticker}'"),
            retryable: false,
        }
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Unavailable => "fetch.unavailable",
            FetchErrorKind::InvalidRequest => "fetch.invalid_request",
            FetchErrorKind::InvalidResponse => "fetch.invalid_response",
            FetchErrorKind::MissingTicker => "fetch.missing_ticker",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

/// Monthly date/price series for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSeries {
    pub ticker: String,
    pub dates: Vec<String>,
    #[serde(alias = "values")]
    pub prices: Vec<f64>,
}

impl QuoteSeries {
    pub fn new(ticker: impl Into<String>, dates: Vec<String>, prices: Vec<f64>) -> Self {
        Self {
            ticker: ticker.into(),
            dates,
            prices,
        }
    }

    /// Validate into a series named after the ticker.
    pub fn into_time_series(self) -> Result<TimeSeries, ValidationError> {
        TimeSeries::new(self.ticker, self.dates, self.prices)
    }

    fn matches(&self, ticker: &Symbol) -> bool {
        self.ticker.trim().eq_ignore_ascii_case(ticker.as_str())
    }
}

/// Quote series in requested-ticker order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteSet {
    series: Vec<QuoteSeries>,
}

impl QuoteSet {
    pub fn new(series: Vec<QuoteSeries>) -> Self {
        Self { series }
    }

    /// Pick one record per requested ticker, in request order. A ticker
    /// requested twice yields the same record twice.
    pub fn select(tickers: &[Symbol], records: Vec<QuoteSeries>) -> Result<Self, FetchError> {
        let mut series = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            let mut record = records
                .iter()
                .find(|record| record.matches(ticker))
                .cloned()
                .ok_or_else(|| FetchError::missing_ticker(ticker))?;
            record.ticker = ticker.as_str().to_owned();
            series.push(record);
        }
        Ok(Self { series })
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuoteSeries> {
        self.series.iter()
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.ticker.as_str()).collect()
    }

    pub fn get(&self, ticker: &str) -> Option<&QuoteSeries> {
        self.series
            .iter()
            .find(|s| s.ticker.eq_ignore_ascii_case(ticker.trim()))
    }

    /// Validate every member and collect them, preserving order.
    pub fn into_time_series_set(self) -> Result<TimeSeriesSet, ValidationError> {
        self.series
            .into_iter()
            .map(QuoteSeries::into_time_series)
            .collect()
    }
}

impl IntoIterator for QuoteSet {
    type Item = QuoteSeries;
    type IntoIter = std::vec::IntoIter<QuoteSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.into_iter()
    }
}

#[derive(Debug, Deserialize)]
struct KeyedSeries {
    dates: Vec<String>,
    #[serde(alias = "prices")]
    values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuotePayload {
    List(Vec<QuoteSeries>),
    Keyed(Map<String, Value>),
}

/// Parse either accepted payload shape into records, in document order.
pub fn parse_quote_payload(body: &str) -> Result<Vec<QuoteSeries>, FetchError> {
    let invalid = |e: serde_json::Error| {
        FetchError::invalid_response(format!("failed to parse quote payload: {e}"))
    };
    let payload: QuotePayload = serde_json::from_str(body).map_err(invalid)?;

    match payload {
        QuotePayload::List(records) => Ok(records),
        QuotePayload::Keyed(map) => map
            .into_iter()
            .map(|(ticker, value)| {
                let series: KeyedSeries = serde_json::from_value(value).map_err(invalid)?;
                Ok(QuoteSeries::new(ticker, series.dates, series.values))
            })
            .collect(),
    }
}

/// Read a quote payload from disk, keeping file order.
pub fn load_quote_file(path: impl AsRef<Path>) -> Result<QuoteSet, FetchError> {
    let path = path.as_ref();
    let body = std::fs::read_to_string(path).map_err(|e| {
        FetchError::unavailable(format!("failed to read {}: {e}", path.display()))
            .with_retryable(false)
    })?;
    parse_quote_payload(&body).map(QuoteSet::new)
}

/// Source of monthly quote series keyed by ticker.
///
/// Implementations must return one series per requested ticker, in request
/// order, or fail with a [`FetchError`].
pub trait MonthlyQuoteSource: Send + Sync {
    fn fetch_monthly_series<'a>(
        &'a self,
        tickers: &'a [Symbol],
    ) -> Pin<Box<dyn Future<Output = Result<QuoteSet, FetchError>> + Send + 'a>>;
}
