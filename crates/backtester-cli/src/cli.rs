//! CLI argument definitions for backtester.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Fetch monthly quote series for tickers |
//! | `stats` | Per-series statistics and the common date range |
//! | `backtest` | Simulate a target allocation with periodic rebalancing |
//!
//! Series come either from the quote server (positional tickers) or from a
//! JSON file (`--input`).
//!
//! # Examples
//!
//! ```bash
//! backtester fetch VTI BND --pretty
//! backtester stats --input quotes.json --format table
//! backtester backtest VTI BND --weights 60,40 --amount 10000 --rebalance yearly
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Monthly portfolio backtesting over quote series.
#[derive(Debug, Parser)]
#[command(name = "backtester", author, version, about = "Monthly portfolio backtesting CLI")]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Quote server base URL (overrides BACKTESTER_QUOTE_URL).
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Request timeout in milliseconds (overrides BACKTESTER_TIMEOUT_MS).
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON document.
    Json,
    /// Human-readable summary.
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch monthly quote series from the quote server.
    ///
    ///   backtester fetch VTI BND
    Fetch(FetchArgs),

    /// Statistics for each series plus the set's common date range.
    ///
    ///   backtester stats VTI BND
    ///   backtester stats --input quotes.json
    Stats(StatsArgs),

    /// Run a buy-and-rebalance backtest over the common date range.
    ///
    ///   backtester backtest VTI BND --weights 60,40 --rebalance quarterly
    Backtest(BacktestArgs),
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// One or more tickers (e.g., VTI BND or VTI,BND).
    #[arg(required = true, num_args = 1.., value_delimiter = ',')]
    pub tickers: Vec<String>,
}

/// Where series come from: a quote file or the quote server.
#[derive(Debug, Args)]
pub struct SeriesInput {
    /// JSON quote file instead of fetching from the server.
    #[arg(long, conflicts_with = "tickers")]
    pub input: Option<PathBuf>,

    /// Tickers to fetch when no --input is given.
    #[arg(num_args = 0.., value_delimiter = ',')]
    pub tickers: Vec<String>,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SeriesInput,
}

#[derive(Debug, Args)]
pub struct BacktestArgs {
    #[command(flatten)]
    pub source: SeriesInput,

    /// Target weights in percent, one per series, in series order.
    #[arg(long, required = true, value_delimiter = ',', allow_negative_numbers = true)]
    pub weights: Vec<f64>,

    /// Initial cash amount.
    #[arg(long, default_value_t = 10_000.0)]
    pub amount: f64,

    /// Rebalance schedule: never, monthly, quarterly, yearly, or a month count.
    #[arg(long, default_value = "yearly")]
    pub rebalance: String,
}
