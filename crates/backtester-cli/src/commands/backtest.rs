use backtester_core::{Backtest, QuoteServerClient, RebalanceSchedule};
use serde_json::Value;
use tracing::info;

use crate::cli::BacktestArgs;
use crate::error::CliError;

use super::load_quotes;

pub async fn run(args: &BacktestArgs, client: &QuoteServerClient) -> Result<Value, CliError> {
    let schedule: RebalanceSchedule = args.rebalance.parse()?;
    let backtest = Backtest::new(args.amount, args.weights.clone(), schedule)?;

    let total: f64 = args.weights.iter().sum();
    if (total - 100.0).abs() > 1e-6 {
        info!(total, "target weights do not sum to 100");
    }

    let set = load_quotes(&args.source, client).await?.into_time_series_set()?;
    let aligned = set.align()?;
    let report = backtest.run(&aligned)?;
    Ok(serde_json::to_value(report)?)
}
