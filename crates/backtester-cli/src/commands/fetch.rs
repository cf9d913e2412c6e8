use backtester_core::QuoteServerClient;
use serde_json::Value;

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::parse_tickers;

pub async fn run(args: &FetchArgs, client: &QuoteServerClient) -> Result<Value, CliError> {
    let tickers = parse_tickers(&args.tickers)?;
    let quotes = client.fetch(&tickers).await?;
    Ok(serde_json::to_value(quotes)?)
}
