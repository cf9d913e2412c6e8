mod backtest;
mod fetch;
mod stats;

use backtester_core::{load_quote_file, QuoteServerClient, QuoteServerConfig, QuoteSet, Symbol};
use serde_json::Value;
use tracing::info;

use crate::cli::{Cli, Command, SeriesInput};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    match &cli.command {
        Command::Fetch(args) => fetch::run(args, &client(cli)).await,
        Command::Stats(args) => stats::run(args, &client(cli)).await,
        Command::Backtest(args) => backtest::run(args, &client(cli)).await,
    }
}

/// Environment configuration with command-line overrides applied.
fn client(cli: &Cli) -> QuoteServerClient {
    let mut config = QuoteServerConfig::from_env();
    if let Some(server) = &cli.server {
        config = config.with_base_url(server.clone());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    QuoteServerClient::new(config)
}

fn parse_tickers(raw: &[String]) -> Result<Vec<Symbol>, CliError> {
    raw.iter()
        .map(|ticker| Symbol::parse(ticker).map_err(CliError::from))
        .collect()
}

async fn load_quotes(input: &SeriesInput, client: &QuoteServerClient) -> Result<QuoteSet, CliError> {
    if let Some(path) = &input.input {
        info!(path = %path.display(), "loading quotes from file");
        return Ok(load_quote_file(path)?);
    }

    if input.tickers.is_empty() {
        return Err(CliError::Command(String::from(
            "provide tickers or --input <FILE>",
        )));
    }

    let tickers = parse_tickers(&input.tickers)?;
    Ok(client.fetch(&tickers).await?)
}
