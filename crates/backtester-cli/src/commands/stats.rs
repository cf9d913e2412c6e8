use backtester_core::{CoreError, QuoteServerClient, SeriesStats, TimeSeriesSet};
use serde::Serialize;
use serde_json::Value;

use crate::cli::StatsArgs;
use crate::error::CliError;

use super::load_quotes;

#[derive(Debug, Serialize)]
struct CommonRange {
    start: String,
    end: String,
    observations: usize,
}

#[derive(Debug, Serialize)]
struct StatsOutput {
    series: Vec<SeriesStats>,
    common_range: Option<CommonRange>,
    aligned: Vec<SeriesStats>,
}

pub async fn run(args: &StatsArgs, client: &QuoteServerClient) -> Result<Value, CliError> {
    let set = load_quotes(&args.source, client).await?.into_time_series_set()?;
    Ok(serde_json::to_value(summarize(&set)?)?)
}

fn summarize(set: &TimeSeriesSet) -> Result<StatsOutput, CliError> {
    let series: Vec<SeriesStats> = set.members().iter().map(|s| s.stats()).collect();

    let (common_range, aligned) = match set.align() {
        Ok(aligned) => {
            let dates = aligned.date_strings();
            let range = CommonRange {
                start: dates[0].clone(),
                end: dates[dates.len() - 1].clone(),
                observations: dates.len(),
            };
            let stats: Vec<SeriesStats> = aligned
                .member_series()
                .iter()
                .map(|s| s.stats())
                .collect();
            (Some(range), stats)
        }
        Err(CoreError::NoCommonDates) => (None, Vec::new()),
        Err(error) => return Err(error.into()),
    };

    Ok(StatsOutput {
        series,
        common_range,
        aligned,
    })
}
