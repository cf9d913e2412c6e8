use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{parse_quote_payload, FetchError, MonthlyQuoteSource, QuoteSet};
use crate::config::QuoteServerConfig;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::Symbol;

const MONTHLY_QUOTES_PATH: &str = "/quotes/monthly";

/// Client for the quote server's monthly series endpoint.
#[derive(Clone)]
pub struct QuoteServerClient {
    config: QuoteServerConfig,
    http_client: Arc<dyn HttpClient>,
}

impl QuoteServerClient {
    pub fn new(config: QuoteServerConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::default()))
    }

    pub fn with_http_client(config: QuoteServerConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &QuoteServerConfig {
        &self.config
    }

    /// `<base>/quotes/monthly?s=T1,T2,...`
    pub fn monthly_url(&self, tickers: &[Symbol]) -> String {
        let joined = tickers
            .iter()
            .map(|ticker| urlencoding::encode(ticker.as_str()).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}{MONTHLY_QUOTES_PATH}?s={joined}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    pub async fn fetch(&self, tickers: &[Symbol]) -> Result<QuoteSet, FetchError> {
        if tickers.is_empty() {
            return Err(FetchError::invalid_request(
                "quote request must include at least one ticker",
            ));
        }

        let url = self.monthly_url(tickers);
        debug!(%url, tickers = tickers.len(), "fetching monthly quotes");

        let body = self.execute_with_retry(&url).await?;
        let records = parse_quote_payload(&body)?;
        QuoteSet::select(tickers, records)
    }

    async fn execute_with_retry(&self, url: &str) -> Result<String, FetchError> {
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            let request = HttpRequest::get(url)
                .with_header("accept", "application/json")
                .with_auth(&self.config.auth)
                .with_timeout_ms(self.config.timeout_ms);

            let error = match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) => FetchError::unavailable(format!(
                    "quote server returned status {}",
                    response.status
                ))
                .with_retryable(retry.should_retry_status(response.status)),
                Err(error) => {
                    let retryable = if error.is_timeout() {
                        retry.retry_on_timeout
                    } else if error.is_connect() {
                        retry.retry_on_connect
                    } else {
                        true
                    };
                    FetchError::unavailable(format!("quote server transport error: {error}"))
                        .with_retryable(retryable)
                }
            };

            if !error.retryable() || !retry.allows_retry(attempt) {
                return Err(error);
            }

            let delay = retry.delay_for_attempt(attempt);
            warn!(
                attempt = attempt + 1,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "retrying quote fetch"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl MonthlyQuoteSource for QuoteServerClient {
    fn fetch_monthly_series<'a>(
        &'a self,
        tickers: &'a [Symbol],
    ) -> Pin<Box<dyn Future<Output = Result<QuoteSet, FetchError>> + Send + 'a>> {
        Box::pin(self.fetch(tickers))
    }
}
