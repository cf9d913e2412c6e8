//! Quote server configuration, with environment overrides.

use std::str::FromStr;

use tracing::warn;

use crate::http_client::HttpAuth;
use crate::retry::RetryConfig;

pub const ENV_QUOTE_URL: &str = "BACKTESTER_QUOTE_URL";
pub const ENV_QUOTE_TOKEN: &str = "BACKTESTER_QUOTE_TOKEN";
pub const ENV_TIMEOUT_MS: &str = "BACKTESTER_TIMEOUT_MS";
pub const ENV_MAX_RETRIES: &str = "BACKTESTER_MAX_RETRIES";

pub const DEFAULT_QUOTE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;

/// Where and how monthly quote series are fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteServerConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub auth: HttpAuth,
    pub retry: RetryConfig,
}

impl Default for QuoteServerConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_QUOTE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            auth: HttpAuth::None,
            retry: RetryConfig::default(),
        }
    }
}

impl QuoteServerConfig {
    /// Defaults overridden by `BACKTESTER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_QUOTE_URL).filter(|url| !url.trim().is_empty()) {
            config.base_url = url.trim().to_owned();
        }
        if let Some(token) = lookup(ENV_QUOTE_TOKEN).filter(|token| !token.is_empty()) {
            config.auth = HttpAuth::BearerToken(token);
        }
        if let Some(timeout_ms) = parse_var(&lookup, ENV_TIMEOUT_MS) {
            config.timeout_ms = timeout_ms;
        }
        if let Some(max_retries) = parse_var(&lookup, ENV_MAX_RETRIES) {
            config.retry.max_retries = max_retries;
        }

        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = key, value = %raw, "ignoring unparseable configuration value");
            None
        }
    }
}
