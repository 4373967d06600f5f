//! Daemon configuration.
//!
//! The daemon has no command-line surface; everything comes from
//! `CALSCRAPE_*` environment variables with sensible defaults where one
//! exists. Only the store URL is mandatory.

use std::time::Duration;

use url::Url;

use calscrape_crawler::DEFAULT_CONCURRENCY;

use crate::error::{ServerError, ServerResult};

/// Default published calendar endpoint.
pub const DEFAULT_CALENDAR_URL: &str =
    "https://25livepub.collegenet.com/calendars/arts-and-architecture-mixin";

/// Default delay between poll cycles: 30 minutes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Published calendar endpoint the crawler fetches from.
    pub calendar_url: Url,
    /// Snapshot store base URL.
    pub store_url: Url,
    /// Delay between poll cycles.
    pub poll_interval: Duration,
    /// In-flight page request cap per cycle.
    pub fetch_concurrency: usize,
    /// Per-request timeout for pages and snapshot reads.
    pub request_timeout: Duration,
}

impl ServerConfig {
    /// Creates a configuration with the given endpoints and defaults for
    /// everything else.
    pub fn new(calendar_url: Url, store_url: Url) -> Self {
        Self {
            calendar_url,
            store_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            fetch_concurrency: DEFAULT_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Builder: set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builder: set the fetch concurrency cap.
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency;
        self
    }

    /// Builder: set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Loads configuration from the environment.
    ///
    /// Recognized variables:
    /// - `CALSCRAPE_STORE_URL` (required)
    /// - `CALSCRAPE_CALENDAR_URL` (default: [`DEFAULT_CALENDAR_URL`])
    /// - `CALSCRAPE_POLL_INTERVAL_SECS` (default: 1800)
    /// - `CALSCRAPE_FETCH_CONCURRENCY` (default: 16)
    /// - `CALSCRAPE_REQUEST_TIMEOUT_SECS` (default: 30)
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the store URL is missing or any
    /// variable fails to parse.
    pub fn from_env() -> ServerResult<Self> {
        let store_url = require_url("CALSCRAPE_STORE_URL")?;
        let calendar_url = match std::env::var("CALSCRAPE_CALENDAR_URL") {
            Ok(raw) => parse_url("CALSCRAPE_CALENDAR_URL", &raw)?,
            Err(_) => parse_url("default calendar url", DEFAULT_CALENDAR_URL)?,
        };

        let mut config = Self::new(calendar_url, store_url);
        if let Some(secs) = optional_u64("CALSCRAPE_POLL_INTERVAL_SECS")? {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(concurrency) = optional_u64("CALSCRAPE_FETCH_CONCURRENCY")? {
            config.fetch_concurrency = concurrency as usize;
        }
        if let Some(secs) = optional_u64("CALSCRAPE_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

fn require_url(name: &str) -> ServerResult<Url> {
    let raw = std::env::var(name)
        .map_err(|_| ServerError::config(format!("{} is not set", name)))?;
    parse_url(name, &raw)
}

fn parse_url(name: &str, raw: &str) -> ServerResult<Url> {
    Url::parse(raw).map_err(|e| ServerError::config(format!("{}: {}", name, e)))
}

fn optional_u64(name: &str) -> ServerResult<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ServerError::config(format!("{} must be an integer, got {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> (Url, Url) {
        (
            Url::parse("https://calendar.example.com/arts").unwrap(),
            Url::parse("https://store.example.com/").unwrap(),
        )
    }

    #[test]
    fn defaults() {
        let (calendar, store) = urls();
        let config = ServerConfig::new(calendar, store);
        assert_eq!(config.poll_interval, Duration::from_secs(1800));
        assert_eq!(config.fetch_concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn builders() {
        let (calendar, store) = urls();
        let config = ServerConfig::new(calendar, store)
            .with_poll_interval(Duration::from_secs(60))
            .with_fetch_concurrency(4)
            .with_request_timeout(Duration::from_secs(10));

        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.fetch_concurrency, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn default_calendar_url_parses() {
        assert!(Url::parse(DEFAULT_CALENDAR_URL).is_ok());
    }

    #[test]
    fn optional_u64_rejects_garbage() {
        unsafe { std::env::set_var("CALSCRAPE_TEST_OPTIONAL_U64", "nope") };
        assert!(optional_u64("CALSCRAPE_TEST_OPTIONAL_U64").is_err());
        unsafe { std::env::remove_var("CALSCRAPE_TEST_OPTIONAL_U64") };
    }
}
