//! Error types for crawl operations.
//!
//! Fetch failures are recovered per date inside the orchestrator; these
//! errors surface only in logs and cycle-level counters, never as a fatal
//! condition for the scheduler.

use thiserror::Error;

/// A specialized Result type for crawl operations.
pub type CrawlResult<T> = Result<T, CrawlError>;

/// Errors from fetching pages or reading the persisted snapshot.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Transport-level failure talking to the calendar service or store.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A server answered with a non-success status.
    #[error("unexpected status {status} from {what}")]
    Status { status: u16, what: String },

    /// The store returned a body that could not be decoded.
    #[error("invalid snapshot payload: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A target URL could not be built from the configuration.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl CrawlError {
    /// Creates a non-success status error.
    pub fn status(status: u16, what: impl Into<String>) -> Self {
        Self::Status {
            status,
            what: what.into(),
        }
    }
}
