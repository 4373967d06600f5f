//! Daemon error types.

use thiserror::Error;

/// Result type for daemon operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the daemon.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A crawl-pipeline operation failed.
    #[error("crawl error: {0}")]
    Crawl(#[from] calscrape_crawler::CrawlError),

    /// Tracing could not be initialized.
    #[error("tracing setup failed: {0}")]
    Tracing(#[from] calscrape_core::TracingError),
}

impl ServerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
