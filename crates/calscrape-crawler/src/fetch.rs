//! Page fetching: date tokens and the HTTP fetch seam.
//!
//! The orchestrator never talks to the network directly; it goes through
//! the [`PageFetcher`] trait so tests can substitute canned pages.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::trace;
use url::Url;

use crate::error::CrawlResult;

/// A boxed future, used to keep the fetch, store, and publish seams
/// object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One (year, month, day) request target.
///
/// Days always run 1..=30 regardless of the real month length. The
/// publishing service answers impossible dates such as February 30 with an
/// empty page, which the crawler tolerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateToken {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateToken {
    /// Creates a token for the given calendar position.
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Enumerates all 360 tokens for a year: months 1..=12 crossed with
    /// days 1..=30, in calendar order.
    pub fn year_range(year: i32) -> impl Iterator<Item = DateToken> {
        (1..=12).flat_map(move |month| (1..=30).map(move |day| DateToken::new(year, month, day)))
    }
}

impl fmt::Display for DateToken {
    /// Renders the zero-padded `YYYYMMDD` form the service expects.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// A fetched page: transport status plus raw body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The HTTP status code.
    pub status: u16,
    /// The response body, assumed to be HTML on success.
    pub body: String,
}

impl FetchedPage {
    /// Creates a successful page with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Creates a bodyless page with the given status.
    pub fn status_only(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    /// Only status 200 counts as success.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// The fetch seam. Implementations retrieve the published print page for
/// one date token.
pub trait PageFetcher: Send + Sync {
    /// Fetches the page for `token`.
    ///
    /// # Errors
    ///
    /// Returns `CrawlError` on transport failures. A non-success HTTP
    /// status is not an error here; it comes back in [`FetchedPage`] for
    /// the caller to skip.
    fn fetch(&self, token: DateToken) -> BoxFuture<'_, CrawlResult<FetchedPage>>;
}

/// Fetcher backed by `reqwest` against the live publishing service.
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    /// Creates a fetcher for the calendar endpoint at `base_url`.
    pub fn new(base_url: Url, timeout: Duration) -> CrawlResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("calscrape/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Builds the print-view URL for one date token.
    fn page_url(&self, token: DateToken) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("date", &token.to_string())
            .append_pair("media", "print");
        url
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, token: DateToken) -> BoxFuture<'_, CrawlResult<FetchedPage>> {
        let url = self.page_url(token);
        Box::pin(async move {
            trace!(%url, "requesting published page");
            let response = self
                .client
                .get(url)
                .header(CONTENT_TYPE, "text/html")
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(FetchedPage { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_renders_zero_padded() {
        assert_eq!(DateToken::new(2024, 1, 5).to_string(), "20240105");
        assert_eq!(DateToken::new(2024, 11, 30).to_string(), "20241130");
    }

    #[test]
    fn year_range_enumerates_360_tokens() {
        let tokens: Vec<_> = DateToken::year_range(2024).collect();
        assert_eq!(tokens.len(), 360);
        assert_eq!(tokens[0], DateToken::new(2024, 1, 1));
        assert_eq!(tokens[359], DateToken::new(2024, 12, 30));
        // Impossible dates are deliberately requested.
        assert!(tokens.contains(&DateToken::new(2024, 2, 30)));
        // But never a day 31.
        assert!(!tokens.iter().any(|t| t.day == 31));
    }

    #[test]
    fn success_requires_exactly_200() {
        assert!(FetchedPage::ok("<html></html>").is_success());
        assert!(!FetchedPage::status_only(204).is_success());
        assert!(!FetchedPage::status_only(404).is_success());
        assert!(!FetchedPage::status_only(500).is_success());
    }

    #[test]
    fn page_url_carries_date_and_media() {
        let base = Url::parse("https://calendar.example.com/arts").unwrap();
        let fetcher = HttpFetcher::new(base, Duration::from_secs(5)).unwrap();
        let url = fetcher.page_url(DateToken::new(2025, 2, 3));
        assert_eq!(
            url.as_str(),
            "https://calendar.example.com/arts?date=20250203&media=print"
        );
    }
}
