//! Year-wide fetch orchestration.
//!
//! One crawl covers every (month, day) page of a year. Fetches run
//! concurrently behind a bounded in-flight cap; each success is extracted
//! and normalized independently, then merged into one set. A failed date
//! contributes nothing and never aborts the rest of the crawl — it is
//! simply re-requested on the next cycle.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use calscrape_core::EventSet;

use crate::extract::{extract, normalize};
use crate::fetch::{DateToken, PageFetcher};

/// Default number of in-flight page requests.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Counters for one year-wide crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Date tokens requested.
    pub requested: usize,
    /// Pages that answered with status 200.
    pub succeeded: usize,
    /// Fetches that failed or answered a non-success status.
    pub failed: usize,
    /// Listings extracted across all successful pages.
    pub listings: usize,
}

/// The merged result of crawling every date token of one year.
#[derive(Debug, Clone, Default)]
pub struct YearCrawl {
    /// All listings found, keyed by content-derived identity.
    pub events: EventSet,
    /// Structured counts for observability.
    pub stats: CrawlStats,
}

/// Fetches every (month 1..=12, day 1..=30) page of `year` and merges the
/// extracted listings into one set.
///
/// Days run to 30 for every month; the service answers impossible dates
/// with an empty page. At most `concurrency` requests are in flight at
/// once (a cap of 0 is treated as 1). The crawl itself never fails; per
/// date failures are logged and counted in [`CrawlStats`].
pub async fn crawl_year(fetcher: &dyn PageFetcher, year: i32, concurrency: usize) -> YearCrawl {
    let concurrency = concurrency.max(1);
    let mut crawl = YearCrawl::default();

    let mut pages = stream::iter(DateToken::year_range(year))
        .map(|token| async move { (token, fetcher.fetch(token).await) })
        .buffer_unordered(concurrency);

    while let Some((token, outcome)) = pages.next().await {
        crawl.stats.requested += 1;
        match outcome {
            Ok(page) if page.is_success() => {
                let listings = normalize(extract(&page.body));
                debug!(date = %token, listings = listings.len(), "page extracted");
                crawl.stats.succeeded += 1;
                crawl.stats.listings += listings.len();
                crawl.events.merge(listings);
            }
            Ok(page) => {
                warn!(date = %token, status = page.status, "skipping non-success page");
                crawl.stats.failed += 1;
            }
            Err(error) => {
                warn!(date = %token, error = %error, "page request failed");
                crawl.stats.failed += 1;
            }
        }
    }

    crawl
}
