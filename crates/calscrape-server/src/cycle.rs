//! One crawl-diff-publish pass.

use tracing::info;

use calscrape_crawler::{EventSink, PageFetcher, SnapshotStore, crawl_year};

use crate::error::ServerResult;

/// Runs one full cycle for `year`: crawl every date page, read the
/// persisted snapshot, keep only the listings absent from it, and hand
/// those to the sink. Returns how many new listings were emitted.
///
/// # Errors
///
/// Returns an error when the snapshot read or the publish step fails.
/// Individual page failures are absorbed by the crawl and only show up in
/// its counters.
pub async fn run_cycle(
    fetcher: &dyn PageFetcher,
    store: &dyn SnapshotStore,
    sink: &dyn EventSink,
    year: i32,
    concurrency: usize,
) -> ServerResult<usize> {
    let crawl = crawl_year(fetcher, year, concurrency).await;
    info!(
        year,
        succeeded = crawl.stats.succeeded,
        failed = crawl.stats.failed,
        listings = crawl.stats.listings,
        "year crawl settled"
    );

    let persisted = store.read_snapshot().await?;
    let new_events = crawl.events.new_since(persisted.as_ref());
    let count = new_events.len();
    sink.publish(new_events).await?;
    Ok(count)
}
