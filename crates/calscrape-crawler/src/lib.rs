//! The calscrape crawl pipeline.
//!
//! This crate turns a year of published calendar pages into one set of
//! listings and diffs it against the persisted snapshot:
//!
//! ```text
//! DateToken (12 × 30) ──► PageFetcher ──► extract() ──► normalize()
//!                                                          │
//!                                         merge per year   ▼
//! SnapshotStore ──► EventSet::new_since ◄────────── YearCrawl.events
//!                         │
//!                         ▼
//!                     EventSink
//! ```
//!
//! Every seam ([`PageFetcher`], [`SnapshotStore`], [`EventSink`]) is a
//! trait so the pipeline runs under test without a network.

pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod publish;
pub mod store;

pub use crawl::{CrawlStats, DEFAULT_CONCURRENCY, YearCrawl, crawl_year};
pub use error::{CrawlError, CrawlResult};
pub use extract::{extract, normalize};
pub use fetch::{BoxFuture, DateToken, FetchedPage, HttpFetcher, PageFetcher};
pub use publish::{ChannelSink, EventSink, LogSink};
pub use store::{MemoryStore, RestStore, SNAPSHOT_PATH, SnapshotStore};
