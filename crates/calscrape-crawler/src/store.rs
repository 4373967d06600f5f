//! Persisted snapshot access.
//!
//! The crawler only ever reads the snapshot; writing it back is the
//! publisher's job and lives outside this crate.

use std::sync::Mutex;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use calscrape_core::EventSet;

use crate::error::{CrawlError, CrawlResult};
use crate::fetch::BoxFuture;

/// Fixed store path of the previously published listing snapshot.
pub const SNAPSHOT_PATH: &str = "/Scraped-Events";

/// Read seam for the persisted snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Reads the current snapshot. `None` means nothing has been
    /// published yet, so every crawled listing counts as new.
    fn read_snapshot(&self) -> BoxFuture<'_, CrawlResult<Option<EventSet>>>;
}

/// Store backed by a Firebase-style REST endpoint.
///
/// Snapshots live at `{base}{path}.json` and read back as one JSON object
/// of key → listing. An absent snapshot reads as the literal `null`.
pub struct RestStore {
    client: Client,
    base_url: Url,
    path: String,
}

impl RestStore {
    /// Creates a store rooted at `base_url`, reading [`SNAPSHOT_PATH`].
    pub fn new(base_url: Url, timeout: Duration) -> CrawlResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            path: SNAPSHOT_PATH.to_string(),
        })
    }

    /// Builder: read a different snapshot path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    fn snapshot_url(&self) -> CrawlResult<Url> {
        Ok(self.base_url.join(&format!("{}.json", self.path))?)
    }
}

impl SnapshotStore for RestStore {
    fn read_snapshot(&self) -> BoxFuture<'_, CrawlResult<Option<EventSet>>> {
        Box::pin(async move {
            let url = self.snapshot_url()?;
            debug!(%url, "reading persisted snapshot");
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(CrawlError::status(status.as_u16(), "snapshot store"));
            }
            let body = response.text().await?;
            decode_snapshot(&body)
        })
    }
}

/// Decodes a snapshot body; the store answers `null` when no snapshot
/// exists yet.
fn decode_snapshot(body: &str) -> CrawlResult<Option<EventSet>> {
    let snapshot: Option<EventSet> = serde_json::from_str(body)?;
    Ok(snapshot)
}

/// In-memory store for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<EventSet>>,
}

impl MemoryStore {
    /// Creates an empty store: reads answer `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `snapshot`.
    pub fn with_snapshot(snapshot: EventSet) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }

    /// Replaces the stored snapshot.
    pub fn replace(&self, snapshot: EventSet) {
        if let Ok(mut guard) = self.snapshot.lock() {
            *guard = Some(snapshot);
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn read_snapshot(&self) -> BoxFuture<'_, CrawlResult<Option<EventSet>>> {
        let snapshot = self.snapshot.lock().ok().and_then(|guard| guard.clone());
        Box::pin(async move { Ok(snapshot) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calscrape_core::{EventKey, Listing};

    #[test]
    fn decode_null_body_as_absent() {
        assert_eq!(decode_snapshot("null").unwrap(), None);
    }

    #[test]
    fn decode_empty_object_as_empty_set() {
        let snapshot = decode_snapshot("{}").unwrap().unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn decode_populated_snapshot() {
        let body = r#"{
            "4a616e20355265636974616c": {
                "date_time": "Jan 5",
                "location": "Main Hall",
                "title": "Recital"
            }
        }"#;
        let snapshot = decode_snapshot(body).unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        let key = EventKey::from_raw("4a616e20355265636974616c");
        assert_eq!(
            snapshot.get(&key).unwrap().title.as_deref(),
            Some("Recital")
        );
    }

    #[test]
    fn decode_garbage_is_an_error() {
        assert!(decode_snapshot("not json").is_err());
    }

    #[test]
    fn snapshot_url_appends_json_suffix() {
        let base = Url::parse("https://store.example.com/").unwrap();
        let store = RestStore::new(base, Duration::from_secs(5)).unwrap();
        let url = store.snapshot_url().unwrap();
        assert_eq!(url.as_str(), "https://store.example.com/Scraped-Events.json");
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.read_snapshot().await.unwrap().is_none());

        let mut snapshot = EventSet::new();
        let listing = Listing::new("Jan 5", "Main Hall").with_title("Recital");
        snapshot.insert(listing.key(), listing);
        store.replace(snapshot.clone());

        assert_eq!(store.read_snapshot().await.unwrap(), Some(snapshot));
    }
}
