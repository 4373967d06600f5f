//! Publisher seam for newly discovered listings.
//!
//! Each cycle hands its new-events set to an [`EventSink`]. How the set is
//! persisted or broadcast is up to the sink implementation; the crawler
//! ships a logging sink for the daemon and a channel sink for tests and
//! embedders.

use tokio::sync::mpsc;
use tracing::info;

use calscrape_core::EventSet;

use crate::error::CrawlResult;
use crate::fetch::BoxFuture;

/// Consumer of each cycle's new-events set.
pub trait EventSink: Send + Sync {
    /// Hands over one cycle's newly discovered listings. Called once per
    /// cycle, possibly with an empty set.
    fn publish(&self, new_events: EventSet) -> BoxFuture<'_, CrawlResult<()>>;
}

/// Sink that only logs what a publisher would persist.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, new_events: EventSet) -> BoxFuture<'_, CrawlResult<()>> {
        Box::pin(async move {
            info!(new_events = new_events.len(), "cycle produced new listings");
            for key in new_events.keys() {
                info!(%key, "new listing");
            }
            Ok(())
        })
    }
}

/// Sink that forwards each cycle's set over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<EventSet>,
}

impl ChannelSink {
    /// Creates a sink and the receiving end for its emissions.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EventSet>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, new_events: EventSet) -> BoxFuture<'_, CrawlResult<()>> {
        // A closed receiver just drops the emission; publishing stays
        // non-fatal either way.
        let _ = self.sender.send(new_events);
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calscrape_core::Listing;

    fn one_listing() -> EventSet {
        let mut set = EventSet::new();
        let listing = Listing::new("Jan 5", "Main Hall").with_title("Recital");
        set.insert(listing.key(), listing);
        set
    }

    #[tokio::test]
    async fn log_sink_accepts_any_set() {
        let sink = LogSink;
        sink.publish(EventSet::new()).await.unwrap();
        sink.publish(one_listing()).await.unwrap();
    }

    #[tokio::test]
    async fn channel_sink_forwards_sets() {
        let (sink, mut receiver) = ChannelSink::new();
        sink.publish(one_listing()).await.unwrap();

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.len(), 1);
    }

    #[tokio::test]
    async fn channel_sink_tolerates_closed_receiver() {
        let (sink, receiver) = ChannelSink::new();
        drop(receiver);
        sink.publish(one_listing()).await.unwrap();
    }
}
