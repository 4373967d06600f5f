//! Listing records and the keyed sets they aggregate into.
//!
//! - [`Listing`]: one calendar listing as extracted from a published page
//! - [`EventSet`]: key → listing mapping for one crawl or one snapshot

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::key::EventKey;

/// One calendar listing, as published.
///
/// All fields come from a single page's markup. Fields other than the
/// header pair may be absent when the page carries no matching element;
/// a partially populated listing is normal, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Combined date and time text, e.g. "Jan 5, 2024 3:00 PM".
    #[serde(default)]
    pub date_time: String,
    /// The calendar location text.
    #[serde(default)]
    pub location: String,
    /// The listing title, when a matching description span exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Full inner markup of the listing's notes block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details_html: Option<String>,
    /// Target of the "More details..." link, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_info_url: Option<String>,
}

impl Listing {
    /// Creates a listing with the header fields set.
    pub fn new(date_time: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            date_time: date_time.into(),
            location: location.into(),
            ..Default::default()
        }
    }

    /// Builder method to set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to set the notes markup.
    pub fn with_details_html(mut self, html: impl Into<String>) -> Self {
        self.details_html = Some(html.into());
        self
    }

    /// Builder method to set the "More details..." link target.
    pub fn with_more_info_url(mut self, url: impl Into<String>) -> Self {
        self.more_info_url = Some(url.into());
        self
    }

    /// The listing's durable identity: date/time text then title.
    pub fn key(&self) -> EventKey {
        EventKey::for_listing(&self.date_time, self.title.as_deref())
    }
}

/// A set of listings keyed by content-derived identity.
///
/// Keys are unique and iteration order carries no meaning. Serializes as
/// one JSON object of key → listing, the shape the snapshot store uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventSet(BTreeMap<EventKey, Listing>);

impl EventSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a listing under `key`, replacing any prior entry.
    pub fn insert(&mut self, key: EventKey, listing: Listing) -> Option<Listing> {
        self.0.insert(key, listing)
    }

    /// Merges `other` into `self` without replacing entries already
    /// present. Keys are content-stable, so arrival order is immaterial.
    pub fn merge(&mut self, other: EventSet) {
        for (key, listing) in other.0 {
            self.0.entry(key).or_insert(listing);
        }
    }

    /// Returns the listing stored under `key`, if any.
    pub fn get(&self, key: &EventKey) -> Option<&Listing> {
        self.0.get(key)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &EventKey) -> bool {
        self.0.contains_key(key)
    }

    /// Number of listings in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set holds no listings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates key/listing pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&EventKey, &Listing)> {
        self.0.iter()
    }

    /// Iterates keys.
    pub fn keys(&self) -> impl Iterator<Item = &EventKey> {
        self.0.keys()
    }

    /// Returns the entries of `self` whose keys are absent from
    /// `persisted`. `None` means no snapshot exists yet, so every entry
    /// is new.
    pub fn new_since(&self, persisted: Option<&EventSet>) -> EventSet {
        match persisted {
            None => self.clone(),
            Some(prior) => Self(
                self.0
                    .iter()
                    .filter(|(key, _)| !prior.0.contains_key(key))
                    .map(|(key, listing)| (key.clone(), listing.clone()))
                    .collect(),
            ),
        }
    }
}

impl FromIterator<(EventKey, Listing)> for EventSet {
    fn from_iter<I: IntoIterator<Item = (EventKey, Listing)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for EventSet {
    type Item = (EventKey, Listing);
    type IntoIter = std::collections::btree_map::IntoIter<EventKey, Listing>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
