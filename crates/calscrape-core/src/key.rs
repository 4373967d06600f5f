//! Content-derived identity keys for listings.
//!
//! A listing's durable identity across crawl cycles is the hexadecimal
//! encoding of its date/time text followed by its title. This is an
//! encoding, not a hash: identical inputs always produce identical keys,
//! and realistic (date/time, title) pairs do not collide in practice.

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Opaque, deterministic key for one listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKey(String);

impl EventKey {
    /// Encodes arbitrary text into a key.
    ///
    /// Each character's code point is rendered as unpadded lowercase hex
    /// and concatenated. Empty input yields an empty key. Order-sensitive:
    /// `derive("ab")` differs from `derive("ba")`.
    pub fn derive(text: &str) -> Self {
        let mut hex = String::with_capacity(text.len() * 2);
        for ch in text.chars() {
            // Writing to a String cannot fail.
            let _ = write!(hex, "{:x}", ch as u32);
        }
        Self(hex.trim().to_string())
    }

    /// Derives the key for a listing from its date/time text and title,
    /// concatenated in that order. A missing title contributes nothing.
    pub fn for_listing(date_time: &str, title: Option<&str>) -> Self {
        match title {
            Some(title) => {
                let mut text = String::with_capacity(date_time.len() + title.len());
                text.push_str(date_time);
                text.push_str(title);
                Self::derive(&text)
            }
            None => Self::derive(date_time),
        }
    }

    /// Wraps an already-derived key, e.g. one read back from the store.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the key is empty (derived from empty input).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EventKey> for String {
    fn from(key: EventKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(EventKey::derive("A").as_str(), "41");
        assert_eq!(EventKey::derive("Hi").as_str(), "4869");
    }

    #[test]
    fn empty_input_yields_empty_key() {
        let key = EventKey::derive("");
        assert!(key.is_empty());
        assert_eq!(key.as_str(), "");
    }

    #[test]
    fn deterministic() {
        let a = EventKey::derive("Jan 5, 2024 3:00 PMRecital");
        let b = EventKey::derive("Jan 5, 2024 3:00 PMRecital");
        assert_eq!(a, b);
    }

    #[test]
    fn order_sensitive() {
        assert_ne!(EventKey::derive("ab"), EventKey::derive("ba"));
    }

    #[test]
    fn distinct_realistic_pairs() {
        let pairs = [
            ("Jan 5, 2024 3:00 PM", "Recital"),
            ("Jan 5, 2024 3:00 PM", "Lecture"),
            ("Jan 6, 2024 3:00 PM", "Recital"),
            ("Feb 14, 2024 7:30 PM", "Gallery Opening"),
        ];
        let keys: Vec<_> = pairs
            .iter()
            .map(|(dt, title)| EventKey::for_listing(dt, Some(title)))
            .collect();
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn missing_title_falls_back_to_date_only() {
        let with_none = EventKey::for_listing("Jan 5, 2024", None);
        let date_only = EventKey::derive("Jan 5, 2024");
        assert_eq!(with_none, date_only);
    }

    #[test]
    fn handles_non_ascii() {
        let key = EventKey::derive("café");
        // 'é' is U+00E9, rendered unpadded.
        assert_eq!(key.as_str(), "636166e9");
    }

    #[test]
    fn serde_is_transparent() {
        let key = EventKey::derive("Hi");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"4869\"");
        let parsed: EventKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, parsed);
    }
}
