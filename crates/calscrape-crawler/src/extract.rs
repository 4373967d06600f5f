//! Listing extraction from published calendar pages.
//!
//! The print view renders each event as three sibling element groups:
//! a header block (date/time and location), a description span (title
//! link), and a notes block (free-form markup plus an optional
//! "More details..." link). The groups appear in the same document order,
//! so the extractor carries an explicit document-order index through each
//! pass and merges the three partial reads into one record per index. An
//! index missing from one pass yields a partially populated listing, not
//! an error.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use calscrape_core::{EventSet, Listing};

/// Exact paragraph text that marks the extra-info link.
const MORE_DETAILS: &str = "More details...";

static HEADER: LazyLock<Selector> = LazyLock::new(|| sel("div.twRyoPhotoEventsItemHeader"));
static HEADER_DATE: LazyLock<Selector> = LazyLock::new(|| sel(".twRyoPhotoEventsItemHeaderDate"));
static HEADER_LOCATION: LazyLock<Selector> =
    LazyLock::new(|| sel(".twRyoPhotoEventsItemHeaderLocation"));
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| sel("span.twRyoPhotoEventsDescription"));
static NOTES: LazyLock<Selector> = LazyLock::new(|| sel("div.twRyoPhotoEventsNotes"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| sel("p"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| sel("a"));

fn sel(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector")
}

/// Extracts positional listings from one page's markup.
///
/// Infallible: an empty or unrecognized document yields an empty map, and
/// missing structural pieces yield partially populated listings.
pub fn extract(html: &str) -> BTreeMap<usize, Listing> {
    let document = Html::parse_document(html);
    let mut listings: BTreeMap<usize, Listing> = BTreeMap::new();

    for (index, header) in document.select(&HEADER).enumerate() {
        let entry = listings.entry(index).or_default();
        entry.date_time = child_text(header, &HEADER_DATE);
        entry.location = child_text(header, &HEADER_LOCATION);
    }

    for (index, description) in document.select(&DESCRIPTION).enumerate() {
        if let Some(anchor) = description.select(&ANCHOR).next() {
            listings.entry(index).or_default().title = Some(collect_text(anchor));
        }
    }

    for (index, notes) in document.select(&NOTES).enumerate() {
        let entry = listings.entry(index).or_default();
        for paragraph in notes.select(&PARAGRAPH) {
            if collect_text(paragraph) == MORE_DETAILS {
                entry.more_info_url = paragraph
                    .select(&ANCHOR)
                    .next()
                    .and_then(|anchor| anchor.value().attr("href"))
                    .map(str::to_string);
            }
        }
        entry.details_html = Some(notes.inner_html());
    }

    listings
}

/// Re-keys positional extraction output by each listing's content-derived
/// identity. Within one document the last listing with a given key wins.
pub fn normalize(positional: BTreeMap<usize, Listing>) -> EventSet {
    let mut set = EventSet::new();
    for (_, listing) in positional {
        let key = listing.key();
        set.insert(key, listing);
    }
    set
}

fn child_text(parent: ElementRef<'_>, selector: &Selector) -> String {
    parent
        .select(selector)
        .next()
        .map(collect_text)
        .unwrap_or_default()
}

fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calscrape_core::EventKey;

    const SINGLE_EVENT: &str = r##"
        <div class="twRyoPhotoEventsItemHeader">
          <span class="twRyoPhotoEventsItemHeaderDate"> Jan 5, 2024 3:00 PM </span>
          <span class="twRyoPhotoEventsItemHeaderLocation"> Main Hall </span>
        </div>
        <span class="twRyoPhotoEventsDescription"><a href="#">Recital</a></span>
        <div class="twRyoPhotoEventsNotes">
          <p>Doors open at 2:30.</p>
          <p><a href="/info/1">More details...</a></p>
        </div>
    "##;

    #[test]
    fn empty_document_yields_empty_map() {
        assert!(extract("").is_empty());
    }

    #[test]
    fn document_without_listings_yields_empty_map() {
        assert!(extract("<html><body><p>Nothing today.</p></body></html>").is_empty());
    }

    #[test]
    fn single_event_fully_populated() {
        let listings = extract(SINGLE_EVENT);
        assert_eq!(listings.len(), 1);

        let listing = &listings[&0];
        assert_eq!(listing.date_time, "Jan 5, 2024 3:00 PM");
        assert_eq!(listing.location, "Main Hall");
        assert_eq!(listing.title.as_deref(), Some("Recital"));
        assert_eq!(listing.more_info_url.as_deref(), Some("/info/1"));
        let details = listing.details_html.as_deref().unwrap();
        assert!(details.contains("Doors open at 2:30."));
    }

    #[test]
    fn second_listing_without_description_has_no_title() {
        let html = r##"
            <div class="twRyoPhotoEventsItemHeader">
              <span class="twRyoPhotoEventsItemHeaderDate">Jan 5, 2024 3:00 PM</span>
              <span class="twRyoPhotoEventsItemHeaderLocation">Main Hall</span>
            </div>
            <div class="twRyoPhotoEventsItemHeader">
              <span class="twRyoPhotoEventsItemHeaderDate">Jan 6, 2024 7:00 PM</span>
              <span class="twRyoPhotoEventsItemHeaderLocation">Annex</span>
            </div>
            <span class="twRyoPhotoEventsDescription"><a href="#">Recital</a></span>
        "##;
        let listings = extract(html);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[&0].title.as_deref(), Some("Recital"));
        assert!(listings[&1].title.is_none());
        assert_eq!(listings[&1].date_time, "Jan 6, 2024 7:00 PM");
    }

    #[test]
    fn sentinel_must_match_exactly() {
        let html = r#"
            <div class="twRyoPhotoEventsNotes">
              <p><a href="/info/1">More details here</a></p>
            </div>
        "#;
        let listings = extract(html);
        assert_eq!(listings.len(), 1);
        assert!(listings[&0].more_info_url.is_none());
        assert!(listings[&0].details_html.is_some());
    }

    #[test]
    fn header_missing_children_yields_empty_fields() {
        let html = r#"<div class="twRyoPhotoEventsItemHeader"></div>"#;
        let listings = extract(html);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[&0].date_time, "");
        assert_eq!(listings[&0].location, "");
    }

    #[test]
    fn normalize_keys_by_identity() {
        let set = normalize(extract(SINGLE_EVENT));
        assert_eq!(set.len(), 1);
        let expected = EventKey::derive("Jan 5, 2024 3:00 PMRecital");
        assert!(set.contains_key(&expected));
    }

    #[test]
    fn normalize_last_writer_wins_on_identical_identity() {
        let mut positional = BTreeMap::new();
        positional.insert(
            0,
            Listing::new("Jan 5, 2024 3:00 PM", "Main Hall").with_title("Recital"),
        );
        positional.insert(
            1,
            Listing::new("Jan 5, 2024 3:00 PM", "Annex").with_title("Recital"),
        );

        let set = normalize(positional);
        assert_eq!(set.len(), 1);
        let key = EventKey::derive("Jan 5, 2024 3:00 PMRecital");
        assert_eq!(set.get(&key).unwrap().location, "Annex");
    }
}
