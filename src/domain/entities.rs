//! Core value records produced by listing and detail extraction.
//!
//! These are immutable snapshots: a successful fetch replaces them
//! wholesale, nothing patches them in place.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single entry on a catalog listing page.
///
/// Identity is synthetic: the source does not guarantee uniqueness of
/// titles or URLs, so every extracted entry gets a fresh id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingEntry {
    pub id: Uuid,
    pub title: String,
    pub poster_url: String,
    /// Relative detail path as found in the markup; resolved against the
    /// site base origin only when the detail page is actually requested.
    pub detail_url: String,
}

impl ListingEntry {
    pub fn new(title: String, poster_url: String, detail_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            poster_url,
            detail_url,
        }
    }
}

/// Category of a catalog title as advertised on its detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleCategory {
    Tv,
    Movie,
    Unknown,
}

/// Structured record extracted from an item detail page.
///
/// Every field degrades independently to its documented default; detail
/// extraction never fails as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub title: String,
    /// Empty string means the page carried no synopsis.
    pub synopsis: String,
    pub category: TitleCategory,
    pub episode_count: u32,
    pub premiere_year: Option<String>,
}

impl Default for DetailRecord {
    fn default() -> Self {
        Self {
            title: "Unknown Title".to_string(),
            synopsis: String::new(),
            category: TitleCategory::Unknown,
            episode_count: 0,
            premiere_year: None,
        }
    }
}

/// Result of extracting one catalog listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingPage {
    pub entries: Vec<ListingEntry>,
    /// True when the page carried the no-matches marker or yielded no
    /// usable entries. Distinct from a failed fetch.
    pub no_results: bool,
    /// Always at least 1.
    pub total_pages: u32,
    /// False when a pagination link was present but its page number could
    /// not be parsed; `total_pages` then holds the safe default of 1.
    pub pagination_resolved: bool,
}

impl ListingPage {
    /// The canonical empty result for a page carrying the no-matches marker.
    pub fn no_matches() -> Self {
        Self {
            entries: Vec::new(),
            no_results: true,
            total_pages: 1,
            pagination_resolved: true,
        }
    }
}
