//! Selector tables for listing and detail extraction.
//!
//! The structural queries are configuration, not code: when the site's
//! markup shifts, the strings below change and the parsers stay intact.

use serde::{Deserialize, Serialize};

use crate::infrastructure::config::aniwave;

/// Complete selector configuration for both page kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub listing: ListingSelectors,
    pub detail: DetailSelectors,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing: ListingSelectors::default(),
            detail: DetailSelectors::default(),
        }
    }
}

impl SelectorConfig {
    /// Load a selector table from its JSON representation.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize the table, e.g. to seed an editable config file.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// CSS selectors for catalog listing pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// One node per catalog item
    pub item: String,

    /// Anchor inside an item carrying both the title text and detail href
    pub name_anchor: String,

    /// Image node inside an item carrying the poster source
    pub poster_image: String,

    /// Pagination link pointing at the last page
    pub last_page_link: String,

    /// Marker phrase rendered when a search matches nothing
    pub no_results_marker: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            item: "div.item".to_string(),
            name_anchor: "a.name".to_string(),
            poster_image: "img".to_string(),
            last_page_link: "ul.pagination li a[rel=last]".to_string(),
            no_results_marker: aniwave::NO_RESULTS_MARKER.to_string(),
        }
    }
}

/// CSS selectors for item detail pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailSelectors {
    /// Title heading
    pub title: String,

    /// Synopsis content block
    pub synopsis: String,

    /// Metadata rows scanned for label:value pairs
    pub metadata_row: String,

    /// Labels keying the metadata rows of interest
    pub type_label: String,
    pub episodes_label: String,
    pub premiered_label: String,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            title: "h1[itemprop=name]".to_string(),
            synopsis: "div.synopsis div.content".to_string(),
            metadata_row: "div.meta > div".to_string(),
            type_label: "Type".to_string(),
            episodes_label: "Episodes".to_string(),
            premiered_label: "Premiered".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip_preserves_selectors() {
        let config = SelectorConfig::default();
        let json = config.to_json().unwrap();
        let restored = SelectorConfig::from_json(&json).unwrap();

        assert_eq!(restored.listing.item, config.listing.item);
        assert_eq!(restored.listing.no_results_marker, config.listing.no_results_marker);
        assert_eq!(restored.detail.title, config.detail.title);
        assert_eq!(restored.detail.premiered_label, config.detail.premiered_label);
    }

    #[test]
    fn test_edited_json_overrides_default_selector() {
        let mut json: serde_json::Value =
            serde_json::to_value(SelectorConfig::default()).unwrap();
        json["listing"]["item"] = serde_json::Value::String("li.entry".to_string());

        let config = SelectorConfig::from_json(&json.to_string()).unwrap();
        assert_eq!(config.listing.item, "li.entry");
        // Untouched fields keep their defaults
        assert_eq!(config.listing.name_anchor, "a.name");
    }
}
