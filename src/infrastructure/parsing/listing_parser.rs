//! Listing page extraction.
//!
//! Robust extraction of catalog entries from listing pages: one
//! malformed item is skipped and logged, never allowed to fail the
//! batch. The no-matches marker check takes priority over structural
//! extraction.

#![allow(clippy::uninlined_format_args)]

use scraper::Selector;
use tracing::{debug, warn};
use url::Url;

use super::{ContextualParser, ListingSelectors, ParseContext, ParsingError, ParsingResult};
use crate::domain::entities::{ListingEntry, ListingPage};
use crate::infrastructure::config::aniwave;
use crate::infrastructure::document::{Document, Node};

/// Parser for extracting catalog entries from listing pages
pub struct ListingParser {
    item_selector: Selector,
    name_selector: Selector,
    poster_selector: Selector,
    last_page_selector: Selector,
    no_results_marker: String,
}

impl ListingParser {
    /// Create a listing parser with the default selector table
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default())
    }

    /// Create a listing parser from a custom selector table
    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            item_selector: compile_selector(&selectors.item)?,
            name_selector: compile_selector(&selectors.name_anchor)?,
            poster_selector: compile_selector(&selectors.poster_image)?,
            last_page_selector: compile_selector(&selectors.last_page_link)?,
            no_results_marker: selectors.no_results_marker.clone(),
        })
    }
}

impl ContextualParser for ListingParser {
    type Output = ListingPage;
    type Context = ParseContext;

    fn parse(&self, document: &Document, context: &ParseContext) -> ParsingResult<ListingPage> {
        // The marker check wins over anything else on the page
        if document.full_text().contains(&self.no_results_marker) {
            debug!(
                "No-matches marker found for query '{}' page {}",
                context.query, context.page
            );
            return Ok(ListingPage::no_matches());
        }

        let mut entries = Vec::new();
        for (index, item) in document.select_all(&self.item_selector).iter().enumerate() {
            match self.extract_entry(item) {
                Ok(entry) => entries.push(entry),
                Err(e) if e.is_recoverable() => {
                    warn!(
                        "Skipping item {} on page {}: {}",
                        index, context.page, e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let (total_pages, pagination_resolved) = self.extract_total_pages(document);
        let no_results = entries.is_empty();

        debug!(
            "Extracted {} entries from page {} of {}",
            entries.len(),
            context.page,
            total_pages
        );

        Ok(ListingPage {
            entries,
            no_results,
            total_pages,
            pagination_resolved,
        })
    }
}

impl ListingParser {
    /// Extract a single entry from an item node. Any missing required
    /// field is an error; the caller decides to skip, not abort.
    fn extract_entry(&self, item: &Node<'_>) -> ParsingResult<ListingEntry> {
        let anchor = item.select_first(&self.name_selector).ok_or_else(|| {
            ParsingError::required_field_missing("title", Some("listing item"))
        })?;

        let title = anchor.text();
        if title.is_empty() {
            return Err(ParsingError::required_field_missing(
                "title",
                Some("listing item"),
            ));
        }

        let detail_url = anchor
            .attr("href")
            .ok_or_else(|| ParsingError::required_field_missing("detail_url", Some("listing item")))?
            .to_string();

        let poster_url = item
            .select_first(&self.poster_selector)
            .and_then(|img| img.attr("src"))
            .ok_or_else(|| ParsingError::required_field_missing("poster_url", Some("listing item")))?
            .to_string();

        Ok(ListingEntry::new(title, poster_url, detail_url))
    }

    /// Derive the total page count from the last-page pagination link.
    ///
    /// No link at all means a genuinely single page. A link whose page
    /// parameter does not parse falls back to 1 as well, but the second
    /// element of the pair flags the fallback so callers can tell the
    /// two cases apart.
    fn extract_total_pages(&self, document: &Document) -> (u32, bool) {
        let Some(link) = document.select_first(&self.last_page_selector) else {
            return (1, true);
        };

        let Some(href) = link.attr("href") else {
            warn!("Last-page link has no href attribute");
            return (1, false);
        };

        match page_number_param(href) {
            Some(page) if page >= 1 => (page, true),
            _ => {
                warn!("Last-page link present but page number unparsable: {}", href);
                (1, false)
            }
        }
    }
}

/// Parse the page-number query parameter out of a pagination href,
/// which may be relative or absolute.
fn page_number_param(href: &str) -> Option<u32> {
    let absolute = Url::parse(href)
        .or_else(|_| Url::parse(aniwave::BASE_URL).and_then(|base| base.join(href)))
        .ok()?;

    absolute
        .query_pairs()
        .find(|(key, _)| key == aniwave::PAGE_PARAM)
        .and_then(|(_, value)| value.parse().ok())
}

fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| {
        warn!("Failed to compile selector '{}': {}", selector, e);
        ParsingError::invalid_selector(selector, e)
    })
}
