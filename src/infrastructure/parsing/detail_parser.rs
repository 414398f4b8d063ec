//! Detail page extraction.
//!
//! Every field is extracted independently and degrades to its documented
//! default; a detail record is always produced, no matter how little of
//! the page survives.

#![allow(clippy::uninlined_format_args)]

use scraper::Selector;
use tracing::{debug, warn};

use super::{ContextualParser, DetailParseContext, DetailSelectors, ParsingError, ParsingResult};
use crate::domain::entities::{DetailRecord, TitleCategory};
use crate::infrastructure::document::Document;

/// Parser for extracting a structured record from an item detail page
pub struct DetailParser {
    title_selector: Selector,
    synopsis_selector: Selector,
    metadata_row_selector: Selector,
    type_label: String,
    episodes_label: String,
    premiered_label: String,
}

impl DetailParser {
    /// Create a detail parser with the default selector table
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&DetailSelectors::default())
    }

    /// Create a detail parser from a custom selector table
    pub fn with_config(selectors: &DetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            title_selector: compile_selector(&selectors.title)?,
            synopsis_selector: compile_selector(&selectors.synopsis)?,
            metadata_row_selector: compile_selector(&selectors.metadata_row)?,
            type_label: selectors.type_label.clone(),
            episodes_label: selectors.episodes_label.clone(),
            premiered_label: selectors.premiered_label.clone(),
        })
    }
}

impl ContextualParser for DetailParser {
    type Output = DetailRecord;
    type Context = DetailParseContext;

    /// Extract a detail record. Infallible by design: the `Err` arm of
    /// the result is never taken for well-formed input and exists only
    /// to satisfy the parser trait.
    fn parse(&self, document: &Document, context: &DetailParseContext) -> ParsingResult<DetailRecord> {
        debug!("Parsing detail page: {}", context.url);

        let mut record = DetailRecord::default();

        if let Some(title) = self.extract_text(document, &self.title_selector) {
            record.title = title;
        }

        if let Some(synopsis) = self.extract_text(document, &self.synopsis_selector) {
            record.synopsis = synopsis;
        }

        self.scan_metadata(document, &mut record);

        Ok(record)
    }
}

impl DetailParser {
    /// Non-empty trimmed text of the first match, if any.
    fn extract_text(&self, document: &Document, selector: &Selector) -> Option<String> {
        document
            .select_first(selector)
            .map(|node| node.text())
            .filter(|text| !text.is_empty())
    }

    /// Walk the metadata rows looking for the labelled values of
    /// interest. Unrecognized labels are ignored.
    fn scan_metadata(&self, document: &Document, record: &mut DetailRecord) {
        for row in document.select_all(&self.metadata_row_selector) {
            let Some((label, value)) = split_labelled_row(&row.text()) else {
                continue;
            };

            if label.eq_ignore_ascii_case(&self.type_label) {
                record.category = map_category(&value);
            } else if label.eq_ignore_ascii_case(&self.episodes_label) {
                record.episode_count = leading_integer(&value).unwrap_or_else(|| {
                    warn!("Unparsable episode count: '{}'", value);
                    0
                });
            } else if label.eq_ignore_ascii_case(&self.premiered_label) && !value.is_empty() {
                record.premiere_year = Some(value);
            }
        }
    }
}

/// Split a "Label: value" row into its trimmed parts.
fn split_labelled_row(text: &str) -> Option<(String, String)> {
    let (label, value) = text.split_once(':')?;
    Some((label.trim().to_string(), value.trim().to_string()))
}

/// Map the site's type text onto a category. Anything unrecognized is
/// Unknown rather than an error.
fn map_category(value: &str) -> TitleCategory {
    let lowered = value.to_lowercase();
    if lowered.contains("movie") {
        TitleCategory::Movie
    } else if lowered.contains("tv") {
        TitleCategory::Tv
    } else {
        TitleCategory::Unknown
    }
}

/// Parse the leading decimal digits of a value like "12" or "12 / 24".
fn leading_integer(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| {
        warn!("Failed to compile selector '{}': {}", selector, e);
        ParsingError::invalid_selector(selector, e)
    })
}
