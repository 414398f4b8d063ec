//! HTML extraction for catalog listing and detail pages.
//!
//! Trait-based parser architecture with selector tables kept as data,
//! so adapting to upstream markup changes touches configuration, not
//! the extraction algorithms.

pub mod config;
pub mod context;
pub mod detail_parser;
pub mod error;
pub mod listing_parser;

// Re-export public types
pub use config::{DetailSelectors, ListingSelectors, SelectorConfig};
pub use context::{DetailParseContext, ParseContext};
pub use detail_parser::DetailParser;
pub use error::{ParsingError, ParsingResult};
pub use listing_parser::ListingParser;

use crate::infrastructure::document::Document;

/// Parser over a parsed document with contextual information.
pub trait ContextualParser {
    type Output;
    type Context;

    /// Extract structured output from a parsed document.
    fn parse(&self, document: &Document, context: &Self::Context) -> ParsingResult<Self::Output>;
}
