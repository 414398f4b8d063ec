//! Aniscope - Anime catalog scraping library
//!
//! This crate turns the loosely-structured HTML of an anime catalog site
//! into typed domain records (listing entries and detail records) and
//! manages a bounded, retrying in-memory cache for poster images.
//! Presentation is out of scope: consumers receive value records and
//! read-only cache snapshots.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export the types most consumers need
pub use application::browser::{CatalogBrowser, PageOutcome};
pub use application::catalog::{CatalogClient, CatalogError};
pub use domain::entities::{DetailRecord, ListingEntry, ListingPage, TitleCategory};
pub use domain::page_state::PageState;
pub use infrastructure::asset_cache::{AssetCache, AssetCacheConfig, AssetStatus, AssetSubscription};
pub use infrastructure::document::{Document, Node};
pub use infrastructure::http_client::{FetchError, HttpClient, HttpClientConfig, Transport};
pub use infrastructure::parsing::{
    ContextualParser, DetailParseContext, DetailParser, ListingParser, ParseContext, ParsingError,
    ParsingResult, SelectorConfig,
};
