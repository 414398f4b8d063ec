//! Infrastructure layer: site configuration, HTTP transport, HTML
//! document access, extraction parsers and the poster asset cache.

pub mod asset_cache;
pub mod config;
pub mod document;
pub mod http_client;
pub mod logging;
pub mod parsing;

pub use asset_cache::{AssetCache, AssetCacheConfig, AssetStatus};
pub use document::{Document, Node};
pub use http_client::{FetchError, HttpClient, HttpClientConfig, Transport};
pub use parsing::{DetailParser, ListingParser, ParsingError, ParsingResult};
