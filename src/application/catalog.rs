//! Catalog fetch service: builds request URLs, runs them through the
//! transport and hands the documents to the extraction parsers.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::entities::{DetailRecord, ListingPage};
use crate::infrastructure::config;
use crate::infrastructure::document::Document;
use crate::infrastructure::http_client::{FetchError, Transport};
use crate::infrastructure::parsing::{
    ContextualParser, DetailParseContext, DetailParser, ListingParser, ParseContext, ParsingError,
    SelectorConfig,
};

/// Errors surfaced by catalog operations.
///
/// Network failures are reported as-is without retry at this layer;
/// retrying a listing or detail fetch is the caller's decision.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParsingError),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Fetch-and-extract service for listing and detail pages.
pub struct CatalogClient {
    transport: Arc<dyn Transport>,
    listing_parser: ListingParser,
    detail_parser: DetailParser,
    base_url: String,
}

impl CatalogClient {
    /// Create a client with the default selector tables and site base.
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self, ParsingError> {
        Self::with_config(
            transport,
            &SelectorConfig::default(),
            config::aniwave::BASE_URL,
        )
    }

    /// Create a client with custom selectors and base origin.
    pub fn with_config(
        transport: Arc<dyn Transport>,
        selectors: &SelectorConfig,
        base_url: &str,
    ) -> Result<Self, ParsingError> {
        Ok(Self {
            transport,
            listing_parser: ListingParser::with_config(&selectors.listing)?,
            detail_parser: DetailParser::with_config(&selectors.detail)?,
            base_url: base_url.to_string(),
        })
    }

    /// Fetch and extract one listing page for `query` (empty = trending).
    pub async fn fetch_listing(&self, query: &str, page: u32) -> Result<ListingPage, CatalogError> {
        self.fetch_listing_with_cancellation(query, page, CancellationToken::new())
            .await
    }

    /// Cancellable listing fetch. A cancelled request surfaces as
    /// `FetchError::Cancelled`; the caller discards it without applying.
    pub async fn fetch_listing_with_cancellation(
        &self,
        query: &str,
        page: u32,
        token: CancellationToken,
    ) -> Result<ListingPage, CatalogError> {
        let url = config::listing_url(&self.base_url, query, page)?;
        debug!("Fetching listing page {} for query '{}'", page, query);

        let bytes = self.transport.fetch(&url, token).await?;
        let document = Document::parse(&bytes)?;

        let context = ParseContext::new(page, query);
        Ok(self.listing_parser.parse(&document, &context)?)
    }

    /// Fetch and extract a detail page from a relative path produced by
    /// listing extraction.
    pub async fn fetch_detail(&self, detail_path: &str) -> Result<DetailRecord, CatalogError> {
        self.fetch_detail_with_cancellation(detail_path, CancellationToken::new())
            .await
    }

    /// Cancellable detail fetch.
    pub async fn fetch_detail_with_cancellation(
        &self,
        detail_path: &str,
        token: CancellationToken,
    ) -> Result<DetailRecord, CatalogError> {
        let url = config::detail_url(&self.base_url, detail_path)?;
        debug!("Fetching detail page: {}", url);

        let bytes = self.transport.fetch(&url, token).await?;
        let document = Document::parse(&bytes)?;

        let context = DetailParseContext::new(url.as_str());
        Ok(self.detail_parser.parse(&document, &context)?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
