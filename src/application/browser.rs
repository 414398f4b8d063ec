//! Catalog browser: owns the page/query navigation state and
//! re-invokes listing extraction on navigation or query change.
//!
//! Successful results replace the held entries and page total
//! wholesale; partial results are never merged across pages. A failed
//! fetch leaves both the entries and the page state untouched.

use tracing::{debug, info};

use super::catalog::{CatalogClient, CatalogError};
use crate::domain::entities::ListingEntry;
use crate::domain::page_state::PageState;

/// Outcome of a page navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was fetched and applied.
    Loaded,
    /// The requested page was outside `1..=total_pages`; nothing changed.
    OutOfRange,
}

/// Pagination controller over a catalog client.
pub struct CatalogBrowser {
    client: CatalogClient,
    state: PageState,
    entries: Vec<ListingEntry>,
    no_results: bool,
    pagination_resolved: bool,
}

impl CatalogBrowser {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            state: PageState::default(),
            entries: Vec::new(),
            no_results: false,
            pagination_resolved: true,
        }
    }

    /// Switch the active query (empty = trending feed). Resets to page 1
    /// with a collapsed total pending the fetch result, then fetches.
    pub async fn set_query(&mut self, query: &str) -> Result<(), CatalogError> {
        info!("Switching catalog query to '{}'", query);
        self.state.reset_for_query(query);
        self.fetch_and_apply(query.to_string(), 1).await
    }

    /// Navigate to a 1-based page. Out-of-range targets are a boundary
    /// condition, not an error: nothing is fetched or mutated.
    pub async fn go_to_page(&mut self, page: u32) -> Result<PageOutcome, CatalogError> {
        if !self.state.in_bounds(page) {
            debug!(
                "Page {} out of range (1..={}), ignoring",
                page,
                self.state.total_pages()
            );
            return Ok(PageOutcome::OutOfRange);
        }
        let query = self.state.query().to_string();
        self.fetch_and_apply(query, page).await?;
        Ok(PageOutcome::Loaded)
    }

    /// Re-fetch the current page for the current query.
    pub async fn refresh(&mut self) -> Result<(), CatalogError> {
        let query = self.state.query().to_string();
        let page = self.state.current_page();
        self.fetch_and_apply(query, page).await
    }

    /// Run one listing fetch and apply its result. The request's query
    /// and page are captured before the await; state is mutated only
    /// after the fetch resolves successfully, from those captured
    /// values.
    async fn fetch_and_apply(&mut self, query: String, page: u32) -> Result<(), CatalogError> {
        let result = self.client.fetch_listing(&query, page).await?;

        self.state.apply_fetch(page, result.total_pages);
        self.entries = result.entries;
        self.no_results = result.no_results;
        self.pagination_resolved = result.pagination_resolved;

        debug!(
            "Applied page {}/{} ({} entries)",
            self.state.current_page(),
            self.state.total_pages(),
            self.entries.len()
        );
        Ok(())
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn entries(&self) -> &[ListingEntry] {
        &self.entries
    }

    /// True when the last applied page had no usable entries. Distinct
    /// from a fetch failure, which leaves previous results in place.
    pub fn no_results(&self) -> bool {
        self.no_results
    }

    /// False when the last page total fell back to 1 because a
    /// pagination link existed but did not parse.
    pub fn pagination_resolved(&self) -> bool {
        self.pagination_resolved
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }
}
