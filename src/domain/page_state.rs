//! Page navigation state for the catalog browser.
//!
//! Responsibility:
//! - current/total page bookkeeping with the `current_page <= total_pages`
//!   invariant after every successful fetch
//! - active query tracking (empty query = trending/default mode)

/// Navigation state owned and exclusively mutated by `CatalogBrowser`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    current_page: u32,
    total_pages: u32,
    query: String,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            query: String::new(),
        }
    }
}

impl PageState {
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// True when no search query is active and the trending feed is shown.
    pub fn is_trending(&self) -> bool {
        self.query.is_empty()
    }

    /// Whether `page` is a navigable target given the current total.
    pub fn in_bounds(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }

    /// Switch the active query. Resets to page 1 and collapses the total to
    /// 1 pending the next fetch result.
    pub(crate) fn reset_for_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.current_page = 1;
        self.total_pages = 1;
    }

    /// Apply the outcome of a successful listing fetch. The page the fetch
    /// was issued for becomes current, clamped into the freshly reported
    /// total so the invariant holds even if the total shrank under us.
    pub(crate) fn apply_fetch(&mut self, fetched_page: u32, total_pages: u32) {
        self.total_pages = total_pages.max(1);
        self.current_page = fetched_page.clamp(1, self.total_pages);
    }
}
