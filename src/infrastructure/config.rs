//! Site endpoints, URL builders and operational defaults.
//!
//! Everything that names a remote location lives here so that upstream
//! site changes touch constants, not extraction or navigation logic.

use url::Url;

/// Aniwave catalog site constants
pub mod aniwave {
    /// Base origin against which relative detail links are resolved
    pub const BASE_URL: &str = "https://aniwave.se";

    /// Trending feed path, paginated with a 1-based `page` parameter
    pub const TRENDING_PATH: &str = "/trending-anime/";

    /// Search endpoint, takes `keyword` and `page` parameters
    pub const FILTER_PATH: &str = "/filter";

    /// Literal phrase the site renders when a search matches nothing.
    /// Checked against the whole document text before any structural
    /// extraction is attempted.
    pub const NO_RESULTS_MARKER: &str = "No matching records found";

    /// Query parameter carrying the page number in pagination links
    pub const PAGE_PARAM: &str = "page";
}

/// Default operational parameters
pub mod defaults {
    use std::time::Duration;

    /// Automatic retry attempts per asset before the key is marked failed
    pub const MAX_ASSET_RETRIES: u32 = 3;

    /// Fixed delay between asset retry attempts. Deliberately not
    /// exponential: the asset host is assumed low-latency.
    pub const ASSET_RETRY_DELAY: Duration = Duration::from_secs(2);

    /// Resolved entries kept before the oldest are evicted
    pub const ASSET_CACHE_CAPACITY: usize = 256;

    /// HTTP request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Rate limit applied to outbound requests
    pub const MAX_REQUESTS_PER_SECOND: u32 = 5;
}

/// Build the listing page URL for the given query and 1-based page.
///
/// An empty query selects the trending feed; otherwise the search filter
/// endpoint is used with a percent-encoded keyword.
pub fn listing_url(base_url: &str, query: &str, page: u32) -> Result<String, url::ParseError> {
    let base = Url::parse(base_url)?;
    let mut url = if query.is_empty() {
        base.join(aniwave::TRENDING_PATH)?
    } else {
        base.join(aniwave::FILTER_PATH)?
    };

    {
        let mut pairs = url.query_pairs_mut();
        if !query.is_empty() {
            pairs.append_pair("keyword", query);
        }
        pairs.append_pair(aniwave::PAGE_PARAM, &page.to_string());
    }

    Ok(url.into())
}

/// Resolve a detail path from a listing entry against the site origin.
/// Absolute URLs pass through untouched.
pub fn detail_url(base_url: &str, detail_path: &str) -> Result<String, url::ParseError> {
    if detail_path.starts_with("http://") || detail_path.starts_with("https://") {
        return Ok(detail_path.to_string());
    }
    let base = Url::parse(base_url)?;
    Ok(base.join(detail_path)?.into())
}
