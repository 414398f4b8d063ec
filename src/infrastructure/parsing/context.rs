//! Context objects carried through parsing operations.

/// Context for parsing a catalog listing page
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// 1-based page the document was fetched for
    pub page: u32,

    /// Active search query, empty in trending mode
    pub query: String,
}

impl ParseContext {
    pub fn new(page: u32, query: impl Into<String>) -> Self {
        Self {
            page,
            query: query.into(),
        }
    }
}

/// Context for parsing an item detail page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// URL the document was fetched from, for logging
    pub url: String,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
