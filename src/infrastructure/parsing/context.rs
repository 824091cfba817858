//! Parsing context for catalog page extraction
//!
//! Carries where a page came from so log lines can name it.

/// Context information for parsing operations
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Crawl label: the category display name or the studded index
    pub label: String,

    /// 1-based position of the page in its pagination chain
    pub page_number: u32,

    /// URL the page body was fetched from
    pub page_url: String,
}

impl ParseContext {
    pub fn new(label: impl Into<String>, page_number: u32, page_url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            page_number,
            page_url: page_url.into(),
        }
    }

    /// Context for ad-hoc parsing outside a crawl (tests, benchmarks)
    pub fn detached() -> Self {
        Self::new("detached", 1, "about:blank")
    }
}
