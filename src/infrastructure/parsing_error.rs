//! Parsing error types for catalog page extraction
//!
//! Only page-level failures are errors. Problems with a single product entry
//! (filtered title, unreadable price) are reported as skip outcomes instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed {
        url: String,
        reason: String,
        base_url: Option<String>,
    },
}

impl ParsingError {
    pub fn invalid_selector(selector: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }

    pub fn url_resolution_failed(url: &str, reason: impl Into<String>, base_url: Option<&str>) -> Self {
        Self::UrlResolutionFailed {
            url: url.to_string(),
            reason: reason.into(),
            base_url: base_url.map(str::to_string),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
