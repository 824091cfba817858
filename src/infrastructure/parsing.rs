//! HTML parsing infrastructure for catalog listing pages
//!
//! Extraction is written against [`MarkupNode`], a small view of an
//! element tree. Production code drives it with scraper (see [`html_node`]);
//! tests can drive it with hand-built trees.

pub mod config;
pub mod context;
pub mod error;
pub mod html_node;
pub mod product_list_parser;

// Re-export public types
pub use config::CatalogSelectors;
pub use context::ParseContext;
pub use error::{ParsingError, ParsingResult};
pub use html_node::{HtmlNode, SelectorSet};
pub use product_list_parser::{EntryOutcome, NamePage, PageExtraction, ProductListParser, SkipReason};

/// Minimal element capability needed by the extractor
pub trait MarkupNode: Sized {
    /// Descendants matching `selector`, in document order
    fn select_all(&self, selector: &str) -> ParsingResult<Vec<Self>>;

    /// Concatenated text of the node and all of its descendants
    fn text(&self) -> String;

    /// Attribute value, `None` when the attribute is missing
    fn attr(&self, name: &str) -> Option<String>;

    /// Whether both handles point at the same element
    fn same_node(&self, other: &Self) -> bool;

    /// Text of every match joined together, empty when nothing matches
    fn select_text(&self, selector: &str) -> ParsingResult<String> {
        Ok(self
            .select_all(selector)?
            .iter()
            .map(Self::text)
            .collect::<String>())
    }

    /// Attribute of the first match only
    fn select_first_attr(&self, selector: &str, name: &str) -> ParsingResult<Option<String>> {
        Ok(self
            .select_all(selector)?
            .first()
            .and_then(|node| node.attr(name)))
    }
}
