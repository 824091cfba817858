//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors for the catalog listing markup.

use serde::{Deserialize, Serialize};

/// CSS selectors for catalog listing pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSelectors {
    /// Main content block; a page without it has no products
    pub content_block: String,

    /// One product card inside the content block
    pub product_item: String,

    /// Visible product title, relative to the card
    pub title: String,

    /// Currency value node, relative to the card
    pub price: String,

    /// "Load more" link whose `href` is the next page
    pub load_more: String,
}

impl Default for CatalogSelectors {
    fn default() -> Self {
        Self {
            content_block: ".mt-0".to_string(),
            product_item: ".tp-product-item-grid-1".to_string(),
            title: ".tp-product-title".to_string(),
            price: "span .oe_currency_value".to_string(),
            load_more: "a.tp-load-more-on-scroll".to_string(),
        }
    }
}

impl CatalogSelectors {
    pub fn all(&self) -> [(&'static str, &str); 5] {
        [
            ("content_block", self.content_block.as_str()),
            ("product_item", self.product_item.as_str()),
            ("title", self.title.as_str()),
            ("price", self.price.as_str()),
            ("load_more", self.load_more.as_str()),
        ]
    }
}
