//! Studded-tire index from the studded catalog section
//!
//! Runs once, sequentially, before any category crawl. A failure on any page
//! ends the build and the names collected so far are used as-is.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info, warn};
use url::Url;

use super::crawler::resolve_next_page;
use crate::domain::studded::StuddedIndex;
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::parsing::{ParseContext, ProductListParser};

const LABEL: &str = "studded index";

pub struct StuddedIndexBuilder {
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<ProductListParser>,
    base_url: Url,
}

impl StuddedIndexBuilder {
    pub fn new(fetcher: Arc<dyn PageFetcher>, parser: Arc<ProductListParser>, base_url: Url) -> Self {
        Self {
            fetcher,
            parser,
            base_url,
        }
    }

    /// Crawl `catalog_url` page by page and index every surviving name
    pub async fn build(&self, catalog_url: &str) -> StuddedIndex {
        let mut index = StuddedIndex::new();
        let mut visited = HashSet::new();
        let mut next = Some(catalog_url.to_string());
        let mut page_number = 0u32;

        info!("🔍 Building studded index from {}", catalog_url);

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                warn!("[{}] next page {} was already visited, stopping", LABEL, url);
                break;
            }

            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    error!("❌ [{}] failed to fetch {}: {} (keeping partial index)", LABEL, url, e);
                    break;
                }
            };
            page_number += 1;

            let context = ParseContext::new(LABEL, page_number, url.as_str());
            let page = match self.parser.parse_names(&body, &context) {
                Ok(page) => page,
                Err(e) => {
                    error!("❌ [{}] failed to parse {}: {} (keeping partial index)", LABEL, url, e);
                    break;
                }
            };

            for name in &page.names {
                index.insert_name(name);
            }

            next = match page.next_page.map(|href| resolve_next_page(&self.base_url, &href)) {
                Some(Ok(next_url)) => Some(next_url),
                Some(Err(e)) => {
                    error!("❌ [{}] {} (keeping partial index)", LABEL, e);
                    None
                }
                None => None,
            };
        }

        info!("✅ Studded index ready: {} names from {} pages", index.len(), page_number);
        index
    }
}
