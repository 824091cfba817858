//! Per-category pagination crawl
//!
//! A category is crawled as a small state machine:
//! `Fetching(url) -> Extracting(body) -> Fetching(next) | Done`.
//! Pages are strictly sequential; the records gathered so far are kept no
//! matter how the crawl ends.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use url::Url;

use crate::domain::category::Category;
use crate::domain::product::ProductRecord;
use crate::domain::studded::StuddedIndex;
use crate::infrastructure::http_client::{FetchError, PageFetcher};
use crate::infrastructure::parsing::{ParseContext, ParsingError, ParsingResult, ProductListParser};

/// Why a category crawl stopped
#[derive(Debug)]
pub enum CrawlTermination {
    /// No further page: missing load-more link, or a link back to a visited page
    Exhausted,
    FetchFailed(FetchError),
    ParseFailed(ParsingError),
}

impl CrawlTermination {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

impl std::fmt::Display for CrawlTermination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted => write!(f, "all pages crawled"),
            Self::FetchFailed(e) => write!(f, "fetch failed: {e}"),
            Self::ParseFailed(e) => write!(f, "parse failed: {e}"),
        }
    }
}

/// Crawl loop state
#[derive(Debug)]
pub enum CrawlState {
    Fetching(String),
    Extracting { url: String, body: String },
    Done(CrawlTermination),
}

/// Result of crawling one category
#[derive(Debug)]
pub struct CategoryReport {
    pub category: Category,
    /// Records in discovery order
    pub records: Vec<ProductRecord>,
    pub pages_fetched: u32,
    pub termination: CrawlTermination,
}

/// Resolve a load-more `href` against the site base URL
pub fn resolve_next_page(base_url: &Url, href: &str) -> ParsingResult<String> {
    base_url
        .join(href)
        .map(String::from)
        .map_err(|e| ParsingError::url_resolution_failed(href, e.to_string(), Some(base_url.as_str())))
}

/// Drives the fetch/extract loop for single categories
#[derive(Clone)]
pub struct CategoryCrawler {
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<ProductListParser>,
    studded: Arc<StuddedIndex>,
    base_url: Url,
}

impl CategoryCrawler {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<ProductListParser>,
        studded: Arc<StuddedIndex>,
        base_url: Url,
    ) -> Self {
        Self {
            fetcher,
            parser,
            studded,
            base_url,
        }
    }

    /// Crawl every page of `category`, starting at its seed URL
    pub async fn crawl(&self, category: Category) -> CategoryReport {
        let label = category.display_name.clone();
        let mut records = Vec::new();
        let mut pages_fetched = 0u32;
        let mut visited = HashSet::new();
        let mut state = CrawlState::Fetching(category.url.clone());

        info!("🔍 [{}] crawl started: {}", label, category.url);

        let termination = loop {
            state = match state {
                CrawlState::Fetching(url) => {
                    if !visited.insert(url.clone()) {
                        warn!("[{}] next page {} was already visited, stopping", label, url);
                        CrawlState::Done(CrawlTermination::Exhausted)
                    } else {
                        match self.fetcher.fetch(&url).await {
                            Ok(body) => {
                                pages_fetched += 1;
                                CrawlState::Extracting { url, body }
                            }
                            Err(e) => {
                                error!("❌ [{}] failed to fetch {}: {}", label, url, e);
                                CrawlState::Done(CrawlTermination::FetchFailed(e))
                            }
                        }
                    }
                }
                CrawlState::Extracting { url, body } => {
                    let context = ParseContext::new(label.as_str(), pages_fetched, url.as_str());
                    self.extract_step(&body, &context, &mut records)
                }
                CrawlState::Done(termination) => break termination,
            };
        };

        match &termination {
            CrawlTermination::Exhausted => info!(
                "✅ [{}] crawl finished: {} records from {} pages",
                label,
                records.len(),
                pages_fetched
            ),
            other => warn!(
                "⚠️  [{}] crawl stopped early ({}): {} records from {} pages",
                label,
                other,
                records.len(),
                pages_fetched
            ),
        }

        CategoryReport {
            category,
            records,
            pages_fetched,
            termination,
        }
    }

    fn extract_step(&self, body: &str, context: &ParseContext, records: &mut Vec<ProductRecord>) -> CrawlState {
        let page = match self.parser.parse_products(body, &self.studded, context) {
            Ok(page) => page,
            Err(e) => {
                error!("❌ [{}] failed to parse {}: {}", context.label, context.page_url, e);
                return CrawlState::Done(CrawlTermination::ParseFailed(e));
            }
        };

        let next_page = page.next_page.clone();
        let before = records.len();
        records.extend(page.into_records());
        debug!(
            "[{}] page {}: +{} records ({} total)",
            context.label,
            context.page_number,
            records.len() - before,
            records.len()
        );

        match next_page {
            None => CrawlState::Done(CrawlTermination::Exhausted),
            Some(href) => match resolve_next_page(&self.base_url, &href) {
                Ok(next_url) => CrawlState::Fetching(next_url),
                Err(e) => {
                    error!("❌ [{}] {}", context.label, e);
                    CrawlState::Done(CrawlTermination::ParseFailed(e))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::name_filter::NameFilter;
    use crate::domain::pricing::PriceMarkup;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const BASE: &str = "https://rengasketola.fi/";

    #[derive(Default)]
    struct MapFetcher {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn with(mut self, url: &str, body: String) -> Self {
            self.pages.insert(url.to_string(), body);
            self
        }
    }

    #[async_trait]
    impl PageFetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                code: 404,
                url: url.to_string(),
            })
        }
    }

    fn page(titles: &[(&str, &str)], next: Option<&str>) -> String {
        let mut html = String::from(r#"<html><body><div class="mt-0">"#);
        for (title, price) in titles {
            html.push_str(&format!(
                r#"<div class="tp-product-item-grid-1"><h6 class="tp-product-title">{title}</h6><span><span class="oe_currency_value">{price}</span></span></div>"#
            ));
        }
        if let Some(href) = next {
            html.push_str(&format!(r#"<a class="tp-load-more-on-scroll" href="{href}">more</a>"#));
        }
        html.push_str("</div></body></html>");
        html
    }

    fn crawler(fetcher: Arc<MapFetcher>) -> CategoryCrawler {
        let parser = ProductListParser::new(NameFilter::default(), PriceMarkup::new(9.0)).unwrap();
        CategoryCrawler::new(
            fetcher,
            Arc::new(parser),
            Arc::new(StuddedIndex::new()),
            Url::parse(BASE).unwrap(),
        )
    }

    fn category() -> Category {
        Category::new("https://rengasketola.fi/shop/category/kesarenkaat-1", "Kesä")
    }

    #[tokio::test]
    async fn test_follows_pagination_in_order() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .with(
                    "https://rengasketola.fi/shop/category/kesarenkaat-1",
                    page(&[("A DOT2021", "100")], Some("/shop/category/kesarenkaat-1/page/2")),
                )
                .with(
                    "https://rengasketola.fi/shop/category/kesarenkaat-1/page/2",
                    page(&[("B", "50,00")], None),
                ),
        );

        let report = crawler(fetcher.clone()).crawl(category()).await;

        assert!(report.termination.is_exhausted());
        assert_eq!(report.pages_fetched, 2);
        let names: Vec<_> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A DOT2021", "B"]);
        assert_eq!(report.records[0].year, Some(2021));
        assert_eq!(fetcher.requested.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_earlier_records() {
        let fetcher = Arc::new(MapFetcher::default().with(
            "https://rengasketola.fi/shop/category/kesarenkaat-1",
            page(&[("A", "10")], Some("/missing")),
        ));

        let report = crawler(fetcher).crawl(category()).await;

        assert!(matches!(
            report.termination,
            CrawlTermination::FetchFailed(FetchError::Status { code: 404, .. })
        ));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_seed_failure_yields_empty_report() {
        let report = crawler(Arc::new(MapFetcher::default())).crawl(category()).await;

        assert!(matches!(report.termination, CrawlTermination::FetchFailed(_)));
        assert!(report.records.is_empty());
        assert_eq!(report.pages_fetched, 0);
    }

    #[tokio::test]
    async fn test_self_link_stops_as_exhausted() {
        let fetcher = Arc::new(MapFetcher::default().with(
            "https://rengasketola.fi/shop/category/kesarenkaat-1",
            page(&[("A", "10")], Some("/shop/category/kesarenkaat-1")),
        ));

        let report = crawler(fetcher.clone()).crawl(category()).await;

        assert!(report.termination.is_exhausted());
        assert_eq!(report.records.len(), 1);
        assert_eq!(fetcher.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unresolvable_href_is_parse_failure() {
        let fetcher = Arc::new(MapFetcher::default().with(
            "https://rengasketola.fi/shop/category/kesarenkaat-1",
            page(&[("A", "10")], Some("http://[broken")),
        ));

        let report = crawler(fetcher).crawl(category()).await;

        assert!(matches!(
            report.termination,
            CrawlTermination::ParseFailed(ParsingError::UrlResolutionFailed { .. })
        ));
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn test_resolve_next_page() {
        let base = Url::parse(BASE).unwrap();
        assert_eq!(
            resolve_next_page(&base, "/shop/page/2").unwrap(),
            "https://rengasketola.fi/shop/page/2"
        );
        assert_eq!(
            resolve_next_page(&base, "https://cdn.example.com/p/3").unwrap(),
            "https://cdn.example.com/p/3"
        );
    }
}
