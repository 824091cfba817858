//! Orchestrator tests with an in-memory shop and a recording exporter
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tires_parser::application::{CrawlOrchestrator, CrawlTermination};
use tires_parser::domain::{Category, NameFilter, PriceMarkup, ProductRecord};
use tires_parser::infrastructure::excel_exporter::{ExportError, ExportOutcome, RecordExporter};
use tires_parser::infrastructure::http_client::{FetchError, PageFetcher};
use tires_parser::infrastructure::parsing::ProductListParser;

const BASE: &str = "https://rengasketola.fi/";

#[derive(Default)]
struct MemoryShop {
    pages: HashMap<String, String>,
}

impl MemoryShop {
    fn page(mut self, route: &str, body: String) -> Self {
        self.pages.insert(format!("https://rengasketola.fi{route}"), body);
        self
    }
}

#[async_trait]
impl PageFetcher for MemoryShop {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        // Interleave category tasks
        tokio::task::yield_now().await;
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Transport {
            url: url.to_string(),
            message: "connection reset".to_string(),
        })
    }
}

#[derive(Default)]
struct RecordingExporter {
    calls: Mutex<Vec<(String, Vec<ProductRecord>)>>,
}

impl RecordExporter for RecordingExporter {
    fn export(&self, records: &[ProductRecord], title: &str) -> Result<ExportOutcome, ExportError> {
        self.calls.lock().unwrap().push((title.to_string(), records.to_vec()));
        Ok(ExportOutcome::Written {
            path: format!("{title}.xlsx").into(),
            rows: records.len(),
        })
    }
}

fn listing(items: &[(&str, &str)], next: Option<&str>) -> String {
    let mut html = String::from(r#"<div class="mt-0">"#);
    for (title, price) in items {
        html.push_str(&format!(
            r#"<div class="tp-product-item-grid-1"><h6 class="tp-product-title">{title}</h6><span><span class="oe_currency_value">{price}</span></span></div>"#
        ));
    }
    if let Some(href) = next {
        html.push_str(&format!(r#"<a class="tp-load-more-on-scroll" href="{href}">more</a>"#));
    }
    html.push_str("</div>");
    html
}

fn orchestrator(
    shop: MemoryShop,
    exporter: Arc<RecordingExporter>,
    filter: NameFilter,
    studded: bool,
) -> CrawlOrchestrator {
    let parser = ProductListParser::new(filter, PriceMarkup::new(9.0)).unwrap();
    CrawlOrchestrator::new(Arc::new(shop), Arc::new(parser), exporter, BASE)
        .unwrap()
        .with_studded_catalog(studded.then(|| "https://rengasketola.fi/studded".to_string()))
}

fn category(route: &str, name: &str) -> Category {
    Category::new(format!("https://rengasketola.fi{route}"), name)
}

#[tokio::test]
async fn two_page_category_exports_records_in_discovery_order() {
    let shop = MemoryShop::default()
        .page(
            "/c/1",
            listing(
                &[
                    ("Lahjakortti 50 €", "50"),
                    ("Michelin X-Ice", "ei hintaa"),
                    ("First Tire DOT2021", "100"),
                ],
                Some("/c/1/page/2"),
            ),
        )
        .page("/c/1/page/2", listing(&[("Second Tire", "50")], None));
    let exporter = Arc::new(RecordingExporter::default());
    let filter = NameFilter::new(vec![], vec!["Lahjakortti".to_string()]);

    let summary = orchestrator(shop, exporter.clone(), filter, false)
        .run(vec![category("/c/1", "Kesä")])
        .await;

    let calls = exporter.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (title, records) = &calls[0];
    assert_eq!(title, "Kesä");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "First Tire DOT2021");
    assert_eq!(records[0].year, Some(2021));
    assert_eq!(records[0].price, 129.0);
    assert_eq!(records[1].name, "Second Tire");
    assert_eq!(records[1].year, None);
    assert_eq!(records[1].price, 74.5);
    assert!(records.iter().all(|r| r.quantity == 8 && r.country.is_empty()));

    assert_eq!(summary.categories[0].record_count, 2);
    assert_eq!(summary.categories[0].pages_fetched, 2);
    assert!(matches!(summary.categories[0].termination, Some(CrawlTermination::Exhausted)));
}

#[tokio::test]
async fn studded_suffix_only_on_index_hit() {
    let shop = MemoryShop::default()
        .page("/studded", listing(&[("Nokian Hakka 10 NASTA DOT2020", "")], None))
        .page(
            "/c/1",
            listing(
                &[("Nokian Hakka 10 DOT2023", "100"), ("Nokian Hakkapeliitta R5", "100")],
                None,
            ),
        );
    let exporter = Arc::new(RecordingExporter::default());
    let filter = NameFilter::new(vec!["NASTA".to_string()], vec![]);

    let summary = orchestrator(shop, exporter.clone(), filter, true)
        .run(vec![category("/c/1", "Talvi")])
        .await;

    assert_eq!(summary.studded_index_size, 1);
    let calls = exporter.calls.lock().unwrap();
    let names: Vec<_> = calls[0].1.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Nokian Hakka 10 DOT2023 -STUD", "Nokian Hakkapeliitta R5"]);
}

#[tokio::test]
async fn every_category_is_exported_exactly_once() {
    let mut shop = MemoryShop::default();
    let mut categories = Vec::new();
    for i in 0..6 {
        let route = format!("/c/{i}");
        shop = shop
            .page(&route, listing(&[("Tire A", "10")], Some(&format!("{route}/page/2"))))
            .page(&format!("{route}/page/2"), listing(&[("Tire B", "20")], None));
        categories.push(category(&route, &format!("Category {i}")));
    }
    let exporter = Arc::new(RecordingExporter::default());

    let summary = orchestrator(shop, exporter.clone(), NameFilter::default(), false)
        .run(categories)
        .await;

    let calls = exporter.calls.lock().unwrap();
    assert_eq!(calls.len(), 6);
    let mut titles: Vec<_> = calls.iter().map(|(title, _)| title.clone()).collect();
    titles.sort();
    let expected: Vec<_> = (0..6).map(|i| format!("Category {i}")).collect();
    assert_eq!(titles, expected);
    // no leakage between categories
    assert!(calls.iter().all(|(_, records)| records.len() == 2));

    let summary_titles: Vec<_> = summary.categories.iter().map(|c| c.category.display_name.clone()).collect();
    assert_eq!(summary_titles, expected);
    assert_eq!(summary.total_records(), 12);
}

#[tokio::test]
async fn fetch_failure_still_exports_partial_records() {
    let shop = MemoryShop::default()
        .page("/c/1", listing(&[("Tire A", "10")], Some("/c/1/page/2")))
        .page("/c/2", listing(&[("Tire C", "30")], None));
    let exporter = Arc::new(RecordingExporter::default());

    let summary = orchestrator(shop, exporter.clone(), NameFilter::default(), false)
        .run(vec![category("/c/1", "Broken"), category("/c/2", "Fine"), category("/c/3", "Dead")])
        .await;

    let calls = exporter.calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    let broken = calls.iter().find(|(title, _)| title == "Broken").unwrap();
    assert_eq!(broken.1.len(), 1);
    let dead = calls.iter().find(|(title, _)| title == "Dead").unwrap();
    assert!(dead.1.is_empty());

    assert!(matches!(
        summary.categories[0].termination,
        Some(CrawlTermination::FetchFailed(FetchError::Transport { .. }))
    ));
    assert!(matches!(summary.categories[1].termination, Some(CrawlTermination::Exhausted)));
    assert_eq!(summary.problem_count(), 2);
}

#[tokio::test]
async fn studded_index_failure_does_not_stop_the_run() {
    let shop = MemoryShop::default().page("/c/1", listing(&[("Tire A", "10")], None));
    let exporter = Arc::new(RecordingExporter::default());

    let summary = orchestrator(shop, exporter.clone(), NameFilter::default(), true)
        .run(vec![category("/c/1", "Kesä")])
        .await;

    assert_eq!(summary.studded_index_size, 0);
    assert_eq!(summary.total_records(), 1);
    assert_eq!(exporter.calls.lock().unwrap().len(), 1);
}
