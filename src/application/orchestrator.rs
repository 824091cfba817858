//! Whole-run orchestration
//!
//! Builds the studded index first, then crawls every category in its own
//! tokio task and waits for all of them. Each task exports its own records
//! once its crawl is done, so categories never share a result list.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

use super::crawler::{CategoryCrawler, CategoryReport, CrawlTermination};
use super::studded_index_builder::StuddedIndexBuilder;
use crate::domain::category::Category;
use crate::domain::studded::StuddedIndex;
use crate::infrastructure::excel_exporter::{ExportOutcome, RecordExporter};
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::parsing::{ParsingError, ParsingResult, ProductListParser};

/// How one category ended up
#[derive(Debug)]
pub struct CategoryOutcome {
    pub category: Category,
    pub record_count: usize,
    pub pages_fetched: u32,
    /// `None` when the category task itself panicked
    pub termination: Option<CrawlTermination>,
    pub export: Result<ExportOutcome, String>,
}

impl CategoryOutcome {
    fn panicked(category: Category, message: String) -> Self {
        Self {
            category,
            record_count: 0,
            pages_fetched: 0,
            termination: None,
            export: Err(message),
        }
    }
}

/// Everything a crawl run did
#[derive(Debug)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub studded_index_size: usize,
    /// One entry per category, in input order
    pub categories: Vec<CategoryOutcome>,
}

impl RunSummary {
    pub fn total_records(&self) -> usize {
        self.categories.iter().map(|c| c.record_count).sum()
    }

    pub fn written_files(&self) -> Vec<PathBuf> {
        self.categories
            .iter()
            .filter_map(|c| match &c.export {
                Ok(ExportOutcome::Written { path, .. }) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    /// Categories that did not crawl to the last page or failed to export
    pub fn problem_count(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| c.export.is_err() || !c.termination.as_ref().is_some_and(CrawlTermination::is_exhausted))
            .count()
    }

    pub fn log(&self) {
        let elapsed = self.finished_at - self.started_at;
        info!(
            "🏁 Run {} finished in {:.1}s: {} categories, {} records, {} files, {} with problems",
            self.run_id,
            elapsed.num_milliseconds() as f64 / 1000.0,
            self.categories.len(),
            self.total_records(),
            self.written_files().len(),
            self.problem_count()
        );
    }
}

pub struct CrawlOrchestrator {
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<ProductListParser>,
    exporter: Arc<dyn RecordExporter>,
    base_url: Url,
    studded_catalog_url: Option<String>,
}

impl CrawlOrchestrator {
    /// `base_url` resolves every load-more link
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<ProductListParser>,
        exporter: Arc<dyn RecordExporter>,
        base_url: &str,
    ) -> ParsingResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ParsingError::url_resolution_failed(base_url, e.to_string(), None))?;

        Ok(Self {
            fetcher,
            parser,
            exporter,
            base_url,
            studded_catalog_url: None,
        })
    }

    /// Build the studded index from `url` before crawling; `None` disables it
    pub fn with_studded_catalog(mut self, url: Option<String>) -> Self {
        self.studded_catalog_url = url;
        self
    }

    pub async fn build_studded_index(&self) -> StuddedIndex {
        match &self.studded_catalog_url {
            Some(url) => {
                StuddedIndexBuilder::new(self.fetcher.clone(), self.parser.clone(), self.base_url.clone())
                    .build(url)
                    .await
            }
            None => {
                info!("Studded index disabled");
                StuddedIndex::new()
            }
        }
    }

    /// Crawl and export every category; always returns after all tasks end
    pub async fn run(&self, categories: Vec<Category>) -> RunSummary {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            "🚀 Run {} started: {} categories, markup {}%",
            run_id,
            categories.len(),
            self.parser.markup().percent()
        );

        let studded = Arc::new(self.build_studded_index().await);
        let studded_index_size = studded.len();
        let crawler = CategoryCrawler::new(self.fetcher.clone(), self.parser.clone(), studded, self.base_url.clone());

        let tasks: Vec<_> = categories
            .iter()
            .cloned()
            .map(|category| {
                let crawler = crawler.clone();
                let exporter = self.exporter.clone();
                tokio::spawn(async move {
                    let report = crawler.crawl(category).await;
                    export_report(exporter, report).await
                })
            })
            .collect();

        let results = join_all(tasks).await;

        let outcomes = categories
            .into_iter()
            .zip(results)
            .map(|(category, result)| match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("💥 [{}] category task failed: {}", category.display_name, e);
                    CategoryOutcome::panicked(category, format!("task failed: {e}"))
                }
            })
            .collect();

        let summary = RunSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            studded_index_size,
            categories: outcomes,
        };
        summary.log();
        summary
    }
}

async fn export_report(exporter: Arc<dyn RecordExporter>, report: CategoryReport) -> CategoryOutcome {
    let CategoryReport {
        category,
        records,
        pages_fetched,
        termination,
    } = report;
    let record_count = records.len();
    let title = category.display_name.clone();

    let export = tokio::task::spawn_blocking(move || exporter.export(&records, &title))
        .await
        .map_err(|e| format!("export task failed: {e}"))
        .and_then(|result| result.map_err(|e| e.to_string()));

    if let Err(e) = &export {
        warn!("⚠️  [{}] export failed: {}", category.display_name, e);
    }

    CategoryOutcome {
        category,
        record_count,
        pages_fetched,
        termination: Some(termination),
        export,
    }
}
