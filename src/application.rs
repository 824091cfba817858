//! Application layer
//!
//! Crawl use cases built on the domain rules and the infrastructure seams.

pub mod crawler;
pub mod orchestrator;
pub mod studded_index_builder;

pub use crawler::{CategoryCrawler, CategoryReport, CrawlState, CrawlTermination};
pub use orchestrator::{CategoryOutcome, CrawlOrchestrator, RunSummary};
pub use studded_index_builder::StuddedIndexBuilder;
