//! Tires Parser - rengasketola.fi tire catalog crawler
//!
//! Crawls paginated tire categories, filters and prices every listing, marks
//! tires found in the studded catalog, and writes one xlsx workbook per
//! category.

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

pub use application::{CrawlOrchestrator, RunSummary};
pub use domain::{Category, ProductRecord};
