//! Infrastructure layer: HTTP fetching, HTML parsing, files and exports
//!
//! Everything that touches the network or the filesystem lives here. The
//! application layer only sees the traits ([`PageFetcher`], [`RecordExporter`])
//! and the parser.

pub mod category_store;
pub mod config;
pub mod excel_exporter;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod word_lists;

// Re-export commonly used items
pub use category_store::{CategoryStore, StoreError};
pub use config::{AppConfig, ConfigError};
pub use excel_exporter::{ExportError, ExportOutcome, RecordExporter, XlsxExporter};
pub use http_client::{FetchError, HttpClient, HttpClientConfig, PageFetcher};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{CatalogSelectors, ParseContext, ParsingError, ParsingResult, ProductListParser};
pub use word_lists::load_name_filter;
