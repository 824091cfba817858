//! Configuration infrastructure
//!
//! Settings are layered the same way for the CLI and for tests:
//! 1. Built-in defaults (`AppConfig::default()`)
//! 2. Optional JSON file (`tires_parser.json` or `--config <path>`)
//! 3. Environment variables, e.g. `TIRES_PARSER_CRAWL__MARKUP_PERCENT=12`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::infrastructure::parsing::config::CatalogSelectors;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    Validation { message: String },

    #[error("Failed to write configuration to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Crawl targets and pricing
    pub crawl: CrawlConfig,

    /// Input/output file locations
    pub files: FilesConfig,

    /// CSS selectors for the catalog listing markup
    pub selectors: CatalogSelectors,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Crawl specific configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Origin that relative "load more" links are resolved against
    pub base_url: String,

    /// Catalog section listing every studded tire
    pub studded_catalog_url: String,

    /// Crawl the studded section before the categories
    pub build_studded_index: bool,

    /// Markup used when none is entered at run time
    pub markup_percent: f64,

    /// Per-request timeout; `None` keeps the HTTP client default
    pub request_timeout_seconds: Option<u64>,

    /// Directory the `.xlsx` files are written to
    pub output_dir: PathBuf,
}

/// Locations of the files managed outside the crawl itself
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub categories_file: PathBuf,
    /// Exact tokens removed from product titles
    pub bad_words_file: PathBuf,
    /// Substrings that drop a product entirely
    pub delete_item_words_file: PathBuf,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted log file
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log directory; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    /// Number of log files to keep (older files will be deleted)
    pub max_files: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: rengasketola::BASE_URL.to_string(),
            studded_catalog_url: rengasketola::STUDDED_CATALOG_URL.to_string(),
            build_studded_index: true,
            markup_percent: defaults::MARKUP_PERCENT,
            request_timeout_seconds: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            categories_file: PathBuf::from(defaults::CATEGORIES_FILE),
            bad_words_file: PathBuf::from(defaults::BAD_WORDS_FILE),
            delete_item_words_file: PathBuf::from(defaults::DELETE_ITEM_WORDS_FILE),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            max_files: defaults::LOG_MAX_FILES,
        }
    }
}

impl AppConfig {
    /// Load defaults, then the optional file, then `TIRES_PARSER_*` variables
    ///
    /// An explicitly given path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(defaults::CONFIG_FILE), false),
        };

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(
                config::File::from(file.as_path())
                    .format(config::FileFormat::Json)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;

        debug!("Loaded configuration (file: {:?}, required: {})", file, required);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = Url::parse(&self.crawl.base_url).map_err(|e| {
            ConfigError::validation(format!("crawl.base_url '{}': {}", self.crawl.base_url, e))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::validation(format!(
                "crawl.base_url must be http(s), got '{}'",
                base.scheme()
            )));
        }

        if self.crawl.build_studded_index {
            Url::parse(&self.crawl.studded_catalog_url).map_err(|e| {
                ConfigError::validation(format!(
                    "crawl.studded_catalog_url '{}': {}",
                    self.crawl.studded_catalog_url, e
                ))
            })?;
        }

        validate_markup(self.crawl.markup_percent)?;

        if self.crawl.request_timeout_seconds == Some(0) {
            return Err(ConfigError::validation(
                "crawl.request_timeout_seconds must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::validation(format!("serialize: {e}")))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Saved configuration to: {:?}", path);
        Ok(())
    }
}

/// Markup must keep prices positive and be a real number
pub fn validate_markup(percent: f64) -> Result<(), ConfigError> {
    if !percent.is_finite() || percent <= -100.0 {
        return Err(ConfigError::validation(format!(
            "markup percent must be a finite number above -100, got {percent}"
        )));
    }
    Ok(())
}

/// rengasketola.fi URLs
pub mod rengasketola {
    /// Origin for every catalog request; "load more" links are relative to it
    pub const BASE_URL: &str = "https://rengasketola.fi/";

    /// Catalog section listing studded winter tires (nastarenkaat)
    pub const STUDDED_CATALOG_URL: &str = "https://rengasketola.fi/shop/category/talvirenkaat-nastarenkaat-3";
}

/// Default configuration values
pub mod defaults {
    /// Markup applied when the user just presses Enter
    pub const MARKUP_PERCENT: f64 = crate::domain::pricing::DEFAULT_MARKUP_PERCENT;

    /// Default configuration file, looked up in the working directory
    pub const CONFIG_FILE: &str = "tires_parser.json";

    /// Environment variable prefix for overrides
    pub const ENV_PREFIX: &str = "TIRES_PARSER";

    pub const CATEGORIES_FILE: &str = "categories.json";
    pub const BAD_WORDS_FILE: &str = "bad_words.txt";
    pub const DELETE_ITEM_WORDS_FILE: &str = "del_item_words.txt";

    // Log configuration defaults
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = true;
    pub const LOG_MAX_FILES: u32 = 5;
}
