//! Command-line front end
//!
//! Without a subcommand the binary shows the interactive menu. The
//! subcommands cover the same actions for scripted use.

pub mod menu;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::application::{CrawlOrchestrator, RunSummary};
use crate::domain::pricing::PriceMarkup;
use crate::infrastructure::category_store::CategoryStore;
use crate::infrastructure::config::{validate_markup, AppConfig};
use crate::infrastructure::excel_exporter::XlsxExporter;
use crate::infrastructure::http_client::{HttpClient, HttpClientConfig};
use crate::infrastructure::parsing::ProductListParser;
use crate::infrastructure::word_lists::load_name_filter;

#[derive(Debug, Parser)]
#[command(
    name = "tires-parser",
    version,
    about = "Crawls rengasketola.fi tire categories into xlsx price lists"
)]
pub struct Cli {
    /// JSON configuration file (default: ./tires_parser.json if present)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crawl every saved category and export one workbook per category
    Crawl {
        /// Price markup in percent (default from configuration)
        #[arg(short, long, value_name = "PCT", allow_negative_numbers = true)]
        markup: Option<f64>,
    },

    /// Manage the saved category list
    Categories {
        #[command(subcommand)]
        action: CategoriesCommand,
    },

    /// Print the effective configuration as JSON
    Config,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    List,
    Add {
        #[arg(value_name = "URL")]
        url: String,
        #[arg(value_name = "NAME")]
        name: String,
    },
    Remove {
        /// 1-based position as shown by `categories list`
        #[arg(value_name = "N")]
        position: usize,
    },
}

/// Run one parsed command line against `config`
pub async fn dispatch(cli: Cli, config: AppConfig) -> Result<()> {
    let store = CategoryStore::new(&config.files.categories_file);

    match cli.command {
        None => menu::Menu::stdio(&config, &store).run().await,
        Some(Command::Crawl { markup }) => {
            let markup = markup.unwrap_or(config.crawl.markup_percent);
            validate_markup(markup)?;
            let categories = store.load().await;
            if categories.is_empty() {
                anyhow::bail!("No categories saved in {:?}; add one first", store.path());
            }
            let summary = run_crawl(&config, categories, markup).await?;
            for path in summary.written_files() {
                println!("{}", path.display());
            }
            Ok(())
        }
        Some(Command::Categories { action }) => match action {
            CategoriesCommand::List => {
                for (i, category) in store.load().await.iter().enumerate() {
                    println!("{}. {}\t{}", i + 1, category.display_name, category.url);
                }
                Ok(())
            }
            CategoriesCommand::Add { url, name } => {
                let category = store.add(&url, &name).await?;
                println!("Added '{}'", category.display_name);
                Ok(())
            }
            CategoriesCommand::Remove { position } => {
                let removed = store.remove(position).await?;
                println!("Removed '{}'", removed.display_name);
                Ok(())
            }
        },
        Some(Command::Config) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?
            );
            Ok(())
        }
    }
}

/// Wire the crawl pipeline from configuration and run it
pub async fn run_crawl(
    config: &AppConfig,
    categories: Vec<crate::domain::category::Category>,
    markup_percent: f64,
) -> Result<RunSummary> {
    let http_config = HttpClientConfig::default().with_timeout(config.crawl.request_timeout_seconds);
    let fetcher = Arc::new(HttpClient::new(http_config).context("Failed to create HTTP client")?);

    let name_filter = load_name_filter(&config.files).await;
    info!(
        "Title filter: {} exact tokens, {} discard substrings",
        name_filter.bad_words().len(),
        name_filter.delete_item_words().len()
    );

    let parser = ProductListParser::with_selectors(
        config.selectors.clone(),
        name_filter,
        PriceMarkup::new(markup_percent),
    )
    .context("Invalid catalog selectors in configuration")?;

    let exporter = Arc::new(XlsxExporter::new(&config.crawl.output_dir));

    let studded_catalog = config
        .crawl
        .build_studded_index
        .then(|| config.crawl.studded_catalog_url.clone());

    let orchestrator = CrawlOrchestrator::new(fetcher, Arc::new(parser), exporter, &config.crawl.base_url)
        .context("Invalid base URL")?
        .with_studded_catalog(studded_catalog);

    Ok(orchestrator.run(categories).await)
}
