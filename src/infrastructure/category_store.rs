//! JSON-file store for the category list
//!
//! The file is a pretty-printed array of `{ "url": ..., "name": ... }`
//! objects. A missing file reads as an empty list.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

use crate::domain::category::Category;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Category URL must not be empty")]
    EmptyUrl,

    #[error("Category name must not be empty")]
    EmptyName,

    #[error("No category at position {position} (have {count})")]
    InvalidPosition { position: usize, count: usize },

    #[error("Failed to serialize categories: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Category list persisted in a JSON file
#[derive(Debug, Clone)]
pub struct CategoryStore {
    path: PathBuf,
}

impl CategoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all categories; unreadable or malformed files yield an empty list
    pub async fn load(&self) -> Vec<Category> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to read categories from {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Categories file {:?} is not valid JSON: {}", self.path, e);
            Vec::new()
        })
    }

    /// Overwrite the file with `categories`, indented with four spaces
    pub async fn save(&self, categories: &[Category]) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        categories.serialize(&mut serializer)?;
        buf.push(b'\n');

        fs::write(&self.path, buf).await.map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Append a category; both fields are trimmed and must be non-empty
    pub async fn add(&self, url: &str, name: &str) -> Result<Category, StoreError> {
        let url = url.trim();
        let name = name.trim();
        if url.is_empty() {
            return Err(StoreError::EmptyUrl);
        }
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let mut categories = self.load().await;
        let category = Category::new(url, name);
        categories.push(category.clone());
        self.save(&categories).await?;

        info!("Added category '{}' ({})", category.display_name, category.url);
        Ok(category)
    }

    /// Remove the category at 1-based `position`
    pub async fn remove(&self, position: usize) -> Result<Category, StoreError> {
        let mut categories = self.load().await;
        if position == 0 || position > categories.len() {
            return Err(StoreError::InvalidPosition {
                position,
                count: categories.len(),
            });
        }

        let removed = categories.remove(position - 1);
        self.save(&categories).await?;

        info!("Removed category '{}'", removed.display_name);
        Ok(removed)
    }
}
