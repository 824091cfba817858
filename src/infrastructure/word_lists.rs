//! Word-list files for the title blacklist
//!
//! Plain text, one entry per line. Lines are trimmed and blank lines skipped.
//! A missing or unreadable file is an empty list, not an error.

use std::path::Path;

use tokio::fs;
use tracing::{debug, warn};

use crate::domain::name_filter::NameFilter;
use crate::infrastructure::config::FilesConfig;

/// Parse word-list content
pub fn parse_words(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a word list, returning an empty list when the file can't be read
pub async fn load_words(path: &Path) -> Vec<String> {
    match fs::read_to_string(path).await {
        Ok(content) => {
            let words = parse_words(&content);
            debug!("Loaded {} words from {:?}", words.len(), path);
            words
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Word list {:?} not found, using empty list", path);
            Vec::new()
        }
        Err(e) => {
            warn!("Failed to read word list {:?}: {}", path, e);
            Vec::new()
        }
    }
}

/// Build the title filter from the two configured word lists
pub async fn load_name_filter(files: &FilesConfig) -> NameFilter {
    let bad_words = load_words(&files.bad_words_file).await;
    let delete_item_words = load_words(&files.delete_item_words_file).await;
    NameFilter::new(bad_words, delete_item_words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_words_trims_and_skips_blanks() {
        let words = parse_words("UUSI\n\n  Kampanja  \r\n\t\nDOT-merkitty\n");
        assert_eq!(words, vec!["UUSI", "Kampanja", "DOT-merkitty"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_words(&dir.path().join("bad_words.txt")).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_name_filter_reads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = FilesConfig {
            categories_file: dir.path().join("categories.json"),
            bad_words_file: dir.path().join("bad_words.txt"),
            delete_item_words_file: dir.path().join("del_item_words.txt"),
        };
        std::fs::write(&files.bad_words_file, "UUSI\n").unwrap();
        std::fs::write(&files.delete_item_words_file, "Lahjakortti\nVanne\n").unwrap();

        let filter = load_name_filter(&files).await;

        assert_eq!(filter.bad_words(), ["UUSI".to_string()]);
        assert_eq!(filter.delete_item_words().len(), 2);
    }
}
