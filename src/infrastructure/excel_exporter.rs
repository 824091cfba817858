//! Spreadsheet export of crawled records
//!
//! One workbook per category, named after the category, with a single sheet
//! holding a header row and one row per record.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::product::ProductRecord;

/// Column headers: product, quantity, year, country, price (euro)
pub const HEADERS: [&str; 5] = ["Товар", "Кількість", "Рік", "Країна", "Ціна (евро)"];

/// Longest worksheet name the xlsx format accepts
const MAX_SHEET_NAME_CHARS: usize = 31;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write workbook {path}: {source}")]
    Xlsx {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What an export call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { path: PathBuf, rows: usize },
    /// Nothing to write; no file is created
    SkippedEmpty,
}

/// Consumer of one finished category
pub trait RecordExporter: Send + Sync {
    fn export(&self, records: &[ProductRecord], title: &str) -> Result<ExportOutcome, ExportError>;
}

/// Writes `{title}.xlsx` files into an output directory
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    output_dir: PathBuf,
}

impl XlsxExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Target path for a category title
    pub fn file_path(&self, title: &str) -> PathBuf {
        let file_stem: String = title
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.output_dir.join(format!("{file_stem}.xlsx"))
    }

    fn write_workbook(records: &[ProductRecord], title: &str, path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(title))?;

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }

        for (i, record) in records.iter().enumerate() {
            let row = i as u32 + 1;
            worksheet.write_string(row, 0, &record.name)?;
            worksheet.write_number(row, 1, f64::from(record.quantity))?;
            if let Some(year) = record.year {
                worksheet.write_number(row, 2, f64::from(year))?;
            }
            worksheet.write_string(row, 3, &record.country)?;
            worksheet.write_number(row, 4, record.price)?;
        }

        workbook.save(path)
    }
}

impl RecordExporter for XlsxExporter {
    fn export(&self, records: &[ProductRecord], title: &str) -> Result<ExportOutcome, ExportError> {
        if records.is_empty() {
            warn!("⚠️  No data for {}", title);
            return Ok(ExportOutcome::SkippedEmpty);
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.file_path(title);
        Self::write_workbook(records, title, &path).map_err(|source| ExportError::Xlsx {
            path: path.clone(),
            source,
        })?;

        info!("✅ {} - saved {} products", path.display(), records.len());
        Ok(ExportOutcome::Written {
            path,
            rows: records.len(),
        })
    }
}

/// Worksheet name valid for xlsx: no `[]:*?/\`, no edge apostrophes, max 31 chars
pub fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\') { '_' } else { c })
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_matches('\'');

    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::HashMap;
    use std::io::Read;

    fn zip_entry(archive: &mut zip::ZipArchive<std::fs::File>, name: &str) -> String {
        let mut xml = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }

    /// Cell reference to displayed value for the first worksheet
    fn read_cells(path: &Path) -> (String, HashMap<String, String>) {
        let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
        let workbook = zip_entry(&mut archive, "xl/workbook.xml");
        let shared_xml = zip_entry(&mut archive, "xl/sharedStrings.xml");
        let sheet_xml = zip_entry(&mut archive, "xl/worksheets/sheet1.xml");

        let text = Regex::new(r"(?s)<t[^>]*>(.*?)</t>").unwrap();
        let shared: Vec<String> = Regex::new(r"(?s)<si>(.*?)</si>")
            .unwrap()
            .captures_iter(&shared_xml)
            .map(|si| text.captures(&si[1]).map(|t| t[1].to_string()).unwrap_or_default())
            .collect();

        let cell = Regex::new(r#"(?s)<c r="([A-Z]+[0-9]+)"([^>]*?)(?:/>|>(.*?)</c>)"#).unwrap();
        let value = Regex::new(r"(?s)<v>(.*?)</v>").unwrap();
        let mut cells = HashMap::new();
        for c in cell.captures_iter(&sheet_xml) {
            let body = c.get(3).map_or("", |m| m.as_str());
            let raw = match value.captures(body) {
                Some(v) => v[1].to_string(),
                None => match text.captures(body) {
                    Some(t) => t[1].to_string(),
                    None => continue,
                },
            };
            let shown = if c[2].contains(r#"t="s""#) {
                shared[raw.parse::<usize>().unwrap()].clone()
            } else {
                raw
            };
            cells.insert(c[1].to_string(), shown);
        }
        (workbook, cells)
    }

    fn number(cells: &HashMap<String, String>, cell: &str) -> f64 {
        cells[cell].parse().unwrap()
    }

    fn sample() -> Vec<ProductRecord> {
        vec![
            ProductRecord::new("Nokian Hakka 10 DOT2023", Some(2023), 129.0),
            ProductRecord::new("Michelin Alpin 6", None, 98.5),
        ]
    }

    #[test]
    fn test_writes_workbook_named_after_title() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = XlsxExporter::new(dir.path());

        let outcome = exporter.export(&sample(), "Talvi 16").unwrap();

        let expected = dir.path().join("Talvi 16.xlsx");
        assert_eq!(outcome, ExportOutcome::Written { path: expected.clone(), rows: 2 });
        let bytes = std::fs::read(&expected).unwrap();
        assert_eq!(&bytes[..2], b"PK");
        let (workbook, _) = read_cells(&expected);
        assert!(workbook.contains(r#"name="Talvi 16""#));
    }

    #[test]
    fn test_header_row_and_blank_year_cell() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = XlsxExporter::new(dir.path());

        exporter.export(&sample(), "Talvi 16").unwrap();
        let (_, cells) = read_cells(&dir.path().join("Talvi 16.xlsx"));

        let header: Vec<String> = ["A1", "B1", "C1", "D1", "E1"]
            .iter()
            .map(|cell| cells.get(*cell).cloned().unwrap_or_default())
            .collect();
        assert_eq!(header, HEADERS);

        assert_eq!(cells["A2"], "Nokian Hakka 10 DOT2023");
        assert_eq!(number(&cells, "B2"), 8.0);
        assert_eq!(number(&cells, "C2"), 2023.0);
        assert_eq!(number(&cells, "E2"), 129.0);

        assert_eq!(cells["A3"], "Michelin Alpin 6");
        assert_eq!(number(&cells, "B3"), 8.0);
        assert!(!cells.contains_key("C3"));
        assert_eq!(number(&cells, "E3"), 98.5);
        assert!(!cells.contains_key("A4"));
    }

    #[test]
    fn test_empty_records_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = XlsxExporter::new(dir.path().join("out"));

        assert_eq!(exporter.export(&[], "Kesä").unwrap(), ExportOutcome::SkippedEmpty);
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = XlsxExporter::new(dir.path().join("exports/2026"));

        exporter.export(&sample(), "Kesä").unwrap();

        assert!(dir.path().join("exports/2026/Kesä.xlsx").exists());
    }

    #[test]
    fn test_title_with_separators_stays_in_output_dir() {
        let exporter = XlsxExporter::new("/tmp/x");
        assert_eq!(exporter.file_path("205/55 R16"), PathBuf::from("/tmp/x/205_55 R16.xlsx"));
    }

    #[test]
    fn test_sheet_name_rules() {
        assert_eq!(sheet_name("Talvi: 205/55 [R16]?"), "Talvi_ 205_55 _R16__");
        assert_eq!(sheet_name("'quoted'"), "quoted");
        assert_eq!(sheet_name(""), "Sheet1");
        assert_eq!(sheet_name(&"x".repeat(40)).chars().count(), 31);
    }
}
