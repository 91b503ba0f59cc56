//! Local JSON workbook
//!
//! The file mirrors what the Sheets API returns: each sheet is a name and a
//! grid of cells whose first row is the header.
//!
//! ```json
//! { "sheets": [ { "name": "Backend", "values": [["任務細項", "狀態"], ["API", "已完成"]] } ] }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::SheetSource;
use crate::error::SourceError;
use crate::models::{records_from_values, Row};

#[derive(Debug, Deserialize)]
struct WorkbookFile {
    sheets: Vec<SheetFile>,
}

#[derive(Debug, Deserialize)]
struct SheetFile {
    name: String,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// A workbook stored as JSON on disk, re-read on every call
pub struct FileWorkbook {
    path: PathBuf,
}

impl FileWorkbook {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<WorkbookFile, SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            SourceError::Connection(format!("{}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| SourceError::Connection(format!("{}: {}", self.path.display(), e)))
    }
}

impl SheetSource for FileWorkbook {
    fn list_sheet_names(&self) -> Result<Vec<String>, SourceError> {
        let workbook = self.load()?;
        Ok(workbook.sheets.into_iter().map(|sheet| sheet.name).collect())
    }

    fn fetch_rows(&self, sheet: &str) -> Result<Vec<Row>, SourceError> {
        debug!(sheet, path = %self.path.display(), "reading sheet from file");
        let workbook = self
            .load()
            .map_err(|e| SourceError::sheet_read(sheet, e.short_message()))?;

        let found = workbook
            .sheets
            .iter()
            .find(|candidate| candidate.name == sheet)
            .ok_or_else(|| SourceError::sheet_read(sheet, "no such sheet in workbook"))?;

        records_from_values(&found.values).map_err(|message| SourceError::sheet_read(sheet, message))
    }

    fn describe(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn watch_path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_temp_workbook(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const WORKBOOK: &str = r#"{
        "sheets": [
            { "name": "後端", "values": [["任務細項", "截止日", "狀態"], ["API", "2024-01-01", "已完成"], ["DB", 20240105]] },
            { "name": "空白", "values": [] },
            { "name": "重複", "values": [["狀態", "狀態"]] }
        ]
    }"#;

    #[test]
    fn test_file_lists_sheets_in_order() {
        let file = create_temp_workbook(WORKBOOK);
        let source = FileWorkbook::new(file.path().to_path_buf());
        assert_eq!(source.list_sheet_names().unwrap(), vec!["後端", "空白", "重複"]);
    }

    #[test]
    fn test_file_fetch_rows() {
        let file = create_temp_workbook(WORKBOOK);
        let source = FileWorkbook::new(file.path().to_path_buf());

        let rows = source.fetch_rows("後端").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["狀態"], "已完成");
        assert_eq!(rows[1]["截止日"], "20240105");
        assert_eq!(rows[1]["狀態"], "");
    }

    #[test]
    fn test_file_empty_sheet() {
        let file = create_temp_workbook(WORKBOOK);
        let source = FileWorkbook::new(file.path().to_path_buf());
        assert!(source.fetch_rows("空白").unwrap().is_empty());
    }

    #[test]
    fn test_file_unknown_sheet_is_sheet_read_error() {
        let file = create_temp_workbook(WORKBOOK);
        let source = FileWorkbook::new(file.path().to_path_buf());
        assert!(matches!(
            source.fetch_rows("missing"),
            Err(SourceError::SheetRead { .. })
        ));
    }

    #[test]
    fn test_file_duplicate_header_is_sheet_read_error() {
        let file = create_temp_workbook(WORKBOOK);
        let source = FileWorkbook::new(file.path().to_path_buf());
        let err = source.fetch_rows("重複").unwrap_err();
        assert!(matches!(err, SourceError::SheetRead { ref sheet, .. } if sheet == "重複"));
    }

    #[test]
    fn test_file_missing_is_connection_error() {
        let source = FileWorkbook::new(PathBuf::from("/nonexistent/sheetboard/workbook.json"));
        assert!(matches!(
            source.list_sheet_names(),
            Err(SourceError::Connection(_))
        ));
    }

    #[test]
    fn test_file_invalid_json_is_connection_error() {
        let file = create_temp_workbook("{ not json");
        let source = FileWorkbook::new(file.path().to_path_buf());
        assert!(matches!(
            source.list_sheet_names(),
            Err(SourceError::Connection(_))
        ));
    }

    #[test]
    fn test_file_watch_path_and_label() {
        let file = create_temp_workbook(WORKBOOK);
        let source = FileWorkbook::new(file.path().to_path_buf());
        assert_eq!(source.watch_path(), Some(file.path()));
        assert!(!source.describe().is_empty());
    }
}
