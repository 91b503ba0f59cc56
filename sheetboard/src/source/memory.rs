//! In-memory workbook for tests

use std::sync::Mutex;

use crate::error::SourceError;
use crate::models::Row;

use super::SheetSource;

/// Sheets held in memory. A sheet stored as `Err` fails to read.
pub struct MemoryWorkbook {
    sheets: Vec<(String, Result<Vec<Row>, String>)>,
    offline: bool,
    pub fetches: Mutex<Vec<String>>,
}

impl MemoryWorkbook {
    pub fn new(sheets: Vec<(&str, Result<Vec<Row>, &str>)>) -> Self {
        Self {
            sheets: sheets
                .into_iter()
                .map(|(name, rows)| (name.to_string(), rows.map_err(str::to_string)))
                .collect(),
            offline: false,
            fetches: Mutex::new(Vec::new()),
        }
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn fetch_log(&self) -> Vec<String> {
        self.fetches.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

impl SheetSource for MemoryWorkbook {
    fn list_sheet_names(&self) -> Result<Vec<String>, SourceError> {
        if self.offline {
            return Err(SourceError::Connection("network unreachable".to_string()));
        }
        Ok(self.sheets.iter().map(|(name, _)| name.clone()).collect())
    }

    fn fetch_rows(&self, sheet: &str) -> Result<Vec<Row>, SourceError> {
        if let Ok(mut log) = self.fetches.lock() {
            log.push(sheet.to_string());
        }
        match self.sheets.iter().find(|(name, _)| name == sheet) {
            Some((_, Ok(rows))) => Ok(rows.clone()),
            Some((_, Err(message))) => Err(SourceError::sheet_read(sheet, message)),
            None => Err(SourceError::sheet_read(sheet, "no such sheet")),
        }
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Build a row from column/value pairs
pub fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
