//! Spreadsheet backends
//!
//! A [`SheetSource`] is the only way the dashboard touches a workbook:
//! - `google`: a Google Sheets spreadsheet over the v4 REST API
//! - `file`: a local JSON workbook, re-read on every call

pub mod file;
pub mod google;
#[cfg(test)]
pub mod memory;

use std::path::Path;
use std::sync::Arc;

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::models::Row;

pub use file::FileWorkbook;
pub use google::GoogleSheets;

/// Read access to one workbook
pub trait SheetSource: Send + Sync {
    /// Names of all worksheets, in workbook order.
    /// Fails with [`SourceError::Connection`] when the workbook is unreachable.
    fn list_sheet_names(&self) -> Result<Vec<String>, SourceError>;

    /// Data rows of one worksheet, in sheet order.
    /// Fails with [`SourceError::SheetRead`] when that sheet cannot be read.
    fn fetch_rows(&self, sheet: &str) -> Result<Vec<Row>, SourceError>;

    /// Short label for the header bar
    fn describe(&self) -> String;

    /// A local file whose changes should trigger a refresh
    fn watch_path(&self) -> Option<&Path> {
        None
    }
}

/// Build the source named by the configuration
pub fn open_source(config: &SourceConfig) -> Result<Arc<dyn SheetSource>, SourceError> {
    let source: Arc<dyn SheetSource> = match config {
        SourceConfig::File { path } => Arc::new(FileWorkbook::new(path.clone())),
        SourceConfig::Google {
            spreadsheet_id,
            credentials,
        } => Arc::new(GoogleSheets::connect(spreadsheet_id, credentials)?),
    };
    Ok(source)
}
