//! Error types shared by the sources and the view assembler.

use thiserror::Error;

/// Failures reported by a [`SheetSource`](crate::source::SheetSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The workbook itself cannot be reached or opened. Nothing can render.
    #[error("cannot open workbook: {0}")]
    Connection(String),
    /// One worksheet could not be read. Only that sheet degrades.
    #[error("cannot read sheet \"{sheet}\": {message}")]
    SheetRead { sheet: String, message: String },
}

impl SourceError {
    pub fn sheet_read(sheet: impl Into<String>, message: impl ToString) -> Self {
        SourceError::SheetRead {
            sheet: sheet.into(),
            message: message.to_string(),
        }
    }

    /// Text shown next to a degraded sheet, without repeating its name
    pub fn short_message(&self) -> &str {
        match self {
            SourceError::Connection(message) => message,
            SourceError::SheetRead { message, .. } => message,
        }
    }
}

/// Failures of the detail view for a single sheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("status column \"{0}\" not found in this sheet")]
    MissingStatusColumn(String),
}
