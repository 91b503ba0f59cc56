//! Data models for sheetboard
//!
//! This module contains the core data structures:
//! - Worksheet records as read from the spreadsheet
//! - Derived summaries and detail views for one render pass
//! - Enums for UI state

pub mod enums;
pub mod sheet;
pub mod summary;

// Re-exports for convenient access
pub use enums::RefreshState;
pub use sheet::{records_from_values, Row};
pub use summary::{
    Board, DetailPanel, DetailView, Distribution, ProjectedRow, SheetSummary, Tally,
};
