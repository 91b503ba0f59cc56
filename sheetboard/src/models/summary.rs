//! Derived views of a workbook
//!
//! Everything here is computed fresh on each render pass from the rows the
//! source just returned, and dropped when the next pass lands.

use chrono::{DateTime, Local};
use indexmap::IndexMap;

/// Status value -> number of rows, largest count first
pub type Distribution = IndexMap<String, usize>;

/// A row reduced to the display columns, keyed in display order
pub type ProjectedRow = IndexMap<String, String>;

/// Completion counts for one sequence of rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tally {
    pub total: usize,
    pub completed: usize,
    /// `completed / total`, or 0.0 when there are no rows
    pub ratio: f64,
    pub has_status_column: bool,
}

impl Tally {
    pub fn empty() -> Self {
        Self {
            total: 0,
            completed: 0,
            ratio: 0.0,
            has_status_column: false,
        }
    }
}

/// Sidebar entry for one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSummary {
    pub name: String,
    pub total: usize,
    pub completed: usize,
    pub ratio: f64,
    pub has_status_column: bool,
    /// Set when the sheet's rows could not be read; counts are zero then
    pub fetch_error: Option<String>,
}

impl SheetSummary {
    pub fn from_tally(name: impl Into<String>, tally: Tally) -> Self {
        Self {
            name: name.into(),
            total: tally.total,
            completed: tally.completed,
            ratio: tally.ratio,
            has_status_column: tally.has_status_column,
            fetch_error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            fetch_error: Some(error.into()),
            ..Self::from_tally(name, Tally::empty())
        }
    }

    /// Whether the sidebar can show a progress gauge for this sheet
    pub fn has_progress(&self) -> bool {
        self.fetch_error.is_none() && self.has_status_column && self.total > 0
    }
}

/// Metric, distribution and table for the selected sheet
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub total: usize,
    pub completed: usize,
    pub ratio: f64,
    pub distribution: Distribution,
    pub columns: Vec<String>,
    pub rows: Vec<ProjectedRow>,
}

/// What the main panel shows for the selected sheet
#[derive(Debug, Clone, PartialEq)]
pub enum DetailPanel {
    Ready(DetailView),
    /// The sheet has no data rows
    Empty,
    /// Metric and chart are suppressed; the table still renders
    MissingStatusColumn {
        column: String,
        total: usize,
        columns: Vec<String>,
        rows: Vec<ProjectedRow>,
    },
    ReadFailed(String),
    /// The workbook lists no sheets at all
    NoSheets,
}

/// Snapshot produced by one render pass
#[derive(Debug, Clone)]
pub struct Board {
    pub title: String,
    pub selected: Option<String>,
    pub sheet_names: Vec<String>,
    pub overview: Vec<SheetSummary>,
    pub detail: DetailPanel,
    pub fetched_at: DateTime<Local>,
}

impl Board {
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.sheet_names.iter().position(|name| name == selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_summary_has_zero_counts() {
        let summary = SheetSummary::failed("A", "boom");
        assert_eq!(summary.total, 0);
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.ratio, 0.0);
        assert_eq!(summary.fetch_error.as_deref(), Some("boom"));
        assert!(!summary.has_progress());
    }

    #[test]
    fn test_summary_progress_requires_rows_and_status() {
        let with_rows = SheetSummary::from_tally(
            "A",
            Tally {
                total: 2,
                completed: 1,
                ratio: 0.5,
                has_status_column: true,
            },
        );
        assert!(with_rows.has_progress());
        assert!(!SheetSummary::from_tally("B", Tally::empty()).has_progress());
    }

    #[test]
    fn test_board_selected_index() {
        let board = Board {
            title: "t".to_string(),
            selected: Some("B".to_string()),
            sheet_names: vec!["A".to_string(), "B".to_string()],
            overview: Vec::new(),
            detail: DetailPanel::Empty,
            fetched_at: Local::now(),
        };
        assert_eq!(board.selected_index(), Some(1));
    }
}
