//! Sidebar overview and detail view assembly

use tracing::warn;

use super::aggregate::{aggregate, distribution_of};
use crate::error::{SourceError, ViewError};
use crate::models::{DetailView, ProjectedRow, Row, SheetSummary};

/// Build one summary per sheet, in input order.
///
/// A sheet whose rows could not be fetched gets a summary carrying the error
/// text and zero counts; the other sheets are unaffected.
pub fn build_overview<I>(sheets: I, status_column: &str, done_value: &str) -> Vec<SheetSummary>
where
    I: IntoIterator<Item = (String, Result<Vec<Row>, SourceError>)>,
{
    sheets
        .into_iter()
        .map(|(name, fetched)| match fetched {
            Ok(rows) => {
                let tally = aggregate(&rows, status_column, done_value);
                if !rows.is_empty() && !tally.has_status_column {
                    warn!(sheet = %name, column = status_column, "status column missing");
                }
                SheetSummary::from_tally(name, tally)
            }
            Err(err) => {
                warn!(sheet = %name, error = %err, "sheet read failed");
                SheetSummary::failed(name, err.short_message())
            }
        })
        .collect()
}

/// Keep only the display columns of each row, in display order.
///
/// A display column missing from a row projects to a blank cell.
pub fn project_rows(rows: &[Row], display_columns: &[String]) -> Vec<ProjectedRow> {
    rows.iter()
        .map(|row| {
            display_columns
                .iter()
                .map(|column| {
                    let text = row.get(column).cloned().unwrap_or_default();
                    (column.clone(), text)
                })
                .collect()
        })
        .collect()
}

/// Metric, status distribution and projected table for one sheet
pub fn build_detail(
    rows: &[Row],
    status_column: &str,
    done_value: &str,
    display_columns: &[String],
) -> Result<DetailView, ViewError> {
    let distribution = distribution_of(rows, status_column)?;
    let tally = aggregate(rows, status_column, done_value);

    Ok(DetailView {
        total: tally.total,
        completed: tally.completed,
        ratio: tally.ratio,
        distribution,
        columns: display_columns.to_vec(),
        rows: project_rows(rows, display_columns),
    })
}
