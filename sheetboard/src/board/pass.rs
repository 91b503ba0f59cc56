//! One render pass: fetch everything, aggregate, hand back a snapshot

use std::time::Instant;

use chrono::Local;
use tracing::{info, warn};

use super::view::{build_detail, build_overview, project_rows};
use crate::config::BoardConfig;
use crate::error::{SourceError, ViewError};
use crate::models::{Board, DetailPanel};
use crate::source::SheetSource;

/// Pick the sheet to show: the requested one while it still exists,
/// otherwise the first sheet of the workbook.
pub fn resolve_selection(sheet_names: &[String], requested: Option<&str>) -> Option<String> {
    requested
        .and_then(|wanted| sheet_names.iter().find(|name| name.as_str() == wanted))
        .or_else(|| sheet_names.first())
        .cloned()
}

/// Run a full pass over the workbook.
///
/// Only a connection failure aborts the pass. Every per-sheet failure is
/// folded into that sheet's summary or into the detail panel.
pub fn render_pass(
    source: &dyn SheetSource,
    config: &BoardConfig,
    requested: Option<&str>,
) -> Result<Board, SourceError> {
    let started = Instant::now();
    let sheet_names = source.list_sheet_names()?;
    let selected = resolve_selection(&sheet_names, requested);

    let overview = build_overview(
        sheet_names
            .iter()
            .map(|name| (name.clone(), source.fetch_rows(name))),
        &config.status_column,
        &config.done_value,
    );

    let detail = match selected.as_deref() {
        Some(name) => detail_panel(source, config, name),
        None => DetailPanel::NoSheets,
    };

    info!(
        sheets = sheet_names.len(),
        selected = selected.as_deref().unwrap_or("-"),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "render pass complete"
    );

    Ok(Board {
        title: config.title.clone(),
        selected,
        sheet_names,
        overview,
        detail,
        fetched_at: Local::now(),
    })
}

/// Fetch the selected sheet again and build its main panel
fn detail_panel(source: &dyn SheetSource, config: &BoardConfig, sheet: &str) -> DetailPanel {
    let rows = match source.fetch_rows(sheet) {
        Ok(rows) => rows,
        Err(err) => {
            warn!(sheet, error = %err, "selected sheet could not be read");
            return DetailPanel::ReadFailed(err.to_string());
        }
    };

    if rows.is_empty() {
        return DetailPanel::Empty;
    }

    match build_detail(
        &rows,
        &config.status_column,
        &config.done_value,
        &config.display_columns,
    ) {
        Ok(view) => DetailPanel::Ready(view),
        Err(ViewError::MissingStatusColumn(column)) => {
            DetailPanel::MissingStatusColumn {
                column,
                total: rows.len(),
                columns: config.display_columns.clone(),
                rows: project_rows(&rows, &config.display_columns),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        SourceConfig, DEFAULT_DISPLAY_COLUMNS, DEFAULT_DONE_VALUE, DEFAULT_STATUS_COLUMN,
    };
    use crate::source::memory::{row, MemoryWorkbook};
    use std::path::PathBuf;

    fn config() -> BoardConfig {
        BoardConfig {
            title: "Board".to_string(),
            greeting: None,
            overview_heading: "Overview".to_string(),
            status_column: DEFAULT_STATUS_COLUMN.to_string(),
            done_value: DEFAULT_DONE_VALUE.to_string(),
            display_columns: DEFAULT_DISPLAY_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            source: SourceConfig::File {
                path: PathBuf::from("unused.json"),
            },
            auto_refresh: None,
            initial_sheet: None,
            log_dir: PathBuf::from("logs"),
        }
    }

    fn workbook() -> MemoryWorkbook {
        MemoryWorkbook::new(vec![
            (
                "工作",
                Ok(vec![
                    row(&[("任務細項", "a"), ("截止日", "2024-01-01"), ("狀態", "已完成")]),
                    row(&[("任務細項", "b"), ("截止日", "2024-02-01"), ("狀態", "進行中")]),
                ]),
            ),
            ("空白", Ok(Vec::new())),
            ("壞掉", Err("HTTP 500")),
            ("無狀態", Ok(vec![row(&[("任務細項", "c")])])),
        ])
    }

    #[test]
    fn test_resolve_selection() {
        let names = vec!["A".to_string(), "B".to_string()];
        assert_eq!(resolve_selection(&names, Some("B")), Some("B".to_string()));
        assert_eq!(resolve_selection(&names, Some("gone")), Some("A".to_string()));
        assert_eq!(resolve_selection(&names, None), Some("A".to_string()));
        assert_eq!(resolve_selection(&[], Some("A")), None);
    }

    #[test]
    fn test_pass_builds_overview_for_every_sheet() {
        let source = workbook();
        let board = render_pass(&source, &config(), None).unwrap();

        let names: Vec<&str> = board.overview.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["工作", "空白", "壞掉", "無狀態"]);
        assert_eq!(board.overview[0].completed, 1);
        assert_eq!(board.overview[0].total, 2);
        assert_eq!(board.overview[2].fetch_error.as_deref(), Some("HTTP 500"));
        assert!(!board.overview[3].has_status_column);
        assert_eq!(board.title, "Board");
    }

    #[test]
    fn test_pass_selects_first_sheet_by_default() {
        let source = workbook();
        let board = render_pass(&source, &config(), None).unwrap();

        assert_eq!(board.selected.as_deref(), Some("工作"));
        match board.detail {
            DetailPanel::Ready(view) => {
                assert_eq!((view.completed, view.total), (1, 2));
                assert_eq!(view.rows.len(), 2);
            }
            other => panic!("expected ready detail, got {:?}", other),
        }
    }

    #[test]
    fn test_pass_refetches_selected_sheet() {
        let source = workbook();
        render_pass(&source, &config(), Some("空白")).unwrap();
        let log = source.fetch_log();
        assert_eq!(log.iter().filter(|name| *name == "空白").count(), 2);
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn test_pass_empty_sheet_detail() {
        let source = workbook();
        let board = render_pass(&source, &config(), Some("空白")).unwrap();
        assert_eq!(board.detail, DetailPanel::Empty);
    }

    #[test]
    fn test_pass_unreadable_sheet_detail() {
        let source = workbook();
        let board = render_pass(&source, &config(), Some("壞掉")).unwrap();
        assert!(matches!(board.detail, DetailPanel::ReadFailed(ref msg) if msg.contains("HTTP 500")));
    }

    #[test]
    fn test_pass_missing_status_column_keeps_table() {
        let source = workbook();
        let board = render_pass(&source, &config(), Some("無狀態")).unwrap();
        match board.detail {
            DetailPanel::MissingStatusColumn {
                column,
                total,
                rows,
                ..
            } => {
                assert_eq!(column, "狀態");
                assert_eq!(total, 1);
                assert_eq!(rows[0]["任務細項"], "c");
                assert_eq!(rows[0]["狀態"], "");
            }
            other => panic!("expected missing status column, got {:?}", other),
        }
    }

    #[test]
    fn test_pass_connection_error_aborts() {
        let source = MemoryWorkbook::offline();
        let result = render_pass(&source, &config(), None);
        assert!(matches!(result, Err(SourceError::Connection(_))));
    }

    #[test]
    fn test_pass_no_sheets() {
        let source = MemoryWorkbook::new(Vec::new());
        let board = render_pass(&source, &config(), Some("工作")).unwrap();
        assert!(board.overview.is_empty());
        assert_eq!(board.selected, None);
        assert_eq!(board.detail, DetailPanel::NoSheets);
    }
}
