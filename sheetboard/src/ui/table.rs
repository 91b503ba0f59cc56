//! Task table rendering

use ratatui::{
    prelude::*,
    widgets::{Cell, Row, Table},
};

use super::helpers::card_block;
use crate::models::ProjectedRow;
use crate::theme::{BG_TERTIARY, CYAN_PRIMARY, GREEN_SUCCESS, TEXT_MUTED, TEXT_PRIMARY};

/// Rows that fit in a table of the given outer height (borders and header excluded)
pub fn visible_rows(height: u16) -> usize {
    height.saturating_sub(3) as usize
}

/// First row to draw so that `offset` never scrolls past the last page
pub fn clamp_offset(offset: usize, total: usize, visible: usize) -> usize {
    offset.min(total.saturating_sub(visible))
}

/// Render the projected task table starting at `offset`.
///
/// Cells of the status column that hold the done value are highlighted.
pub fn render_task_table(
    area: Rect,
    columns: &[String],
    rows: &[ProjectedRow],
    offset: usize,
    status_column: &str,
    done_value: &str,
    frame: &mut Frame,
) {
    let visible = visible_rows(area.height);
    let offset = clamp_offset(offset, rows.len(), visible);
    let last = (offset + visible).min(rows.len());

    let title = if rows.is_empty() {
        " Tasks ".to_string()
    } else {
        format!(" Tasks {}-{} of {} ", offset + 1, last, rows.len())
    };

    let header = Row::new(columns.iter().map(|column| {
        Cell::from(Span::styled(
            column.clone(),
            Style::default()
                .fg(CYAN_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ))
    }))
    .style(Style::default().bg(BG_TERTIARY));

    let body = rows[offset..last].iter().map(|record| {
        Row::new(record.iter().map(|(column, value)| {
            let color = if column == status_column && value == done_value {
                GREEN_SUCCESS
            } else {
                TEXT_PRIMARY
            };
            Cell::from(Span::styled(value.clone(), Style::default().fg(color)))
        }))
    });

    let widths = vec![Constraint::Ratio(1, columns.len().max(1) as u32); columns.len()];

    let table = Table::new(body, widths)
        .header(header)
        .column_spacing(2)
        .block(
            card_block(false).title(Span::styled(title, Style::default().fg(TEXT_MUTED))),
        );

    frame.render_widget(table, area);
}
