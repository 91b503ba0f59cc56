//! Sidebar overview: one card per sheet

use ratatui::{
    prelude::*,
    widgets::{Gauge, Paragraph},
};

use super::helpers::card_block;
use crate::models::SheetSummary;
use crate::theme::{
    AMBER_WARNING, BG_PRIMARY, BG_TERTIARY, CYAN_PRIMARY, GREEN_SUCCESS, RED_ERROR,
    TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY,
};
use crate::utils::truncate_chars;

/// Height of a sheet card:
/// - with progress: 5 lines (border + name + gauge + caption + border)
/// - otherwise: 4 lines (border + name + warning + border)
pub fn card_height(summary: &SheetSummary) -> u16 {
    if summary.has_progress() { 5 } else { 4 }
}

/// First card to draw so the selected card stays on screen
pub fn first_visible_card(heights: &[u16], selected: usize, available: u16) -> usize {
    let mut first = 0;
    while first < selected {
        let used: u16 = heights[first..=selected.min(heights.len() - 1)].iter().sum();
        if used <= available {
            break;
        }
        first += 1;
    }
    first
}

/// Warning caption for a sheet without a progress gauge
pub fn warning_caption(summary: &SheetSummary, status_column: &str) -> (String, Color) {
    match &summary.fetch_error {
        Some(error) => (format!("⚠ error: {}", error), RED_ERROR),
        None => (
            format!("⚠ no data or no \"{}\" column", status_column),
            AMBER_WARNING,
        ),
    }
}

fn render_sheet_card(
    area: Rect,
    summary: &SheetSummary,
    selected: bool,
    status_column: &str,
    frame: &mut Frame,
) {
    let mut block = card_block(selected);
    if selected {
        block = block.style(Style::default().bg(BG_TERTIARY));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let inner_width = inner.width.saturating_sub(2) as usize;
    let (indicator, indicator_color) = if summary.has_progress() && summary.completed == summary.total {
        ("●", GREEN_SUCCESS)
    } else if selected {
        ("●", CYAN_PRIMARY)
    } else {
        ("○", TEXT_MUTED)
    };
    let name_color = if selected { CYAN_PRIMARY } else { TEXT_PRIMARY };
    let name_line = Line::from(vec![
        Span::styled(format!("{} ", indicator), Style::default().fg(indicator_color)),
        Span::styled(
            truncate_chars(&summary.name, inner_width),
            Style::default().fg(name_color).add_modifier(Modifier::BOLD),
        ),
    ]);

    let lines = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(name_line), lines[0]);

    if summary.has_progress() {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(CYAN_PRIMARY).bg(BG_PRIMARY))
            .ratio(summary.ratio.clamp(0.0, 1.0))
            .label("");
        frame.render_widget(gauge, lines[1]);

        let caption = Line::from(Span::styled(
            format!("✓ {} / {}", summary.completed, summary.total),
            Style::default().fg(TEXT_SECONDARY),
        ));
        frame.render_widget(Paragraph::new(caption), lines[2]);
    } else {
        let (text, color) = warning_caption(summary, status_column);
        let caption = Line::from(Span::styled(
            truncate_chars(&text, inner.width as usize),
            Style::default().fg(color),
        ));
        frame.render_widget(Paragraph::new(caption), lines[1]);
    }
}

/// Render the heading and the sheet cards, keeping the selected card visible
pub fn render_overview(
    area: Rect,
    heading: &str,
    overview: &[SheetSummary],
    selected: Option<usize>,
    status_column: &str,
    frame: &mut Frame,
) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let heading_line = Line::from(Span::styled(
        format!(" {}", heading),
        Style::default()
            .fg(TEXT_SECONDARY)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(heading_line), sections[0]);

    if overview.is_empty() {
        let empty = Paragraph::new(Span::styled(" No sheets", Style::default().fg(TEXT_MUTED)));
        frame.render_widget(empty, sections[1]);
        return;
    }

    let list_area = sections[1];
    let heights: Vec<u16> = overview.iter().map(card_height).collect();
    let first = first_visible_card(&heights, selected.unwrap_or(0), list_area.height);

    let mut y = list_area.y;
    let bottom = list_area.y + list_area.height;
    for (index, summary) in overview.iter().enumerate().skip(first) {
        let height = heights[index];
        if y + height > bottom {
            break;
        }
        let card_area = Rect::new(list_area.x, y, list_area.width, height);
        render_sheet_card(
            card_area,
            summary,
            selected == Some(index),
            status_column,
            frame,
        );
        y += height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tally;

    fn summary(total: usize, completed: usize, has_status_column: bool) -> SheetSummary {
        SheetSummary::from_tally(
            "A",
            Tally {
                total,
                completed,
                ratio: if total > 0 {
                    completed as f64 / total as f64
                } else {
                    0.0
                },
                has_status_column,
            },
        )
    }

    #[test]
    fn test_card_height() {
        assert_eq!(card_height(&summary(2, 1, true)), 5);
        assert_eq!(card_height(&summary(0, 0, false)), 4);
        assert_eq!(card_height(&SheetSummary::failed("B", "boom")), 4);
    }

    #[test]
    fn test_warning_caption_missing_status() {
        let (text, color) = warning_caption(&summary(3, 0, false), "狀態");
        assert_eq!(text, "⚠ no data or no \"狀態\" column");
        assert_eq!(color, AMBER_WARNING);
    }

    #[test]
    fn test_warning_caption_fetch_error() {
        let (text, color) = warning_caption(&SheetSummary::failed("B", "HTTP 500"), "狀態");
        assert_eq!(text, "⚠ error: HTTP 500");
        assert_eq!(color, RED_ERROR);
    }

    #[test]
    fn test_first_visible_card_when_everything_fits() {
        assert_eq!(first_visible_card(&[5, 5, 5], 2, 20), 0);
    }

    #[test]
    fn test_first_visible_card_scrolls_to_selected() {
        assert_eq!(first_visible_card(&[5, 5, 5, 5], 3, 10), 2);
        assert_eq!(first_visible_card(&[5, 4, 5, 4], 3, 9), 2);
    }
}
