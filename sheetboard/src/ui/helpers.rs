//! UI helper functions

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders},
};

use crate::theme::{BG_SECONDARY, BORDER_SUBTLE, CYAN_PRIMARY};

/// Rounded card block, highlighted when selected
pub fn card_block(selected: bool) -> Block<'static> {
    let border_color = if selected { CYAN_PRIMARY } else { BORDER_SUBTLE };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(BG_SECONDARY))
}

/// Label for a status value; blank cells get a visible placeholder
pub fn status_label(status: &str) -> &str {
    if status.is_empty() {
        "(blank)"
    } else {
        status
    }
}

/// Largest rectangle inside `area` whose braille dot grid is square, centered.
///
/// A braille cell holds 2x4 dots and is about twice as tall as wide, so a
/// round chart needs twice as many columns as rows.
pub fn square_chart_area(area: Rect) -> Rect {
    let width = area.width.min(area.height.saturating_mul(2));
    let height = width / 2;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
