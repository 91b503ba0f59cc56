//! Metric card rendering functions

use ratatui::{
    prelude::*,
    widgets::{Gauge, Paragraph},
};

use super::helpers::card_block;
use crate::theme::{BG_SECONDARY, CYAN_PRIMARY, GREEN_SUCCESS, TEXT_MUTED};
use crate::utils::format_percent;

fn stat_card(value: String, label: &'static str, color: Color) -> Paragraph<'static> {
    let content = vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label, Style::default().fg(TEXT_MUTED))),
    ];
    Paragraph::new(content)
        .block(card_block(false))
        .alignment(Alignment::Center)
}

/// Render the completion metric: done/total, percent and tasks left,
/// with a progress bar underneath
pub fn render_metric_cards(area: Rect, completed: usize, total: usize, ratio: f64, frame: &mut Frame) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(1)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[0]);

    let progress_color = if total > 0 && completed == total {
        GREEN_SUCCESS
    } else {
        CYAN_PRIMARY
    };

    frame.render_widget(
        stat_card(format!("{}/{}", completed, total), "COMPLETED", CYAN_PRIMARY),
        cards[0],
    );
    frame.render_widget(
        stat_card(format_percent(ratio), "PROGRESS", progress_color),
        cards[1],
    );
    frame.render_widget(
        stat_card(
            total.saturating_sub(completed).to_string(),
            "TASKS LEFT",
            CYAN_PRIMARY,
        ),
        cards[2],
    );

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(progress_color).bg(BG_SECONDARY))
        .ratio(ratio.clamp(0.0, 1.0))
        .label("");
    frame.render_widget(gauge, rows[1]);
}
