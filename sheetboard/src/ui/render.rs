//! Top-level frame layout

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph, Wrap},
};

use super::chart::render_status_chart;
use super::helpers::card_block;
use super::sidebar::render_overview;
use super::stats::render_metric_cards;
use super::table::render_task_table;
use crate::app::App;
use crate::models::{Board, DetailPanel};
use crate::theme::{
    AMBER_WARNING, BG_PRIMARY, CYAN_PRIMARY, RED_ERROR, TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY,
};
use crate::utils::format_duration;

const KEY_HINTS: &str = " q: Quit | ↑/↓: Sheet | PgUp/PgDn: Scroll | r: Refresh ";

/// Draw the whole dashboard for the current app state
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(BG_PRIMARY)), area);

    let header_height = if app.config.greeting.is_some() { 3 } else { 2 };
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height), // Title, selection, greeting
            Constraint::Min(3),                // Sidebar + main panel
            Constraint::Length(1),             // Bottom bar
        ])
        .split(area);

    render_header(main_layout[0], app, frame);

    if let Some(error) = &app.connection_error {
        let text = format!("❌ {}\n\nPress r to retry.", error);
        render_message(main_layout[1], text, RED_ERROR, frame);
    } else if let Some(board) = &app.board {
        render_body(main_layout[1], board, app, frame);
    } else {
        render_message(main_layout[1], "Loading workbook…".to_string(), TEXT_SECONDARY, frame);
    }

    let keybindings = Paragraph::new(KEY_HINTS).style(Style::default().fg(Color::Black).bg(CYAN_PRIMARY));
    frame.render_widget(keybindings, main_layout[2]);
}

fn render_header(area: Rect, app: &App, frame: &mut Frame) {
    let title = app
        .board
        .as_ref()
        .map(|board| board.title.as_str())
        .unwrap_or(&app.config.title);
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" {}", title),
            Style::default().fg(CYAN_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  ·  {}", app.source_label), Style::default().fg(TEXT_MUTED)),
    ])];

    let viewing = app
        .board
        .as_ref()
        .and_then(|board| board.selected.as_deref())
        .or(app.requested_sheet.as_deref())
        .unwrap_or("-");
    lines.push(Line::from(vec![
        Span::styled(" Viewing: ", Style::default().fg(TEXT_MUTED)),
        Span::styled(viewing.to_string(), Style::default().fg(TEXT_PRIMARY)),
    ]));

    if let Some(greeting) = &app.config.greeting {
        lines.push(Line::from(Span::styled(
            format!(" {}", greeting),
            Style::default().fg(TEXT_SECONDARY),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);

    let status = if app.refresh_state.is_busy() {
        app.refresh_state.label().to_string()
    } else {
        match (app.board.as_ref(), app.since_refresh()) {
            (Some(board), Some(elapsed)) => format!(
                "as of {}  ·  updated {} ago",
                board.fetched_at.format("%H:%M:%S"),
                format_duration(elapsed)
            ),
            (None, Some(elapsed)) => format!("failed {} ago", format_duration(elapsed)),
            _ => String::new(),
        }
    };
    let status_line = Paragraph::new(Line::from(Span::styled(
        format!("{} ", status),
        Style::default().fg(TEXT_MUTED),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(status_line, Rect::new(area.x, area.y, area.width, area.height.min(1)));
}

fn render_body(area: Rect, board: &Board, app: &App, frame: &mut Frame) {
    // 30% sidebar, 70% main panel
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    render_overview(
        panels[0],
        &app.config.overview_heading,
        &board.overview,
        app.selected_index(),
        &app.config.status_column,
        frame,
    );
    render_detail(panels[1], &board.detail, app, frame);
}

fn render_detail(area: Rect, detail: &DetailPanel, app: &App, frame: &mut Frame) {
    let config = &app.config;
    match detail {
        DetailPanel::Ready(view) => {
            let sections = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(5),
                    Constraint::Percentage(45),
                    Constraint::Min(4),
                ])
                .split(area);

            render_metric_cards(sections[0], view.completed, view.total, view.ratio, frame);
            render_status_chart(sections[1], &view.distribution, frame);
            render_task_table(
                sections[2],
                &view.columns,
                &view.rows,
                app.table_scroll_offset,
                &config.status_column,
                &config.done_value,
                frame,
            );
        }
        DetailPanel::MissingStatusColumn {
            column,
            total,
            columns,
            rows,
        } => {
            let sections = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(4), Constraint::Min(4)])
                .split(area);

            let text = format!(
                "❌ Column \"{}\" not found in this sheet ({} rows). Check the header row.",
                column, total
            );
            render_message(sections[0], text, AMBER_WARNING, frame);
            render_task_table(
                sections[1],
                columns,
                rows,
                app.table_scroll_offset,
                &config.status_column,
                &config.done_value,
                frame,
            );
        }
        DetailPanel::Empty => {
            render_message(area, "This sheet has no data yet.".to_string(), TEXT_SECONDARY, frame);
        }
        DetailPanel::ReadFailed(message) => {
            render_message(area, format!("❌ {}", message), RED_ERROR, frame);
        }
        DetailPanel::NoSheets => {
            render_message(area, "The workbook has no sheets.".to_string(), TEXT_SECONDARY, frame);
        }
    }
}

fn render_message(area: Rect, text: String, color: Color, frame: &mut Frame) {
    let message = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(card_block(false))
        .wrap(Wrap { trim: true });
    frame.render_widget(message, area);
}
