//! Status distribution pie chart

use std::f64::consts::TAU;

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Points},
        Paragraph,
    },
};

use super::helpers::{card_block, square_chart_area, status_label};
use crate::models::Distribution;
use crate::theme::{chart_color, TEXT_MUTED, TEXT_PRIMARY};
use crate::utils::{format_percent, truncate_chars};

/// Sample the unit disc on a `resolution` x `resolution` grid and bucket each
/// point into the slice covering its angle.
///
/// Slices start at twelve o'clock and run clockwise, in input order, each
/// spanning an angle proportional to its count.
pub fn pie_slices(counts: &[usize], resolution: usize) -> Vec<Vec<(f64, f64)>> {
    let total: usize = counts.iter().sum();
    let mut slices = vec![Vec::new(); counts.len()];
    if total == 0 || resolution < 2 {
        return slices;
    }

    // Upper angle bound of each slice
    let mut bounds = Vec::with_capacity(counts.len());
    let mut acc = 0usize;
    for count in counts {
        acc += count;
        bounds.push(acc as f64 / total as f64 * TAU);
    }

    let step = 2.0 / (resolution - 1) as f64;
    for i in 0..resolution {
        for j in 0..resolution {
            let x = -1.0 + i as f64 * step;
            let y = -1.0 + j as f64 * step;
            if x * x + y * y > 1.0 {
                continue;
            }
            let mut angle = x.atan2(y);
            if angle < 0.0 {
                angle += TAU;
            }
            let slice = bounds
                .iter()
                .position(|bound| angle < *bound)
                .unwrap_or(counts.len() - 1);
            slices[slice].push((x, y));
        }
    }

    slices
}

/// Render the pie chart on the left and its legend on the right
pub fn render_status_chart(area: Rect, distribution: &Distribution, frame: &mut Frame) {
    let block = card_block(false).title(Span::styled(
        " Status Distribution ",
        Style::default().fg(TEXT_PRIMARY),
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let chart_area = square_chart_area(halves[0]);
    let counts: Vec<usize> = distribution.values().copied().collect();
    // Braille gives two dots per column, so sample at that density
    let resolution = (chart_area.width as usize * 2).max(2);
    let slices = pie_slices(&counts, resolution);

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for (index, coords) in slices.iter().enumerate() {
                ctx.draw(&Points {
                    coords,
                    color: chart_color(index),
                });
            }
        });
    frame.render_widget(canvas, chart_area);

    let total: usize = counts.iter().sum();
    let label_width = halves[1].width.saturating_sub(14) as usize;
    let legend: Vec<Line> = distribution
        .iter()
        .enumerate()
        .map(|(index, (status, count))| {
            let share = if total > 0 {
                *count as f64 / total as f64
            } else {
                0.0
            };
            Line::from(vec![
                Span::styled("● ", Style::default().fg(chart_color(index))),
                Span::styled(
                    truncate_chars(status_label(status), label_width),
                    Style::default().fg(TEXT_PRIMARY),
                ),
                Span::styled(
                    format!("  {} ({})", count, format_percent(share)),
                    Style::default().fg(TEXT_MUTED),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(legend), halves[1]);
}
