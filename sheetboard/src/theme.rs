//! Theme module for sheetboard
//!
//! Centralized color palette and styling constants.

use ratatui::style::Color;

// ============================================================================
// Background Colors
// ============================================================================

/// Primary background color (#0a0e14)
pub const BG_PRIMARY: Color = Color::Rgb(10, 14, 20);

/// Secondary background color, used for cards (#12161c)
pub const BG_SECONDARY: Color = Color::Rgb(18, 22, 28);

/// Tertiary background color, for the selected card (#1a1f26)
pub const BG_TERTIARY: Color = Color::Rgb(26, 31, 38);

/// Subtle border color (#1e2530)
pub const BORDER_SUBTLE: Color = Color::Rgb(30, 37, 48);

// ============================================================================
// Accent Colors
// ============================================================================

/// Primary cyan accent color (#00d4aa)
pub const CYAN_PRIMARY: Color = Color::Rgb(0, 212, 170);

// ============================================================================
// Status Colors
// ============================================================================

/// Green success color (#4ade80)
pub const GREEN_SUCCESS: Color = Color::Rgb(74, 222, 128);

/// Amber warning color (#fbbf24)
pub const AMBER_WARNING: Color = Color::Rgb(251, 191, 36);

/// Red error color (#f87171)
pub const RED_ERROR: Color = Color::Rgb(248, 113, 113);

// ============================================================================
// Text Colors
// ============================================================================

/// Primary text color (#e2e8f0)
pub const TEXT_PRIMARY: Color = Color::Rgb(226, 232, 240);

/// Secondary text color (#94a3b8)
pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184);

/// Muted text color, for labels and hints (#64748b)
pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139);

// ============================================================================
// Chart Palette
// ============================================================================

/// Slice colors for the status pie chart, cycled when there are more statuses
pub const CHART_PALETTE: [Color; 8] = [
    Color::Rgb(0, 212, 170),   // cyan
    Color::Rgb(251, 191, 36),  // amber
    Color::Rgb(96, 165, 250),  // blue
    Color::Rgb(248, 113, 113), // red
    Color::Rgb(192, 132, 252), // violet
    Color::Rgb(74, 222, 128),  // green
    Color::Rgb(251, 146, 60),  // orange
    Color::Rgb(148, 163, 184), // slate
];

/// Color for the n-th slice of the pie chart
pub fn chart_color(index: usize) -> Color {
    CHART_PALETTE[index % CHART_PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_color_cycles() {
        assert_eq!(chart_color(0), CHART_PALETTE[0]);
        assert_eq!(chart_color(CHART_PALETTE.len()), CHART_PALETTE[0]);
        assert_eq!(chart_color(3), CHART_PALETTE[3]);
    }
}
