//! Utility functions for common operations.

use std::time::Duration;

/// Format duration as MM:SS
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Format a completion ratio as a whole percent, rounded down
pub fn format_percent(ratio: f64) -> String {
    format!("{}%", (ratio.clamp(0.0, 1.0) * 100.0).floor() as u32)
}

/// Truncate to `max_chars` characters, marking the cut with "…"
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let kept: String = text.chars().take(max_chars - 1).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_zero() {
        assert_eq!(format_duration(Duration::from_secs(0)), "00:00");
    }

    #[test]
    fn test_format_duration_minutes_and_seconds() {
        assert_eq!(format_duration(Duration::from_secs(125)), "02:05");
    }

    #[test]
    fn test_format_duration_hour_plus() {
        assert_eq!(format_duration(Duration::from_secs(3661)), "61:01");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(0.5), "50%");
        assert_eq!(format_percent(2.0 / 3.0), "66%");
        assert_eq!(format_percent(1.0), "100%");
    }

    #[test]
    fn test_truncate_chars_short() {
        assert_eq!(truncate_chars("工作", 5), "工作");
    }

    #[test]
    fn test_truncate_chars_long() {
        assert_eq!(truncate_chars("專案進度管理", 4), "專案進…");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
