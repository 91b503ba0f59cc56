//! Completion counting over worksheet rows

use crate::error::ViewError;
use crate::models::{Distribution, Row, Tally};

/// Whether the rows' schema has the given column.
///
/// Records carry their sheet's full header, so the first row stands for the
/// whole sheet. An empty sheet has no known schema.
pub fn has_column(rows: &[Row], column: &str) -> bool {
    rows.first().is_some_and(|row| row.contains_key(column))
}

/// Count rows and completed rows.
///
/// Never fails: an empty sheet or one without the status column yields zero
/// counts so every sheet still gets a sidebar entry.
pub fn aggregate(rows: &[Row], status_column: &str, done_value: &str) -> Tally {
    // Counts stay zero when the status column is missing
    if !has_column(rows, status_column) {
        return Tally::empty();
    }

    let total = rows.len();

    let completed = rows
        .iter()
        .filter(|row| row.get(status_column).is_some_and(|v| v == done_value))
        .count();

    Tally {
        total,
        completed,
        ratio: completed as f64 / total as f64,
        has_status_column: true,
    }
}

/// Count rows per status value, largest group first.
///
/// Rows with a blank or missing status are counted under `""`. Groups of
/// equal size keep the order in which their value first appeared.
pub fn distribution_of(rows: &[Row], status_column: &str) -> Result<Distribution, ViewError> {
    if !has_column(rows, status_column) {
        return Err(ViewError::MissingStatusColumn(status_column.to_string()));
    }

    let mut counts = Distribution::new();
    for row in rows {
        let status = row.get(status_column).cloned().unwrap_or_default();
        *counts.entry(status).or_insert(0) += 1;
    }

    // Stable sort keeps first-appearance order among ties
    counts.sort_by(|_, a, _, b| b.cmp(a));
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "狀態";
    const DONE: &str = "已完成";

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn status_rows(statuses: &[&str]) -> Vec<Row> {
        statuses.iter().map(|s| row(&[(STATUS, s)])).collect()
    }

    #[test]
    fn test_aggregate_empty() {
        let tally = aggregate(&[], STATUS, DONE);
        assert_eq!(tally, Tally::empty());
        assert_eq!(tally.ratio, 0.0);
    }

    #[test]
    fn test_aggregate_counts_exact_matches() {
        let rows = status_rows(&["已完成", "進行中", "已完成", "未開始"]);
        let tally = aggregate(&rows, STATUS, DONE);
        assert_eq!(tally.total, 4);
        assert_eq!(tally.completed, 2);
        assert_eq!(tally.ratio, 0.5);
        assert!(tally.has_status_column);
    }

    #[test]
    fn test_aggregate_does_not_trim() {
        let rows = status_rows(&["已完成 ", " 已完成", "已完成"]);
        let tally = aggregate(&rows, STATUS, DONE);
        assert_eq!(tally.completed, 1);
    }

    #[test]
    fn test_aggregate_missing_status_column() {
        let rows = vec![row(&[("任務細項", "x")]), row(&[("任務細項", "y")])];
        let tally = aggregate(&rows, STATUS, DONE);
        assert!(!tally.has_status_column);
        assert_eq!(tally.total, 0);
        assert_eq!(tally.completed, 0);
        assert_eq!(tally.ratio, 0.0);
        assert_eq!(tally, Tally::empty());
    }

    #[test]
    fn test_aggregate_bounds_hold() {
        let samples: [&[&str]; 4] = [
            &["已完成"],
            &["進行中"],
            &["已完成", "已完成", "已完成"],
            &["", "已完成", "進行中", "已完成", "x"],
        ];
        for statuses in samples {
            let tally = aggregate(&status_rows(statuses), STATUS, DONE);
            assert!(tally.completed <= tally.total);
            assert!((0.0..=1.0).contains(&tally.ratio));
            assert_eq!(tally.ratio, tally.completed as f64 / tally.total as f64);
        }
    }

    #[test]
    fn test_aggregate_all_done() {
        let tally = aggregate(&status_rows(&["已完成", "已完成"]), STATUS, DONE);
        assert_eq!(tally.completed, 2);
        assert_eq!(tally.ratio, 1.0);
    }

    #[test]
    fn test_distribution_sums_to_row_count() {
        let rows = status_rows(&["進行中", "已完成", "", "進行中", "未開始", "已完成", "進行中"]);
        let distribution = distribution_of(&rows, STATUS).unwrap();
        assert_eq!(distribution.values().sum::<usize>(), rows.len());
    }

    #[test]
    fn test_distribution_orders_by_count_then_first_seen() {
        let rows = status_rows(&["未開始", "已完成", "進行中", "已完成", "進行中"]);
        let distribution = distribution_of(&rows, STATUS).unwrap();
        let order: Vec<(&str, usize)> = distribution
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(order, vec![("已完成", 2), ("進行中", 2), ("未開始", 1)]);
    }

    #[test]
    fn test_distribution_counts_blank_status() {
        let rows = status_rows(&["", "已完成", ""]);
        let distribution = distribution_of(&rows, STATUS).unwrap();
        assert_eq!(distribution.get(""), Some(&2));
    }

    #[test]
    fn test_distribution_missing_column() {
        let rows = vec![row(&[("任務細項", "x")])];
        assert_eq!(
            distribution_of(&rows, STATUS),
            Err(ViewError::MissingStatusColumn(STATUS.to_string()))
        );
    }

    #[test]
    fn test_distribution_of_empty_rows_is_missing_column() {
        assert!(distribution_of(&[], STATUS).is_err());
    }
}
