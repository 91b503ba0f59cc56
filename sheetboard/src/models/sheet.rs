//! Worksheet records
//!
//! A worksheet arrives as a grid of cells whose first row is the header.
//! Every later row becomes a [`Row`] keyed by the header names, so each record
//! carries the full schema of its sheet.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;

/// One data row: column name -> cell text, in header order
pub type Row = IndexMap<String, String>;

/// Render a raw cell as text. Null cells are blank.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Turn a value grid (header row first) into records.
///
/// Short rows are padded with blank cells and cells past the last header are
/// dropped. A header that names the same column twice cannot be keyed and is
/// reported as an error; blank header cells are allowed.
pub fn records_from_values(values: &[Vec<Value>]) -> Result<Vec<Row>, String> {
    let Some((header, body)) = values.split_first() else {
        return Ok(Vec::new());
    };

    let header: Vec<String> = header.iter().map(cell_text).collect();

    let mut seen = HashSet::new();
    for name in header.iter().filter(|name| !name.is_empty()) {
        if !seen.insert(name.as_str()) {
            return Err(format!("header row contains duplicate column \"{}\"", name));
        }
    }

    let records = body
        .iter()
        .map(|cells| {
            header
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let text = cells.get(i).map(cell_text).unwrap_or_default();
                    (name.clone(), text)
                })
                .collect()
        })
        .collect();

    Ok(records)
}
