use crate::domain::model::Record;
use crate::utils::error::{ExportError, Result};
use serde_json::Value;
use std::collections::HashSet;

/// Renders one cell from the values API as text.
pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Turns a raw cell grid into records keyed by the header row.
///
/// The API trims trailing blanks from each row, so every row (header included)
/// is padded to the widest row first. Rows above `header_row` (1-based) are
/// skipped. A header row that repeats a name is rejected, since the repeated
/// column would silently overwrite the earlier one.
pub fn build_records(grid: Vec<Vec<Value>>, header_row: usize) -> Result<Vec<Record>> {
    let header_index = header_row.max(1) - 1;
    if grid.len() <= header_index {
        return Ok(Vec::new());
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let mut rows = grid.into_iter().skip(header_index).map(|row| {
        let mut cells: Vec<String> = row.iter().map(cell_to_string).collect();
        cells.resize(width, String::new());
        cells
    });

    let headers = rows.next().unwrap_or_default();
    check_unique_headers(&headers)?;

    Ok(rows
        .map(|cells| headers.iter().cloned().zip(cells).collect::<Record>())
        .collect())
}

fn check_unique_headers(headers: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for header in headers {
        if !seen.insert(header.as_str()) && !duplicates.contains(&header.as_str()) {
            duplicates.push(header);
        }
    }

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(ExportError::ProcessingError {
            message: format!(
                "the header row contains duplicate column names: {}",
                duplicates
                    .iter()
                    .map(|h| format!("'{}'", h))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
    }
}
