use crate::domain::model::{Record, Table};
use indexmap::IndexSet;

/// Builds a rectangular table from records whose key sets may differ.
///
/// Columns are the union of all keys in first-seen order; a record without a
/// given key contributes an empty cell. Row order is preserved.
pub fn to_table(records: &[Record]) -> Table {
    let columns: IndexSet<&str> = records
        .iter()
        .flat_map(|record| record.data.keys().map(String::as_str))
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.get(column).unwrap_or_default().to_string())
                .collect()
        })
        .collect();

    Table {
        columns: columns.into_iter().map(str::to_string).collect(),
        rows,
    }
}
