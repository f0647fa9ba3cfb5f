use indexmap::IndexMap;
use std::path::PathBuf;

/// One worksheet row keyed by its column header, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub data: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.data.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.data.get(column).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Rectangular form of a record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

/// Properties of one tab, as reported by the spreadsheet metadata call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    pub spreadsheet_id: String,
    pub sheet_id: i64,
    pub title: String,
    pub index: i64,
}

/// An opened spreadsheet and the tabs it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spreadsheet {
    pub id: String,
    pub title: String,
    pub worksheets: Vec<Worksheet>,
}

impl Spreadsheet {
    /// Finds a tab by exact title.
    pub fn worksheet(&self, title: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.title == title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub spreadsheet_title: String,
    pub worksheet: String,
    pub rows: usize,
    pub columns: usize,
    pub output_path: PathBuf,
}
