pub mod csv_output;
pub mod exporter;
pub mod records;
pub mod table;

pub use crate::domain::model::{ExportSummary, Record, Table};
pub use crate::domain::ports::{SheetSource, Storage, TokenProvider};
pub use crate::utils::error::Result;
