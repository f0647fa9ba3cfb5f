pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::adapters::{LocalStorage, ServiceAccountAuth, SheetsClient};
pub use crate::app::run;
pub use crate::config::{ExportConfig, ValueRenderOption};
pub use crate::core::exporter::SheetExporter;
pub use crate::domain::model::{ExportSummary, Record, Table};
pub use crate::utils::error::{ErrorKind, ExportError, Result};
