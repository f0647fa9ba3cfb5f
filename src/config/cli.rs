use crate::config::{
    ExportConfig, ValueRenderOption, CREDENTIALS_ENV, DEFAULT_API_BASE, DEFAULT_OUTPUT_PATH,
    DEFAULT_SHEET_NAME, SHEET_ID_ENV, VALUE_RENDER_ENV,
};
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command line surface. Every option falls back to its environment variable,
/// so the binary can run unattended from a scheduled job.
#[derive(Clone, Parser)]
#[command(name = "sheet-export")]
#[command(about = "Export one Google Sheets worksheet to a local CSV file")]
pub struct CliArgs {
    /// Service-account key as a JSON string
    #[arg(long, env = "GOOGLE_SHEETS_API_CREDENTIALS", hide_env_values = true)]
    pub credentials: Option<String>,

    /// Spreadsheet identifier (the long ID in the sheet URL)
    #[arg(long, env = "GOOGLE_SHEET_ID")]
    pub sheet_id: Option<String>,

    /// Worksheet (tab) name
    #[arg(long, env = "GOOGLE_SHEET_NAME", default_value = DEFAULT_SHEET_NAME)]
    pub sheet_name: String,

    /// Destination CSV file
    #[arg(long, env = "OUTPUT_CSV_PATH", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// 1-based row holding the column headers
    #[arg(long, env = "GOOGLE_SHEET_HEADER_ROW", default_value = "1")]
    pub header_row: usize,

    /// FORMATTED_VALUE, UNFORMATTED_VALUE or FORMULA
    #[arg(long, env = "GOOGLE_SHEET_VALUE_RENDER", default_value = "FORMATTED_VALUE")]
    pub value_render: String,

    #[arg(long, env = "GOOGLE_SHEETS_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[arg(long, env = "SHEET_EXPORT_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    /// Resolves the arguments into a validated config. Missing required values
    /// fail here, before anything touches the network.
    pub fn into_config(self) -> Result<ExportConfig> {
        let credentials =
            validate_required_field(CREDENTIALS_ENV, "service-account credentials", &self.credentials)?;
        let sheet_id = validate_required_field(SHEET_ID_ENV, "spreadsheet identifier", &self.sheet_id)?;

        let value_render: ValueRenderOption =
            self.value_render
                .parse()
                .map_err(|reason| ExportError::InvalidConfigValueError {
                    field: VALUE_RENDER_ENV.to_string(),
                    value: self.value_render.clone(),
                    reason,
                })?;

        let config = ExportConfig {
            credentials_json: credentials.to_string(),
            spreadsheet_id: sheet_id.trim().to_string(),
            sheet_name: self.sheet_name,
            output_path: self.output,
            header_row: self.header_row,
            value_render,
            api_base: self.api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }
}
