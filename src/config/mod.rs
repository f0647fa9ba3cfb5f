#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{self, Validate};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const CREDENTIALS_ENV: &str = "GOOGLE_SHEETS_API_CREDENTIALS";
pub const SHEET_ID_ENV: &str = "GOOGLE_SHEET_ID";
pub const SHEET_NAME_ENV: &str = "GOOGLE_SHEET_NAME";
pub const OUTPUT_PATH_ENV: &str = "OUTPUT_CSV_PATH";
pub const HEADER_ROW_ENV: &str = "GOOGLE_SHEET_HEADER_ROW";
pub const VALUE_RENDER_ENV: &str = "GOOGLE_SHEET_VALUE_RENDER";
pub const API_BASE_ENV: &str = "GOOGLE_SHEETS_API_BASE";
pub const TIMEOUT_ENV: &str = "SHEET_EXPORT_TIMEOUT_SECS";

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
pub const DEFAULT_OUTPUT_PATH: &str = "data/your_data.csv";
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How the Sheets API renders cell values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueRenderOption {
    #[default]
    FormattedValue,
    UnformattedValue,
    Formula,
}

impl ValueRenderOption {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            ValueRenderOption::FormattedValue => "FORMATTED_VALUE",
            ValueRenderOption::UnformattedValue => "UNFORMATTED_VALUE",
            ValueRenderOption::Formula => "FORMULA",
        }
    }
}

impl FromStr for ValueRenderOption {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "FORMATTED_VALUE" | "FORMATTED" => Ok(ValueRenderOption::FormattedValue),
            "UNFORMATTED_VALUE" | "UNFORMATTED" => Ok(ValueRenderOption::UnformattedValue),
            "FORMULA" => Ok(ValueRenderOption::Formula),
            _ => Err(format!(
                "expected one of FORMATTED_VALUE, UNFORMATTED_VALUE, FORMULA; got '{}'",
                s
            )),
        }
    }
}

/// Everything one export run needs, resolved once at startup.
#[derive(Clone)]
pub struct ExportConfig {
    pub credentials_json: String,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub output_path: PathBuf,
    pub header_row: usize,
    pub value_render: ValueRenderOption,
    pub api_base: String,
    pub timeout: Duration,
}

impl ExportConfig {
    /// Builds a config with defaults for everything but the two required values.
    pub fn new(credentials_json: impl Into<String>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            credentials_json: credentials_json.into(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            header_row: 1,
            value_render: ValueRenderOption::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// Credentials are secret; keep them out of debug logs.
impl fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportConfig")
            .field("credentials_json", &"<redacted>")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_name", &self.sheet_name)
            .field("output_path", &self.output_path)
            .field("header_row", &self.header_row)
            .field("value_render", &self.value_render)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Validate for ExportConfig {
    fn validate(&self) -> Result<()> {
        if self.credentials_json.trim().is_empty() {
            return Err(ExportError::MissingConfigError {
                field: CREDENTIALS_ENV.to_string(),
                purpose: "service-account credentials".to_string(),
            });
        }
        if self.spreadsheet_id.trim().is_empty() {
            return Err(ExportError::MissingConfigError {
                field: SHEET_ID_ENV.to_string(),
                purpose: "spreadsheet identifier".to_string(),
            });
        }
        validation::validate_non_empty_string(SHEET_NAME_ENV, &self.sheet_name)?;
        validation::validate_path(OUTPUT_PATH_ENV, &self.output_path.to_string_lossy())?;
        validation::validate_positive_number(HEADER_ROW_ENV, self.header_row, 1)?;
        validation::validate_url(API_BASE_ENV, &self.api_base)?;
        validation::validate_range(TIMEOUT_ENV, self.timeout.as_secs(), 1, 3600)?;
        Ok(())
    }
}
