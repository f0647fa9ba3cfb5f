use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Missing configuration: {field} ({purpose})")]
    MissingConfigError { field: String, purpose: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Authentication failed: {message}")]
    AuthError { message: String },

    #[error("Spreadsheet '{spreadsheet_id}' not found")]
    SpreadsheetNotFound { spreadsheet_id: String },

    #[error("Worksheet '{worksheet}' not found in spreadsheet '{spreadsheet_id}'")]
    WorksheetNotFound {
        worksheet: String,
        spreadsheet_id: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiStatusError { status: u16, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

/// Failure categories callers can branch on without matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Authentication,
    SpreadsheetNotFound,
    WorksheetNotFound,
    Transport,
    Serialization,
    Storage,
}

impl ExportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExportError::MissingConfigError { .. } | ExportError::InvalidConfigValueError { .. } => {
                ErrorKind::Configuration
            }
            ExportError::AuthError { .. } => ErrorKind::Authentication,
            ExportError::SpreadsheetNotFound { .. } => ErrorKind::SpreadsheetNotFound,
            ExportError::WorksheetNotFound { .. } => ErrorKind::WorksheetNotFound,
            ExportError::ApiError(_) | ExportError::ApiStatusError { .. } => ErrorKind::Transport,
            ExportError::CsvError(_)
            | ExportError::SerializationError(_)
            | ExportError::ProcessingError { .. } => ErrorKind::Serialization,
            ExportError::IoError(_) => ErrorKind::Storage,
        }
    }

    /// Every handled failure terminates the run with status 1.
    pub fn exit_code(&self) -> i32 {
        1
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ExportError::MissingConfigError { field, purpose } => {
                format!("Error: {} not set ({}).", field, purpose)
            }
            ExportError::InvalidConfigValueError { field, value, reason } => {
                format!("Error: invalid value '{}' for {}: {}", value, field, reason)
            }
            ExportError::SpreadsheetNotFound { spreadsheet_id } => format!(
                "Error: Spreadsheet with ID '{}' not found. \
                 Please check the ID and ensure the service account has access.",
                spreadsheet_id
            ),
            ExportError::WorksheetNotFound { worksheet, .. } => format!(
                "Error: Worksheet with name '{}' not found in the spreadsheet.",
                worksheet
            ),
            other => format!("An unexpected error occurred: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Configuration => {
                "Set the required environment variables or pass the matching command line flags"
            }
            ErrorKind::Authentication => {
                "Check that the credentials are a valid service-account JSON key and the key is not revoked"
            }
            ErrorKind::SpreadsheetNotFound => {
                "Verify the spreadsheet ID and share the spreadsheet with the service account email"
            }
            ErrorKind::WorksheetNotFound => {
                "Check the worksheet tab name, including case and surrounding spaces"
            }
            ErrorKind::Transport => "Check network connectivity and the Sheets API base URL",
            ErrorKind::Serialization => "Inspect the worksheet header row and cell contents",
            ErrorKind::Storage => "Check that the output path is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
