use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Input format error: {message}")]
    InputFormatError { message: String },

    #[error("Spreadsheet read error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    XlsxWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Usage counter error: {0}")]
    CounterError(#[from] rusqlite::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Configuration,
    Storage,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MatchError {
    pub fn input_format(message: impl Into<String>) -> Self {
        MatchError::InputFormatError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MatchError::InputFormatError { .. }
            | MatchError::SpreadsheetError(_)
            | MatchError::CsvError(_) => ErrorCategory::Input,
            MatchError::XlsxWriteError(_) | MatchError::SerializationError(_) => {
                ErrorCategory::Output
            }
            MatchError::IoError(_) | MatchError::CounterError(_) => ErrorCategory::Storage,
            MatchError::ConfigError { .. }
            | MatchError::ConfigValidationError { .. }
            | MatchError::InvalidConfigValueError { .. }
            | MatchError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MatchError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 計數器失敗不影響已產生的報表
            ErrorCategory::Storage if matches!(self, MatchError::CounterError(_)) => {
                ErrorSeverity::Low
            }
            ErrorCategory::Storage => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MatchError::InputFormatError { .. } | MatchError::SpreadsheetError(_) => {
                "Check that the file is a readable CSV or Excel workbook with a header row"
            }
            MatchError::CsvError(_) => "Check the CSV delimiter and quoting",
            MatchError::XlsxWriteError(_) => "Check that the output file is not open in another program",
            MatchError::IoError(_) => "Check that the paths exist and are writable",
            MatchError::SerializationError(_) => "Report this issue with the input that triggered it",
            MatchError::CounterError(_) => "Delete or repair the usage counter database",
            MatchError::ConfigError { .. }
            | MatchError::ConfigValidationError { .. }
            | MatchError::InvalidConfigValueError { .. }
            | MatchError::MissingConfigError { .. } => {
                "Review the configuration file and command line arguments"
            }
            MatchError::ProcessingError { .. } => "Re-run with --verbose for details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read the input data: {}", self),
            ErrorCategory::Output => format!("Could not write the report: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Storage => format!("Storage problem: {}", self),
            ErrorCategory::Processing => format!("Matching failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
