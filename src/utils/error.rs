use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggError {
    #[error("Workbook read failed: {0}")]
    WorkbookError(#[from] calamine::Error),

    #[error("Report write failed: {0}")]
    ReportError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Path must be an Excel file or a directory containing Excel files, and file(s) must start with \"Sales Journal for \": {path}")]
    InvalidInputPath { path: String },

    #[error("No valid Excel files found starting with \"Sales Journal for \" in {path}")]
    NoJournalsFound { path: String },

    #[error("Invalid amount '{value}' in sheet '{sheet}' at row {row}")]
    InvalidAmount {
        sheet: String,
        row: usize,
        value: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AggError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AggError::ConfigError { .. }
            | AggError::ConfigValidationError { .. }
            | AggError::InvalidConfigValueError { .. }
            | AggError::PatternError(_) => ErrorCategory::Configuration,
            AggError::InvalidInputPath { .. }
            | AggError::NoJournalsFound { .. }
            | AggError::WorkbookError(_) => ErrorCategory::Input,
            AggError::InvalidAmount { .. } | AggError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
            AggError::ReportError(_)
            | AggError::ZipError(_)
            | AggError::CsvError(_)
            | AggError::SerializationError(_) => ErrorCategory::Output,
            AggError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AggError::InvalidInputPath { .. } => {
                "Point --input at a 'Sales Journal for <Month> <Year>.xlsx' file or at the folder that holds them"
            }
            AggError::NoJournalsFound { .. } => {
                "Check that the journal files are named 'Sales Journal for <Month> <Year>.xls' or '.xlsx'"
            }
            AggError::WorkbookError(_) => {
                "Make sure the journal is a valid Excel workbook and is not open in another program"
            }
            AggError::InvalidAmount { .. } => {
                "Fix the amount in the journal or rerun with --on-invalid-amount skip"
            }
            AggError::ProcessingError { .. } => "Inspect the journal layout and rerun with --verbose",
            AggError::ConfigError { .. }
            | AggError::ConfigValidationError { .. }
            | AggError::InvalidConfigValueError { .. }
            | AggError::PatternError(_) => "Review the command-line flags or the TOML configuration",
            AggError::ReportError(_)
            | AggError::ZipError(_)
            | AggError::CsvError(_)
            | AggError::SerializationError(_) => {
                "Check that the output file name is valid and the report is not open elsewhere"
            }
            AggError::IoError(_) => "Check file permissions and available disk space",
        }
    }

    /// Process exit code for a failed run.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Input => format!("Could not import sales journals: {}", self),
            ErrorCategory::Processing => format!("Could not aggregate units: {}", self),
            ErrorCategory::Output => format!("Could not write the report: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AggError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_high_severity() {
        let err = AggError::NoJournalsFound {
            path: "./journals".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("./journals"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_invalid_amount_message_names_location() {
        let err = AggError::InvalidAmount {
            sheet: "March 2024".to_string(),
            row: 7,
            value: "n/a".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("March 2024"));
        assert!(message.contains("row 7"));
        assert!(message.contains("n/a"));
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: AggError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(err.category(), ErrorCategory::System);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
