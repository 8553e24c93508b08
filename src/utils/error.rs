use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Cannot resolve path '{path}': {source}")]
    PathResolutionError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open workbook '{location}': {reason}")]
    OpenError { location: String, reason: String },

    #[error("No usable sheet found, tried: {}", .attempted.join(", "))]
    SheetNotFound { attempted: Vec<String> },

    #[error("Failed to read rows from sheet '{sheet}': {reason}")]
    RowReadError { sheet: String, reason: String },

    #[error("Failed to fetch '{url}': {reason}")]
    FetchError { url: String, reason: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Workbook,
    Network,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::PathResolutionError { .. } => ErrorCategory::Source,
            CatalogError::OpenError { .. }
            | CatalogError::SheetNotFound { .. }
            | CatalogError::RowReadError { .. } => ErrorCategory::Workbook,
            CatalogError::FetchError { .. } => ErrorCategory::Network,
            CatalogError::ZipError(_)
            | CatalogError::CsvError(_)
            | CatalogError::IoError(_)
            | CatalogError::SerializationError(_)
            | CatalogError::RenderError { .. } => ErrorCategory::Output,
            CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Source | ErrorCategory::Workbook => ErrorSeverity::High,
            ErrorCategory::Output | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// Status an HTTP front end answers with; every catalog failure is a
    /// server error.
    pub fn http_status(&self) -> u16 {
        500
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CatalogError::PathResolutionError { .. } => {
                "Check that the working directory and the configured path exist"
            }
            CatalogError::OpenError { .. } => {
                "Make sure the file exists and is a valid xlsx/xls/ods workbook"
            }
            CatalogError::SheetNotFound { .. } => {
                "Rename the data sheet or add its name to the configured sheet candidates"
            }
            CatalogError::RowReadError { .. } => "Re-save the workbook and try again",
            CatalogError::FetchError { .. } => {
                "Check the URL and network connectivity, then run again"
            }
            CatalogError::ZipError(_) | CatalogError::IoError(_) => {
                "Check that the output directory is writable and has free space"
            }
            CatalogError::CsvError(_)
            | CatalogError::SerializationError(_)
            | CatalogError::RenderError { .. } => "Disable the failing output format and retry",
            CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::MissingConfigError { .. } => "Fix the configuration file and retry",
        }
    }

    /// Message safe to show to an end user; details stay in the logs.
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Source | ErrorCategory::Workbook | ErrorCategory::Network => {
                "Error reading catalog data".to_string()
            }
            ErrorCategory::Output => "Error writing catalog page".to_string(),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
