//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::seed::SeedError;
use crate::table::TableError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, input files)
    IoError,
    /// Invalid command argument
    InvalidArgument,
    /// Table layer failure
    StoreError,
    /// Fixture loading failure
    SeedFailed,
    /// Server failed to start or stopped
    ServeFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CLINICDB_CLI_CONFIG_ERROR",
            Self::IoError => "CLINICDB_CLI_IO_ERROR",
            Self::InvalidArgument => "CLINICDB_CLI_INVALID_ARGUMENT",
            Self::StoreError => "CLINICDB_CLI_STORE_ERROR",
            Self::SeedFailed => "CLINICDB_CLI_SEED_FAILED",
            Self::ServeFailed => "CLINICDB_CLI_SERVE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArgument, msg)
    }

    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<TableError> for CliError {
    fn from(e: TableError) -> Self {
        Self::new(CliErrorCode::StoreError, format!("{} ({})", e, e.code()))
    }
}

impl From<SeedError> for CliError {
    fn from(e: SeedError) -> Self {
        Self::new(CliErrorCode::SeedFailed, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_error_carries_code() {
        let err = CliError::from(TableError::UnknownTable("patients".into()));
        assert_eq!(err.code(), &CliErrorCode::StoreError);
        assert!(err.message().contains("CLINICDB_UNKNOWN_TABLE"));
        assert!(err.to_string().starts_with("CLINICDB_CLI_STORE_ERROR"));
    }
}
