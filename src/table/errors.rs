//! # Table Errors
//!
//! Structured failures for the request layer to translate.

use thiserror::Error;

use crate::native::NativeError;
use crate::schema::SchemaError;

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

#[derive(Debug, Error)]
pub enum TableError {
    // ==================
    // Definition Errors (fatal at startup)
    // ==================
    #[error("schema definition error: {0}")]
    Schema(#[from] SchemaError),

    // ==================
    // Validation Errors (nothing sent to the engine)
    // ==================
    #[error("unknown table '{0}'")]
    UnknownTable(String),

    #[error("unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("column '{column}' in table '{table}' is generated by the store")]
    GeneratedColumn { table: String, column: String },

    #[error("projection on table '{0}' selects no columns")]
    EmptyProjection(String),

    // ==================
    // Engine Errors
    // ==================
    #[error("{0}")]
    Native(#[from] NativeError),
}

impl TableError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TableError::Schema(e) => e.code(),
            TableError::UnknownTable(_) => "CLINICDB_UNKNOWN_TABLE",
            TableError::UnknownColumn { .. } => "CLINICDB_UNKNOWN_COLUMN",
            TableError::GeneratedColumn { .. } => "CLINICDB_GENERATED_COLUMN",
            TableError::EmptyProjection(_) => "CLINICDB_EMPTY_PROJECTION",
            TableError::Native(e) => e.code(),
        }
    }

    /// Whether the caller supplied something invalid (as opposed to a
    /// definition or engine failure)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TableError::UnknownTable(_)
                | TableError::UnknownColumn { .. }
                | TableError::GeneratedColumn { .. }
                | TableError::EmptyProjection(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            TableError::UnknownTable("patients".into()).code(),
            "CLINICDB_UNKNOWN_TABLE"
        );
        assert_eq!(
            TableError::from(NativeError::EncryptionUnsupported).code(),
            "CLINICDB_UNIMPLEMENTED"
        );
    }

    #[test]
    fn test_validation_classification() {
        assert!(TableError::EmptyProjection("users".into()).is_validation());
        assert!(!TableError::from(NativeError::Poisoned).is_validation());
    }
}
