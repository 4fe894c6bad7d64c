//! Schema-definition and value-encoding errors
//!
//! Schema-definition errors are fatal: they surface while a table is being
//! opened and are never recovered.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Misconfigured column or table declarations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The engine only supports auto-increment on the primary key
    #[error("column '{column}' in table '{table}' is auto-increment but not the primary key")]
    AutoIncrementWithoutPrimary { table: String, column: String },

    /// Same column declared twice
    #[error("column '{column}' declared more than once in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// Table declares no columns
    #[error("table '{0}' declares no columns")]
    EmptySchema(String),

    /// More than one column carries the primary-key marker
    #[error("table '{0}' declares more than one primary key")]
    MultiplePrimaryKeys(String),
}

impl SchemaError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::AutoIncrementWithoutPrimary { .. } => "CLINICDB_SCHEMA_AUTO_INCREMENT",
            SchemaError::DuplicateColumn { .. } => "CLINICDB_SCHEMA_DUPLICATE_COLUMN",
            SchemaError::EmptySchema(_) => "CLINICDB_SCHEMA_EMPTY",
            SchemaError::MultiplePrimaryKeys(_) => "CLINICDB_SCHEMA_PRIMARY_KEY",
        }
    }
}

/// A value could not be encoded for its column's logical type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("expected an array, found {0}")]
    NotAnArray(&'static str),

    #[error("serialization failed: {0}")]
    Serialize(String),
}
