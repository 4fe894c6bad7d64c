//! Native connection errors
//!
//! Engine failures propagate unmodified; this layer does not retry.

use thiserror::Error;

/// Result type for native connection operations
pub type NativeResult<T> = Result<T, NativeError>;

#[derive(Debug, Error)]
pub enum NativeError {
    /// Failure reported by the storage engine (I/O, constraint, syntax)
    #[error("storage engine error: {0}")]
    Engine(#[from] rusqlite::Error),

    /// Encrypted stores are not supported
    #[error("encrypted stores are not supported")]
    EncryptionUnsupported,

    /// A previous holder of the engine handle panicked
    #[error("engine handle lock poisoned")]
    Poisoned,
}

impl NativeError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            NativeError::Engine(_) => "CLINICDB_ENGINE",
            NativeError::EncryptionUnsupported => "CLINICDB_UNIMPLEMENTED",
            NativeError::Poisoned => "CLINICDB_ENGINE_POISONED",
        }
    }
}
