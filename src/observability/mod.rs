//! Observability for clinicdb
//!
//! Structured JSON-lines logging only. Logging is synchronous and has no
//! side effects on table operations.
//!
//! ```ignore
//! use clinicdb::observability::Logger;
//!
//! Logger::info("ROWS_CREATED", &[("table", "users"), ("count", "3")]);
//! ```

mod logger;

pub use logger::{Logger, Severity};
