//! Typed table layer
//!
//! Generic CRUD over a declared schema: create/bulk-create with generated
//! identifiers read back, criterion-based read, update and delete.

mod entity;
mod errors;
pub mod schemas;

pub use entity::{Entry, Record, Table, TableEntity};
pub use errors::{TableError, TableResult};
