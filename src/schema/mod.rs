//! Schema layer for clinicdb
//!
//! Declarative column properties compiled into table-creation statements,
//! plus the write-side value converter.
//!
//! # Design Principles
//!
//! - Schemas are declared once per logical table and never mutated
//! - Misconfigured schemas fail while the table is opened, never later
//! - Column order is declaration order everywhere

mod compiler;
mod convert;
mod errors;
mod types;

pub use compiler::{
    compile_column, compile_create_table, quote_ident, storage_type, JSON_COLUMN_TYPE,
};
pub use convert::{encode_array, json_type_name, Encoder, ValueConverter};
pub use errors::{EncodeError, SchemaError, SchemaResult};
pub use types::{Column, ColumnProperty, LogicalType, TableSchema};
