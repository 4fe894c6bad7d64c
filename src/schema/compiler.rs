//! Column compiler: column properties to SQLite column declarations
//!
//! - int   -> INTEGER
//! - str   -> TEXT
//! - array -> JSON (declared type used to decode the column on fetch)
//!
//! Auto-increment columns compile to `PRIMARY KEY AUTOINCREMENT`, in that
//! order. Auto-increment without the primary-key marker is a schema error.

use super::errors::{SchemaError, SchemaResult};
use super::types::{ColumnProperty, LogicalType, TableSchema};

/// Declared storage type for array columns
pub const JSON_COLUMN_TYPE: &str = "JSON";

/// Storage column type for a logical type
pub fn storage_type(dtype: LogicalType) -> &'static str {
    match dtype {
        LogicalType::Int => "INTEGER",
        LogicalType::Str => "TEXT",
        LogicalType::Array => JSON_COLUMN_TYPE,
    }
}

/// Quote an identifier for use in statement text
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Compile one column declaration
pub fn compile_column(
    table: &str,
    name: &str,
    property: &ColumnProperty,
) -> SchemaResult<String> {
    if property.auto_increment && !property.primary {
        return Err(SchemaError::AutoIncrementWithoutPrimary {
            table: table.to_string(),
            column: name.to_string(),
        });
    }

    let mut decl = format!("{} {}", quote_ident(name), storage_type(property.dtype));
    if property.primary {
        decl.push_str(" PRIMARY KEY");
    }
    if property.auto_increment {
        decl.push_str(" AUTOINCREMENT");
    }
    Ok(decl)
}

/// Compile the idempotent table-creation statement for a schema
pub fn compile_create_table(schema: &TableSchema) -> SchemaResult<String> {
    schema.validate_structure()?;

    let columns = schema
        .columns
        .iter()
        .map(|c| compile_column(&schema.name, &c.name, &c.property))
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(&schema.name),
        columns.join(", ")
    ))
}
