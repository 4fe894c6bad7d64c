//! Column property model
//!
//! Supported logical types:
//! - int: 64-bit signed integer
//! - str: UTF-8 string
//! - array: structured JSON array, stored as canonical JSON text
//!
//! A [`TableSchema`] is declared once per logical table and never mutated
//! after the table is opened.

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};

/// Logical data kinds, independent of storage column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    /// 64-bit signed integer
    Int,
    /// UTF-8 string
    Str,
    /// Structured array
    Array,
}

impl LogicalType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            LogicalType::Int => "int",
            LogicalType::Str => "str",
            LogicalType::Array => "array",
        }
    }
}

/// Declared properties of a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProperty {
    /// Logical data type
    pub dtype: LogicalType,
    /// Whether this column is the primary key
    #[serde(default)]
    pub primary: bool,
    /// Whether the store generates this column's value on insert
    #[serde(default)]
    pub auto_increment: bool,
}

impl ColumnProperty {
    fn plain(dtype: LogicalType) -> Self {
        Self {
            dtype,
            primary: false,
            auto_increment: false,
        }
    }

    /// Plain integer column
    pub fn int() -> Self {
        Self::plain(LogicalType::Int)
    }

    /// Plain string column
    pub fn str() -> Self {
        Self::plain(LogicalType::Str)
    }

    /// Structured array column
    pub fn array() -> Self {
        Self::plain(LogicalType::Array)
    }

    /// Integer primary key generated by the store
    pub fn auto_id() -> Self {
        Self::int().as_primary().with_auto_increment()
    }

    /// Mark as primary key
    pub fn as_primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Mark as auto-increment
    pub fn with_auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}

/// A named column in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(flatten)]
    pub property: ColumnProperty,
}

/// Ordered column declarations for one logical table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Logical table name
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
}

impl TableSchema {
    /// Create an empty schema for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column declaration
    pub fn column(mut self, name: impl Into<String>, property: ColumnProperty) -> Self {
        self.columns.push(Column {
            name: name.into(),
            property,
        });
        self
    }

    /// Look up a column's properties
    pub fn get(&self, name: &str) -> Option<&ColumnProperty> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.property)
    }

    /// Whether `name` is a declared column
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All column names in declaration order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Columns populated by the store on insert
    pub fn generated_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.property.auto_increment)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Columns a caller supplies on insert
    pub fn insertable_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| !c.property.auto_increment)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Validates the schema structure itself (not any row)
    ///
    /// Per-column property checks happen in the column compiler.
    pub fn validate_structure(&self) -> SchemaResult<()> {
        if self.columns.is_empty() {
            return Err(SchemaError::EmptySchema(self.name.clone()));
        }

        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        if self.columns.iter().filter(|c| c.property.primary).count() > 1 {
            return Err(SchemaError::MultiplePrimaryKeys(self.name.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> TableSchema {
        TableSchema::new("users")
            .column("user_id", ColumnProperty::auto_id())
            .column("permissions", ColumnProperty::int())
            .column("auth_method", ColumnProperty::str())
    }

    #[test]
    fn test_column_order_is_declaration_order() {
        assert_eq!(
            sample_schema().column_names(),
            vec!["user_id", "permissions", "auth_method"]
        );
    }

    #[test]
    fn test_generated_and_insertable_columns() {
        let schema = sample_schema();
        assert_eq!(schema.generated_columns(), vec!["user_id"]);
        assert_eq!(schema.insertable_columns(), vec!["permissions", "auth_method"]);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let schema = sample_schema().column("permissions", ColumnProperty::str());
        assert!(matches!(
            schema.validate_structure(),
            Err(SchemaError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_empty_schema_rejected() {
        assert!(matches!(
            TableSchema::new("nothing").validate_structure(),
            Err(SchemaError::EmptySchema(_))
        ));
    }

    #[test]
    fn test_two_primary_keys_rejected() {
        let schema = sample_schema().column("email", ColumnProperty::str().as_primary());
        assert!(matches!(
            schema.validate_structure(),
            Err(SchemaError::MultiplePrimaryKeys(_))
        ));
    }

    #[test]
    fn test_property_deserializes_with_defaults() {
        let prop: ColumnProperty = serde_json::from_str(r#"{"dtype": "array"}"#).unwrap();
        assert_eq!(prop, ColumnProperty::array());
    }
}
