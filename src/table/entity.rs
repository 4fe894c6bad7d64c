//! # Table Entity
//!
//! [`Table`] is the generic CRUD engine parameterized by a [`TableSchema`].
//! [`TableEntity`] is the capability contract callers program against: one
//! required accessor, every operation default-implemented on top of it.
//! Concrete entities override defaults (typically [`TableEntity::default_select`])
//! to fix a canonical column order.
//!
//! Each statement auto-commits. A bulk create that fails partway leaves
//! the rows inserted before the failure committed.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::errors::{TableError, TableResult};
use crate::criterion::{Criterion, Field, FieldSelector};
use crate::native::{NativeConnection, Row};
use crate::observability::Logger;
use crate::schema::{compile_create_table, quote_ident, ColumnProperty, TableSchema, ValueConverter};

/// Caller payload: column name to value
pub type Entry = Map<String, Value>;

/// Key-value view of a row, keys in select order
pub type Record = Map<String, Value>;

/// Generic CRUD engine for one logical table
pub struct Table {
    schema: TableSchema,
    conn: Arc<NativeConnection>,
    converter: ValueConverter,
}

impl Table {
    /// Open the table, creating it if it does not exist yet
    ///
    /// The schema is compiled before anything is sent to the engine, so a
    /// misconfigured schema never produces a table.
    pub fn open(schema: TableSchema, conn: Arc<NativeConnection>) -> TableResult<Self> {
        Self::with_converter(schema, conn, ValueConverter::default())
    }

    /// Open with a custom value converter
    pub fn with_converter(
        schema: TableSchema,
        conn: Arc<NativeConnection>,
        converter: ValueConverter,
    ) -> TableResult<Self> {
        let statement = compile_create_table(&schema)?;
        Self::from_compiled(schema, &statement, conn, converter)
    }

    /// Open with a create statement already compiled from `schema`
    ///
    /// Lets a caller compile every schema before touching the store.
    pub(crate) fn from_compiled(
        schema: TableSchema,
        create_statement: &str,
        conn: Arc<NativeConnection>,
        converter: ValueConverter,
    ) -> TableResult<Self> {
        let event = if Self::create_if_missing(&conn, &schema.name, create_statement)? {
            "TABLE_CREATED"
        } else {
            "TABLE_OPENED"
        };
        Logger::info(event, &[("table", schema.name.as_str())]);

        Ok(Self {
            schema,
            conn,
            converter,
        })
    }

    /// Run the create statement; true when the table did not exist before
    fn create_if_missing(
        conn: &NativeConnection,
        name: &str,
        create_statement: &str,
    ) -> TableResult<bool> {
        let existed = conn.table_exists(name)?;
        conn.execute(create_statement, &[])?;
        Ok(!existed)
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn connection(&self) -> &NativeConnection {
        &self.conn
    }

    pub fn converter(&self) -> &ValueConverter {
        &self.converter
    }

    /// Look up a column, failing for names outside the schema
    pub fn check_column(&self, column: &str) -> TableResult<&ColumnProperty> {
        self.schema
            .get(column)
            .ok_or_else(|| TableError::UnknownColumn {
                table: self.schema.name.clone(),
                column: column.to_string(),
            })
    }

    fn check_criterion(&self, criterion: &Criterion) -> TableResult<()> {
        for column in criterion.columns() {
            self.check_column(column)?;
        }
        Ok(())
    }

    /// Encode a value for `column`
    ///
    /// Encoding failures are logged and the raw value is passed through.
    pub fn encode_value(&self, column: &str, value: &Value) -> Value {
        let Some(property) = self.schema.get(column) else {
            return value.clone();
        };
        match self.converter.convert_entry(property.dtype, value) {
            Ok(encoded) => encoded,
            Err(e) => {
                Logger::warn(
                    "VALUE_ENCODE_FAILED",
                    &[
                        ("table", self.schema.name.as_str()),
                        ("column", column),
                        ("value", value.to_string().as_str()),
                        ("reason", e.to_string().as_str()),
                    ],
                );
                value.clone()
            }
        }
    }

    /// AND of equality predicates for every key of `entry`
    ///
    /// Empty `entry` yields the match-all criterion.
    pub fn criterion_from_entry(&self, entry: &Entry) -> TableResult<Criterion> {
        let mut predicates = Vec::with_capacity(entry.len());
        for (column, value) in entry {
            self.check_column(column)?;
            predicates.push(Field::new(column.as_str()).eq(self.encode_value(column, value)));
        }
        Ok(Criterion::all_of(predicates))
    }

    fn insert_statement(&self, columns: &[&str], generated: &[&str]) -> String {
        let table = quote_ident(&self.schema.name);
        let mut statement = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", table)
        } else {
            let names: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                names.join(", "),
                vec!["?"; columns.len()].join(", ")
            )
        };

        // The insert text carries no result of its own; the generated
        // columns are read back through RETURNING on the same statement.
        if !generated.is_empty() {
            let names: Vec<String> = generated.iter().map(|c| quote_ident(c)).collect();
            statement.push_str(" RETURNING ");
            statement.push_str(&names.join(", "));
        }
        statement
    }

    /// Insert every entry and return its generated columns, in input order
    pub fn insert_returning(&self, entries: &[Entry]) -> TableResult<Vec<Row>> {
        let columns = self.schema.insertable_columns();
        let generated = self.schema.generated_columns();

        // Validate the whole batch before the first row is written
        for entry in entries {
            for key in entry.keys() {
                if generated.contains(&key.as_str()) {
                    return Err(TableError::GeneratedColumn {
                        table: self.schema.name.clone(),
                        column: key.clone(),
                    });
                }
                self.check_column(key)?;
            }
        }

        let statement = self.insert_statement(&columns, &generated);
        let mut created = Vec::with_capacity(entries.len());

        for entry in entries {
            let params: Vec<Value> = columns
                .iter()
                .map(|column| match entry.get(*column) {
                    Some(value) => self.encode_value(column, value),
                    None => Value::Null,
                })
                .collect();

            match self.conn.execute(&statement, &params) {
                Ok(rows) => created.push(rows.into_iter().next().unwrap_or_default()),
                Err(e) => {
                    Logger::error(
                        "BULK_CREATE_ABORTED",
                        &[
                            ("table", self.schema.name.as_str()),
                            ("committed", created.len().to_string().as_str()),
                            ("requested", entries.len().to_string().as_str()),
                            ("reason", e.to_string().as_str()),
                        ],
                    );
                    return Err(e.into());
                }
            }
        }

        Logger::info(
            "ROWS_CREATED",
            &[
                ("table", self.schema.name.as_str()),
                ("count", created.len().to_string().as_str()),
            ],
        );
        Ok(created)
    }

    /// Filtered projection, rows in insertion order
    pub fn select_rows(&self, criterion: &Criterion, fields: &[String]) -> TableResult<Vec<Row>> {
        if fields.is_empty() {
            return Err(TableError::EmptyProjection(self.schema.name.clone()));
        }
        for field in fields {
            self.check_column(field)?;
        }
        self.check_criterion(criterion)?;

        let projection: Vec<String> = fields.iter().map(|f| quote_ident(f)).collect();
        let filter = criterion.render_where();
        let statement = format!(
            "SELECT {} FROM {}{} ORDER BY rowid",
            projection.join(", "),
            quote_ident(&self.schema.name),
            filter.sql
        );

        Ok(self.conn.execute(&statement, &filter.params)?)
    }

    /// Set every column named in `entry` on each matching row
    ///
    /// Keys are validated against the schema before any statement is issued.
    pub fn update_rows(&self, criterion: &Criterion, entry: &Entry) -> TableResult<usize> {
        for key in entry.keys() {
            self.check_column(key)?;
        }
        self.check_criterion(criterion)?;

        if entry.is_empty() {
            return Ok(0);
        }

        let assignments: Vec<String> = entry
            .keys()
            .map(|k| format!("{} = ?", quote_ident(k)))
            .collect();
        let mut params: Vec<Value> = entry
            .iter()
            .map(|(column, value)| self.encode_value(column, value))
            .collect();

        let filter = criterion.render_where();
        params.extend(filter.params);

        let statement = format!(
            "UPDATE {} SET {}{}",
            quote_ident(&self.schema.name),
            assignments.join(", "),
            filter.sql
        );
        let count = self.conn.execute_count(&statement, &params)?;

        Logger::info(
            "ROWS_UPDATED",
            &[("table", self.schema.name.as_str()), ("count", count.to_string().as_str())],
        );
        Ok(count)
    }

    /// Remove every matching row; match-all truncates the table
    pub fn delete_rows(&self, criterion: &Criterion) -> TableResult<usize> {
        self.check_criterion(criterion)?;

        let filter = criterion.render_where();
        let statement = format!(
            "DELETE FROM {}{}",
            quote_ident(&self.schema.name),
            filter.sql
        );
        let count = self.conn.execute_count(&statement, &filter.params)?;

        Logger::info(
            "ROWS_DELETED",
            &[("table", self.schema.name.as_str()), ("count", count.to_string().as_str())],
        );
        Ok(count)
    }
}

/// CRUD contract over one logical table
pub trait TableEntity {
    /// The generic engine backing this entity
    fn table(&self) -> &Table;

    /// Column order used when the caller selects all columns
    fn default_select(&self) -> Vec<String> {
        self.table().schema().column_names()
    }

    /// Resolve an optional select list; `None` means all columns
    fn resolve_select(&self, select: Option<&[&str]>) -> Vec<String> {
        match select {
            Some(fields) => fields.iter().map(|f| f.to_string()).collect(),
            None => self.default_select(),
        }
    }

    /// Field accessor for this table plus the match-all criterion
    fn criterion_selector(&self) -> (FieldSelector, Criterion) {
        (FieldSelector::new(self.table().name()), Criterion::MatchAll)
    }

    /// Create one row, returning its generated columns
    fn create(&self, entry: &Entry) -> TableResult<Row> {
        let mut rows = self.create_bulk(std::slice::from_ref(entry))?;
        Ok(rows.pop().unwrap_or_default())
    }

    /// Create many rows, returning each row's generated columns in input order
    fn create_bulk(&self, entries: &[Entry]) -> TableResult<Vec<Row>> {
        self.table().insert_returning(entries)
    }

    /// Filtered projection
    fn query(&self, criterion: &Criterion, select: Option<&[&str]>) -> TableResult<Vec<Row>> {
        let fields = self.resolve_select(select);
        self.table().select_rows(criterion, &fields)
    }

    /// Projection filtered by exact field values
    fn query_value(&self, entry: &Entry, select: Option<&[&str]>) -> TableResult<Vec<Row>> {
        let criterion = self.table().criterion_from_entry(entry)?;
        self.query(&criterion, select)
    }

    /// Update matching rows, returning the number changed
    fn update(&self, criterion: &Criterion, entry: &Entry) -> TableResult<usize> {
        self.table().update_rows(criterion, entry)
    }

    /// Delete matching rows, returning the number removed
    fn delete(&self, criterion: &Criterion) -> TableResult<usize> {
        self.table().delete_rows(criterion)
    }
}

impl TableEntity for Table {
    fn table(&self) -> &Table {
        self
    }
}
