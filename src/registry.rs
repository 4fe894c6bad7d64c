//! # Master Registry
//!
//! Owns the store's single native connection and one table per logical
//! schema, and routes calls by table name. Unknown names fail with
//! [`TableError::UnknownTable`]; they never yield empty results.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::criterion::{Criterion, Field};
use crate::native::{NativeConnection, Row};
use crate::schema::{compile_create_table, SchemaError, TableSchema, ValueConverter};
use crate::table::schemas::logical_schemas;
use crate::table::{Entry, Record, Table, TableEntity, TableError, TableResult};

pub struct Registry {
    conn: Arc<NativeConnection>,
    tables: Vec<Table>,
}

impl Registry {
    /// Open the store at `path` and create any missing logical tables
    pub fn open(path: impl AsRef<Path>) -> TableResult<Self> {
        Self::with_connection(NativeConnection::open(path, None)?)
    }

    /// Registry over a private in-memory store
    pub fn open_in_memory() -> TableResult<Self> {
        Self::with_connection(NativeConnection::open_in_memory()?)
    }

    /// Registry over the standard logical tables
    pub fn with_connection(conn: NativeConnection) -> TableResult<Self> {
        Self::with_schemas(conn, logical_schemas())
    }

    /// Registry over an explicit set of schemas
    ///
    /// Every schema is compiled before the first table is created, so one
    /// misconfigured schema leaves the store untouched.
    pub fn with_schemas(conn: NativeConnection, schemas: Vec<TableSchema>) -> TableResult<Self> {
        let compiled = schemas
            .into_iter()
            .map(|schema| compile_create_table(&schema).map(|statement| (schema, statement)))
            .collect::<Result<Vec<_>, SchemaError>>()?;

        let conn = Arc::new(conn);
        let tables = compiled
            .into_iter()
            .map(|(schema, statement)| {
                Table::from_compiled(schema, &statement, Arc::clone(&conn), ValueConverter::default())
            })
            .collect::<TableResult<Vec<_>>>()?;
        Ok(Self { conn, tables })
    }

    pub fn connection(&self) -> &NativeConnection {
        &self.conn
    }

    /// Names of every registered table
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name()).collect()
    }

    /// The table entity behind `name`, for raw criterion construction
    pub fn get_table(&self, name: &str) -> TableResult<&Table> {
        self.tables
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| TableError::UnknownTable(name.to_string()))
    }

    /// Create one row; returns the full row with generated columns filled in
    pub fn create(&self, table: &str, entry: &Entry) -> TableResult<Record> {
        let mut created = self.create_bulk(table, std::slice::from_ref(entry))?;
        Ok(created.pop().unwrap_or_default())
    }

    /// Create many rows; returns each stored row in input order
    ///
    /// Rows are read back by their generated key, so every field holds what
    /// the store kept (a `true` comes back as `1`). Tables without a
    /// generated column echo the caller's entries instead.
    pub fn create_bulk(&self, table: &str, entries: &[Entry]) -> TableResult<Vec<Record>> {
        let entity = self.get_table(table)?;
        let generated_rows = entity.create_bulk(entries)?;

        let schema = entity.schema();
        let fields = schema.column_names();
        let Some(key) = schema.generated_columns().first().map(|k| k.to_string()) else {
            return Ok(entries
                .iter()
                .map(|entry| {
                    fields
                        .iter()
                        .map(|f| (f.clone(), entry.get(f).cloned().unwrap_or(Value::Null)))
                        .collect::<Record>()
                })
                .collect());
        };

        let ids: Vec<i64> = generated_rows
            .iter()
            .filter_map(|row| row.first().and_then(Value::as_i64))
            .collect();
        let (Some(low), Some(high)) = (ids.iter().min(), ids.iter().max()) else {
            return Ok(Vec::new());
        };

        let key_pos = fields.iter().position(|f| *f == key).unwrap_or_default();
        let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        let stored: HashMap<i64, Row> = entity
            .query(
                &Field::new(key.as_str()).between(*low, *high),
                Some(field_refs.as_slice()),
            )?
            .into_iter()
            .filter_map(|row| row.get(key_pos).and_then(Value::as_i64).map(|id| (id, row)))
            .collect();

        Ok(ids
            .iter()
            .filter_map(|id| stored.get(id))
            .map(|row| fields.iter().cloned().zip(row.iter().cloned()).collect::<Record>())
            .collect())
    }

    pub fn query(
        &self,
        table: &str,
        criterion: &Criterion,
        select: Option<&[&str]>,
    ) -> TableResult<Vec<Row>> {
        self.get_table(table)?.query(criterion, select)
    }

    pub fn query_value(
        &self,
        table: &str,
        filter: &Entry,
        select: Option<&[&str]>,
    ) -> TableResult<Vec<Row>> {
        self.get_table(table)?.query_value(filter, select)
    }

    /// Rows matching `filter` as key-value records
    ///
    /// The same resolved column list drives both the select and the zip,
    /// so record keys always line up with row positions.
    pub fn read(
        &self,
        table: &str,
        filter: &Entry,
        select: Option<&[&str]>,
    ) -> TableResult<Vec<Record>> {
        let entity = self.get_table(table)?;
        let fields = entity.resolve_select(select);
        let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();

        let rows = entity.query_value(filter, Some(field_refs.as_slice()))?;
        Ok(rows
            .into_iter()
            .map(|row| fields.iter().cloned().zip(row).collect::<Record>())
            .collect())
    }

    pub fn update(&self, table: &str, criterion: &Criterion, entry: &Entry) -> TableResult<usize> {
        self.get_table(table)?.update(criterion, entry)
    }

    pub fn delete(&self, table: &str, criterion: &Criterion) -> TableResult<usize> {
        self.get_table(table)?.delete(criterion)
    }

    /// Maintenance compaction of the whole store
    pub fn vacuum(&self) -> TableResult<()> {
        Ok(self.conn.vacuum()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnProperty;
    use serde_json::json;

    fn entry(value: Value) -> Entry {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_all_logical_tables_registered() {
        let registry = Registry::open_in_memory().unwrap();
        assert_eq!(
            registry.table_names(),
            vec!["users", "symptoms", "bulletins", "clinics"]
        );
    }

    #[test]
    fn test_unknown_table_fails() {
        let registry = Registry::open_in_memory().unwrap();
        let result = registry.read("patients", &Entry::new(), None);
        assert!(matches!(result, Err(TableError::UnknownTable(name)) if name == "patients"));
        assert!(registry.get_table("patients").is_err());
    }

    #[test]
    fn test_create_fills_generated_columns() {
        let registry = Registry::open_in_memory().unwrap();
        let user = registry
            .create(
                "users",
                &entry(json!({
                    "username": "real_doctor",
                    "password": "hash",
                    "permission": 1,
                    "auth_method": "password",
                })),
            )
            .unwrap();

        assert_eq!(user["user_id"], json!(1));
        assert_eq!(user["username"], json!("real_doctor"));
        let keys: Vec<&String> = user.keys().collect();
        assert_eq!(
            keys,
            vec!["user_id", "username", "password", "permission", "auth_method"]
        );
    }

    #[test]
    fn test_read_zips_selected_fields() {
        let registry = Registry::open_in_memory().unwrap();
        registry
            .create("symptoms", &entry(json!({"name": "紅疹", "academic": "rash", "visit": 1324})))
            .unwrap();

        let records = registry
            .read("symptoms", &Entry::new(), Some(&["visit", "name"]))
            .unwrap();
        assert_eq!(records.len(), 1);
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, vec!["visit", "name"]);
        assert_eq!(records[0]["visit"], json!(1324));
        assert_eq!(records[0]["name"], json!("紅疹"));
    }

    #[test]
    fn test_bad_schema_fails_before_any_table_exists() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("store.db");

        let good = TableSchema::new("good")
            .column("id", ColumnProperty::auto_id())
            .column("name", ColumnProperty::str());
        let broken = TableSchema::new("broken")
            .column("id", ColumnProperty::int().with_auto_increment())
            .column("name", ColumnProperty::str());

        let conn = NativeConnection::open(&path, None).unwrap();
        let result = Registry::with_schemas(conn, vec![good, broken]);
        assert!(matches!(result, Err(TableError::Schema(_))));

        let reopened = NativeConnection::open(&path, None).unwrap();
        assert!(!reopened.table_exists("good").unwrap());
        assert!(!reopened.table_exists("broken").unwrap());
    }

    #[test]
    fn test_create_returns_stored_values() {
        let registry = Registry::open_in_memory().unwrap();
        let created = registry
            .create_bulk(
                "clinics",
                &[
                    entry(json!({"title": "萬安中醫診所", "owner_id": true, "tags": ["婦科"]})),
                    entry(json!({"title": "仁愛家醫科診所", "owner_id": 1})),
                ],
            )
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(created[0]["owner_id"], json!(1));
        assert_eq!(created[0]["tags"], json!(["婦科"]));
        assert_eq!(created[1]["tags"], Value::Null);

        let read = registry.read("clinics", &Entry::new(), None).unwrap();
        assert_eq!(created, read);
    }

    #[test]
    fn test_create_without_generated_column_echoes_entry() {
        let conn = NativeConnection::open_in_memory().unwrap();
        let notes = TableSchema::new("notes").column("body", ColumnProperty::str());
        let registry = Registry::with_schemas(conn, vec![notes]).unwrap();

        let created = registry.create("notes", &entry(json!({"body": "hi"}))).unwrap();
        assert_eq!(Value::Object(created), json!({"body": "hi"}));
    }
}
