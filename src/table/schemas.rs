//! Logical table declarations
//!
//! One schema per logical table, declared once at process start.

use crate::schema::{ColumnProperty, TableSchema};

pub const USERS: &str = "users";
pub const SYMPTOMS: &str = "symptoms";
pub const BULLETINS: &str = "bulletins";
pub const CLINICS: &str = "clinics";

/// User accounts
pub fn users_schema() -> TableSchema {
    TableSchema::new(USERS)
        .column("user_id", ColumnProperty::auto_id())
        .column("username", ColumnProperty::str())
        .column("password", ColumnProperty::str())
        .column("permission", ColumnProperty::int())
        .column("auth_method", ColumnProperty::str())
}

/// Symptom popularity leaderboard
pub fn symptoms_schema() -> TableSchema {
    TableSchema::new(SYMPTOMS)
        .column("symptoms_id", ColumnProperty::auto_id())
        .column("name", ColumnProperty::str())
        .column("academic", ColumnProperty::str())
        .column("visit", ColumnProperty::int())
}

/// Bulletins posted by users
pub fn bulletins_schema() -> TableSchema {
    TableSchema::new(BULLETINS)
        .column("bulletin_id", ColumnProperty::auto_id())
        .column("class", ColumnProperty::str())
        .column("user_id", ColumnProperty::int())
        .column("title", ColumnProperty::str())
        .column("content", ColumnProperty::str())
        .column("update_at", ColumnProperty::str())
        .column("create_at", ColumnProperty::str())
}

/// Clinic directory
pub fn clinics_schema() -> TableSchema {
    TableSchema::new(CLINICS)
        .column("clinic_id", ColumnProperty::auto_id())
        .column("title", ColumnProperty::str())
        .column("address", ColumnProperty::str())
        .column("tel", ColumnProperty::str())
        .column("tags", ColumnProperty::array())
        .column("owner_id", ColumnProperty::int())
}

/// Every logical table, in creation order
pub fn logical_schemas() -> Vec<TableSchema> {
    vec![
        users_schema(),
        symptoms_schema(),
        bulletins_schema(),
        clinics_schema(),
    ]
}
