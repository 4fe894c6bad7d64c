//! Registry Fixture Tests
//!
//! End-to-end seeding through the master registry:
//! - Symptoms read back in insertion order and rank by visit count
//! - Clinic tags round-trip as arrays
//! - Projections zip with the same column order the select used

use std::io::Write;

use clinicdb::auth::verify_password;
use clinicdb::criterion::Criterion;
use clinicdb::registry::Registry;
use clinicdb::seed::{init_all, CLINIC_TAGS, DOCTOR_PASSWORD, SYMPTOM_FIXTURES};
use clinicdb::table::{Entry, Record, TableEntity, TableError};
use serde_json::{json, Value};
use tempfile::{NamedTempFile, TempDir};

// =============================================================================
// Helper Functions
// =============================================================================

const CLINIC_LINES: [&str; 3] = [
    r#"{"name": "萬安中醫診所", "address": "台中市西屯區重慶路１３１號１樓", "number": "04-23124567"}"#,
    r#"{"name": "仁愛家醫科診所", "address": "高雄市三民區建工路４５號", "number": "07-3801234"}"#,
    r#"{"name": "康寧婦產科診所", "address": "桃園市中壢區中大路３００號", "number": "03-4221111"}"#,
];

fn clinic_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in CLINIC_LINES {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

fn setup_seeded() -> (TempDir, Registry) {
    let tmp = TempDir::new().unwrap();
    let registry = Registry::open(tmp.path().join("fake.db")).unwrap();
    let clinics = clinic_file();
    init_all(&registry, Some(clinics.path())).unwrap();
    (tmp, registry)
}

fn entry(value: Value) -> Entry {
    value.as_object().cloned().unwrap()
}

fn visits(record: &Record) -> i64 {
    record["visit"].as_i64().unwrap()
}

// =============================================================================
// Symptom Tests
// =============================================================================

#[test]
fn test_symptoms_read_in_insertion_order() {
    let (_tmp, registry) = setup_seeded();

    let records = registry
        .read("symptoms", &Entry::new(), Some(&["name", "academic", "visit"]))
        .unwrap();
    let expected: Vec<Value> = SYMPTOM_FIXTURES
        .iter()
        .map(|(name, academic, visit)| json!({"name": name, "academic": academic, "visit": visit}))
        .collect();

    let actual: Vec<Value> = records.into_iter().map(Value::Object).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_symptom_leaderboard_ranking() {
    let (_tmp, registry) = setup_seeded();

    let records = registry.read("symptoms", &Entry::new(), None).unwrap();
    assert_eq!(records.len(), 12);

    // last inserted fixture
    let last = records.last().unwrap();
    assert_eq!(last["name"], json!("口臭"));
    assert_eq!(last["academic"], json!("halitosis"));
    assert_eq!(last["visit"], json!(324));

    let mut ranked = records;
    ranked.sort_by(|a, b| visits(b).cmp(&visits(a)));

    assert_eq!(ranked[0]["name"], json!("發燒"));
    assert_eq!(ranked[0]["academic"], json!("pyrexia"));
    assert_eq!(ranked[0]["visit"], json!(3579));
    assert_eq!(ranked[11]["academic"], json!("gingivitis"));
    assert!(ranked.windows(2).all(|w| visits(&w[0]) >= visits(&w[1])));
}

// =============================================================================
// User and Bulletin Tests
// =============================================================================

#[test]
fn test_doctor_password_is_hashed() {
    let (_tmp, registry) = setup_seeded();

    let users = registry.read("users", &Entry::new(), None).unwrap();
    assert_eq!(users.len(), 1);

    let stored = users[0]["password"].as_str().unwrap();
    assert_ne!(stored, DOCTOR_PASSWORD);
    assert!(verify_password(DOCTOR_PASSWORD, stored));
}

#[test]
fn test_bulletin_authored_by_doctor() {
    let (_tmp, registry) = setup_seeded();

    let bulletins = registry.read("bulletins", &Entry::new(), None).unwrap();
    assert_eq!(bulletins.len(), 1);
    assert_eq!(bulletins[0]["user_id"], json!(1));
    assert!(bulletins[0]["content"].as_str().unwrap().contains("流感"));
}

// =============================================================================
// Clinic Tests
// =============================================================================

#[test]
fn test_clinic_lookup_by_title() {
    let (_tmp, registry) = setup_seeded();

    let found = registry
        .read("clinics", &entry(json!({"title": "萬安中醫診所"})), None)
        .unwrap();
    assert!(found
        .iter()
        .any(|c| c["address"] == json!("台中市西屯區重慶路１３１號１樓")));
}

#[test]
fn test_clinic_addresses_keep_file_order() {
    let (_tmp, registry) = setup_seeded();

    let addresses: Vec<Value> = registry
        .read("clinics", &Entry::new(), Some(&["address"]))
        .unwrap()
        .into_iter()
        .map(|r| r["address"].clone())
        .collect();
    let expected: Vec<Value> = CLINIC_LINES
        .iter()
        .map(|line| serde_json::from_str::<Value>(line).unwrap()["address"].clone())
        .collect();
    assert_eq!(addresses, expected);
}

#[test]
fn test_clinic_tags_decode_as_arrays() {
    let (_tmp, registry) = setup_seeded();

    for clinic in registry.read("clinics", &Entry::new(), None).unwrap() {
        let tags = clinic["tags"].as_array().expect("tags decode to an array");
        assert!(!tags.is_empty());
        assert!(tags
            .iter()
            .all(|t| CLINIC_TAGS.contains(&t.as_str().unwrap())));
        assert_eq!(clinic["owner_id"], json!(1));
    }
}

#[test]
fn test_filter_on_array_column() {
    let (_tmp, registry) = setup_seeded();
    let clinics = registry.get_table("clinics").unwrap();

    let first = registry.read("clinics", &Entry::new(), None).unwrap()[0].clone();
    let matches = registry
        .read("clinics", &entry(json!({"tags": first["tags"]})), Some(&["clinic_id"]))
        .unwrap();
    assert!(matches.iter().any(|r| r["clinic_id"] == first["clinic_id"]));
    assert_eq!(clinics.name(), "clinics");
}

// =============================================================================
// Registry Contract Tests
// =============================================================================

/// read() keys and values line up with query() positions.
#[test]
fn test_read_matches_query_positions() {
    let (_tmp, registry) = setup_seeded();

    let select = ["visit", "name"];
    let records = registry.read("symptoms", &Entry::new(), Some(&select)).unwrap();
    let rows = registry
        .query("symptoms", &Criterion::MatchAll, Some(&select))
        .unwrap();

    assert_eq!(records.len(), rows.len());
    for (record, row) in records.iter().zip(&rows) {
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, select);
        assert_eq!(record["visit"], row[0]);
        assert_eq!(record["name"], row[1]);
    }
}

#[test]
fn test_unknown_table_is_not_found() {
    let (_tmp, registry) = setup_seeded();

    for result in [
        registry.read("patients", &Entry::new(), None).map(|_| ()),
        registry.create("patients", &Entry::new()).map(|_| ()),
        registry.delete("patients", &Criterion::MatchAll).map(|_| ()),
    ] {
        assert!(matches!(result, Err(TableError::UnknownTable(_))));
    }
}

#[test]
fn test_update_and_delete_through_registry() {
    let (_tmp, registry) = setup_seeded();
    let (symptoms, all) = registry.get_table("symptoms").unwrap().criterion_selector();

    let changed = registry
        .update(
            "symptoms",
            &symptoms.field("academic").eq("rash"),
            &entry(json!({"visit": 2000})),
        )
        .unwrap();
    assert_eq!(changed, 1);

    let rash = registry
        .read("symptoms", &entry(json!({"academic": "rash"})), Some(&["visit"]))
        .unwrap();
    assert_eq!(rash[0]["visit"], json!(2000));

    assert_eq!(registry.delete("symptoms", &all).unwrap(), 12);
    assert!(registry.query("symptoms", &all, None).unwrap().is_empty());
}

#[test]
fn test_store_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("reopen.db");

    {
        let registry = Registry::open(&path).unwrap();
        init_all(&registry, None).unwrap();
    }

    let registry = Registry::open(&path).unwrap();
    assert_eq!(registry.read("symptoms", &Entry::new(), None).unwrap().len(), 12);
    registry.vacuum().unwrap();
}
