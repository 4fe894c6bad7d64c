//! # Fixture Seeding
//!
//! Populates an empty store with the symptom leaderboard, a welcome
//! bulletin, the doctor account and (optionally) a clinic directory read
//! from a JSON-lines file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::{hash_password, AuthError};
use crate::observability::Logger;
use crate::registry::Registry;
use crate::table::schemas::{BULLETINS, CLINICS, SYMPTOMS, USERS};
use crate::table::{Entry, TableError};

pub type SeedResult<T> = Result<T, SeedError>;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("failed to read clinic file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("clinic file line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// (name, academic name, visit count)
pub const SYMPTOM_FIXTURES: [(&str, &str, i64); 12] = [
    ("發燒", "pyrexia", 3579),
    ("紅疹", "rash", 1324),
    ("下腹疼痛", "abdominal-pain", 1223),
    ("頭暈", "vertigo", 1139),
    ("畏寒", "rigor", 1024),
    ("腹瀉", "diarrhea", 1591),
    ("皮膚過敏", "allergic-dermatitis", 1234),
    ("流鼻水", "rhinorrhea", 1842),
    ("打噴嚏", "sneeze", 924),
    ("偏頭痛", "migraine", 434),
    ("牙齦紅腫", "gingivitis", 124),
    ("口臭", "halitosis", 324),
];

/// Tag vocabulary for clinic specialties
pub const CLINIC_TAGS: [&str; 5] = ["家庭醫學", "婦科", "皮膚", "內分泌", "泌尿"];

pub const DOCTOR_USERNAME: &str = "real_doctor";
pub const DOCTOR_PASSWORD: &str = "safe_password";

const TAG_SEED: u64 = 0x5eed_c11c;

/// One line of the clinic directory file
#[derive(Debug, Clone, Deserialize)]
pub struct ClinicSource {
    pub name: String,
    pub address: String,
    pub number: String,
}

/// Rows written by one seeding pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub symptoms: usize,
    pub bulletins: usize,
    pub clinics: usize,
}

fn entry(value: Value) -> Entry {
    match value {
        Value::Object(map) => map,
        _ => Entry::new(),
    }
}

/// Insert the doctor account; returns its `user_id`
pub fn seed_doctor(registry: &Registry) -> SeedResult<i64> {
    let user = registry.create(
        USERS,
        &entry(json!({
            "username": DOCTOR_USERNAME,
            "password": hash_password(DOCTOR_PASSWORD)?,
            "permission": 1,
            "auth_method": "password",
        })),
    )?;
    Ok(user.get("user_id").and_then(Value::as_i64).unwrap_or_default())
}

pub fn seed_symptoms(registry: &Registry) -> SeedResult<usize> {
    let entries: Vec<Entry> = SYMPTOM_FIXTURES
        .iter()
        .map(|(name, academic, visit)| {
            entry(json!({"name": name, "academic": academic, "visit": visit}))
        })
        .collect();
    Ok(registry.create_bulk(SYMPTOMS, &entries)?.len())
}

pub fn seed_bulletins(registry: &Registry, author_id: i64) -> SeedResult<usize> {
    let bulletin = entry(json!({
        "class": "warning",
        "user_id": author_id,
        "title": "流感高峰期提醒",
        "content": "近期流感病例增加，出現發燒、畏寒等症狀請盡早就醫並配戴口罩。",
        "update_at": "2024/03/18 22:47:14",
        "create_at": "2024/03/18 22:47:14",
    }));
    Ok(registry.create_bulk(BULLETINS, &[bulletin])?.len())
}

/// Parse a JSON-lines clinic directory; blank lines are skipped
pub fn read_clinic_sources(path: &Path) -> SeedResult<Vec<ClinicSource>> {
    let io_err = |source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);

    let mut sources = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        let source = serde_json::from_str(&line).map_err(|source| SeedError::Parse {
            line: index + 1,
            source,
        })?;
        sources.push(source);
    }
    Ok(sources)
}

/// Assign one to two specialty tags per clinic
///
/// The generator is seeded, so the same input always gets the same tags.
pub fn assign_tags(count: usize) -> Vec<Vec<String>> {
    let mut rng = StdRng::seed_from_u64(TAG_SEED);
    (0..count)
        .map(|_| {
            let amount = rng.gen_range(1..=2);
            CLINIC_TAGS
                .choose_multiple(&mut rng, amount)
                .map(|tag| tag.to_string())
                .collect()
        })
        .collect()
}

pub fn seed_clinics(
    registry: &Registry,
    sources: &[ClinicSource],
    owner_id: i64,
) -> SeedResult<usize> {
    let entries: Vec<Entry> = sources
        .iter()
        .zip(assign_tags(sources.len()))
        .map(|(source, tags)| {
            entry(json!({
                "title": source.name,
                "address": source.address,
                "tel": source.number,
                "tags": tags,
                "owner_id": owner_id,
            }))
        })
        .collect();
    Ok(registry.create_bulk(CLINICS, &entries)?.len())
}

/// Seed every fixture table
///
/// A store that already has symptom rows is left untouched.
pub fn init_all(registry: &Registry, clinics: Option<&Path>) -> SeedResult<SeedSummary> {
    if !registry.query_value(SYMPTOMS, &Entry::new(), None)?.is_empty() {
        Logger::info("SEED_SKIPPED", &[("reason", "store already seeded")]);
        return Ok(SeedSummary::default());
    }

    let sources = match clinics {
        Some(path) => read_clinic_sources(path)?,
        None => Vec::new(),
    };

    let doctor_id = seed_doctor(registry)?;
    let summary = SeedSummary {
        users: 1,
        symptoms: seed_symptoms(registry)?,
        bulletins: seed_bulletins(registry, doctor_id)?,
        clinics: seed_clinics(registry, &sources, doctor_id)?,
    };

    Logger::info(
        "SEED_COMPLETE",
        &[
            ("symptoms", summary.symptoms.to_string().as_str()),
            ("bulletins", summary.bulletins.to_string().as_str()),
            ("clinics", summary.clinics.to_string().as_str()),
        ],
    );
    Ok(summary)
}
