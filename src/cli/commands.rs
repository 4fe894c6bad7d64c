//! CLI command implementations
//!
//! Every command loads and validates the config first, then applies its
//! log level before touching the store.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::auth::SessionConfig;
use crate::config::ServiceConfig;
use crate::http_server::{AppState, HttpServer};
use crate::observability::Logger;
use crate::registry::Registry;
use crate::seed::init_all;
use crate::table::Entry;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Seed { config, clinics } => seed(&config, clinics.as_deref()),
        Command::Read {
            config,
            table,
            select,
            filter,
        } => read(&config, &table, select.as_deref(), filter.as_deref()),
        Command::Vacuum { config } => vacuum(&config),
        Command::Serve { config, port } => serve(&config, port),
    }
}

fn load_config(path: &Path) -> CliResult<ServiceConfig> {
    let config = ServiceConfig::load(path)?;
    Logger::set_min_severity(config.severity()?);
    Ok(config)
}

fn open_registry(config: &ServiceConfig) -> CliResult<Registry> {
    Ok(Registry::open(&config.store_path)?)
}

/// Create the store file and every logical table
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let registry = open_registry(&config)?;

    write_response(json!({
        "store": config.store_path,
        "tables": registry.table_names(),
    }))
}

/// Load fixtures, optionally with a clinic directory
pub fn seed(config_path: &Path, clinics: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let registry = open_registry(&config)?;

    let summary = init_all(&registry, clinics)?;
    write_response(json!({
        "users": summary.users,
        "symptoms": summary.symptoms,
        "bulletins": summary.bulletins,
        "clinics": summary.clinics,
    }))
}

/// Print matching rows of one table
///
/// Caller mistakes (unknown table or column) are reported as an error
/// response rather than a process failure.
pub fn read(
    config_path: &Path,
    table: &str,
    select: Option<&[String]>,
    filter: Option<&str>,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let registry = open_registry(&config)?;

    let filter = match filter {
        None => Entry::new(),
        Some(text) => match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => map,
            _ => return Err(CliError::invalid_argument("--filter must be a JSON object")),
        },
    };
    let select: Option<Vec<&str>> = select.map(|s| s.iter().map(String::as_str).collect());

    match registry.read(table, &filter, select.as_deref()) {
        Ok(records) => write_response(json!(records)),
        Err(e) if e.is_validation() => write_error(e.code(), &e.to_string()),
        Err(e) => Err(e.into()),
    }
}

/// Compact the store file
pub fn vacuum(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let registry = open_registry(&config)?;

    registry.vacuum()?;
    write_response(json!({"vacuumed": config.store_path}))
}

/// Serve the HTTP API until the listener fails
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.port = port;
    }

    let registry = open_registry(&config)?;
    if config.seed_on_start {
        init_all(&registry, None)?;
    }

    let state = Arc::new(AppState::new(
        registry,
        SessionConfig {
            ttl: config.session_ttl(),
        },
    ));
    let server = HttpServer::new(&config, state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir) -> std::path::PathBuf {
        let store = dir.path().join("clinic.db");
        let path = dir.path().join("clinicdb.json");
        fs::write(
            &path,
            json!({"store_path": store.to_string_lossy(), "log_level": "ERROR"}).to_string(),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_init_creates_store() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);

        init(&config).unwrap();
        assert!(dir.path().join("clinic.db").exists());
    }

    #[test]
    fn test_seed_then_read() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);

        seed(&config, None).unwrap();
        read(&config, "symptoms", None, Some(r#"{"academic": "rash"}"#)).unwrap();

        let registry = Registry::open(dir.path().join("clinic.db")).unwrap();
        assert_eq!(registry.read("symptoms", &Entry::new(), None).unwrap().len(), 12);
    }

    #[test]
    fn test_read_rejects_non_object_filter() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);

        let err = read(&config, "symptoms", None, Some("[1, 2]")).unwrap_err();
        assert_eq!(err.code_str(), "CLINICDB_CLI_INVALID_ARGUMENT");
    }

    #[test]
    fn test_vacuum_after_seed() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);

        seed(&config, None).unwrap();
        vacuum(&config).unwrap();
    }
}
