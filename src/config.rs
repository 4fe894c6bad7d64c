//! # Service Configuration
//!
//! JSON configuration file. Only `store_path` is required; every other
//! field has a default.
//!
//! ```json
//! { "store_path": "./clinic.db", "port": 8000, "seed_on_start": true }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;

/// Upper bound on session lifetime (one year)
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 86_400;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "CLINICDB_CONFIG_READ",
            ConfigError::Parse(_) => "CLINICDB_CONFIG_PARSE",
            ConfigError::Invalid(_) => "CLINICDB_CONFIG_INVALID",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Store file location (required)
    pub store_path: String,

    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty means any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Session lifetime in seconds (default: one day)
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Load fixture data when serving an empty store
    #[serde(default)]
    pub seed_on_start: bool,

    /// Minimum log severity (default: "INFO")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

fn default_session_ttl_secs() -> u64 {
    86_400
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl ServiceConfig {
    /// Config with defaults for everything but the store location
    pub fn for_store(store_path: impl Into<String>) -> Self {
        Self {
            store_path: store_path.into(),
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            session_ttl_secs: default_session_ttl_secs(),
            seed_on_start: false,
            log_level: default_log_level(),
        }
    }

    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ServiceConfig = serde_json::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store_path.trim().is_empty() {
            return Err(ConfigError::Invalid("store_path must not be empty".into()));
        }

        if self.session_ttl_secs == 0 {
            return Err(ConfigError::Invalid("session_ttl_secs must be > 0".into()));
        }

        if self.session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "session_ttl_secs must be <= {}",
                MAX_SESSION_TTL_SECS
            )));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("unknown log_level '{}'", self.log_level)))
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::seconds(self.session_ttl_secs.min(MAX_SESSION_TTL_SECS) as i64)
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
