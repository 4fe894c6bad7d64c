//! Structured JSON logger
//!
//! - One log line = one event
//! - Deterministic key ordering
//! - Synchronous, no buffering
//! - Events below the configured minimum severity are dropped

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use serde_json::{Map, Value};

/// Ordered log levels; configurable as the minimum written
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace = 0,
    Info = 1,
    /// Degraded but continuing, e.g. a value written unconverted
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            3 => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Severity::Trace),
            "INFO" => Ok(Severity::Info),
            "WARN" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            "FATAL" => Ok(Severity::Fatal),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// Process-wide JSON-lines logger
pub struct Logger;

impl Logger {
    /// Set the minimum severity that will be written
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    /// Current minimum severity
    pub fn min_severity() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Log an event with the given severity and fields
    ///
    /// Fields are output in deterministic order (alphabetical by key)
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity < Self::min_severity() {
            return;
        }
        if severity >= Severity::Error {
            Self::log_to_writer(severity, event, fields, &mut io::stderr());
        } else {
            Self::log_to_writer(severity, event, fields, &mut io::stdout());
        }
    }

    /// Render one event as a single JSON line
    ///
    /// `event` and `severity` lead; the remaining fields follow sorted by key.
    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        let mut line = Map::with_capacity(fields.len() + 2);
        line.insert("event".into(), Value::from(event));
        line.insert("severity".into(), Value::from(severity.as_str()));
        for (key, value) in sorted {
            line.insert((*key).into(), Value::from(*value));
        }

        let mut output = Value::Object(line).to_string();
        output.push('\n');

        // One write per event; a failed log write never fails the caller
        let _ = writer.write_all(output.as_bytes());
        let _ = writer.flush();
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Written to stderr
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}

#[cfg(test)]
fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("INFO".parse::<Severity>().unwrap(), Severity::Info);
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn test_log_json_format() {
        let output = capture_log(Severity::Info, "TABLE_CREATED", &[("table", "users")]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "TABLE_CREATED");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["table"], "users");
    }

    #[test]
    fn test_log_deterministic_ordering() {
        let output1 = capture_log(
            Severity::Warn,
            "VALUE_ENCODE_FAILED",
            &[("value", "1"), ("column", "tags"), ("table", "clinics")],
        );
        let output2 = capture_log(
            Severity::Warn,
            "VALUE_ENCODE_FAILED",
            &[("table", "clinics"), ("value", "1"), ("column", "tags")],
        );
        assert_eq!(output1, output2);

        let column_pos = output1.find("column").unwrap();
        let table_pos = output1.find("table").unwrap();
        assert!(column_pos < table_pos);
    }

    #[test]
    fn test_log_escapes_special_chars() {
        let output = capture_log(
            Severity::Info,
            "TEST",
            &[("value", "[\"家庭醫學\"]\nnext")],
        );

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["value"], "[\"家庭醫學\"]\nnext");
        assert_eq!(output.chars().filter(|c| *c == '\n').count(), 1);
    }
}
