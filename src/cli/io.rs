//! JSON output for CLI commands
//!
//! One JSON object per line on stdout, UTF-8 only.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

fn write_line(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}
