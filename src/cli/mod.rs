//! CLI module for clinicdb
//!
//! Provides command-line interface for:
//! - init: Create the store and its tables
//! - seed: Load fixture data
//! - read: Print rows of one table
//! - vacuum: Compact the store
//! - serve: Run the HTTP API

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, read, run, run_command, seed, serve, vacuum};
pub use errors::{CliError, CliErrorCode, CliResult};
