//! CLI argument definitions using clap
//!
//! Commands:
//! - clinicdb init --config <path>
//! - clinicdb seed --config <path> [--clinics <jsonl>]
//! - clinicdb read --config <path> <table> [--select a,b] [--filter <json>]
//! - clinicdb vacuum --config <path>
//! - clinicdb serve --config <path> [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// clinicdb - clinic information service
#[derive(Parser, Debug)]
#[command(name = "clinicdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the store and every logical table
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./clinicdb.json")]
        config: PathBuf,
    },

    /// Load fixture data into an empty store
    Seed {
        /// Path to configuration file
        #[arg(long, default_value = "./clinicdb.json")]
        config: PathBuf,

        /// JSON-lines clinic directory (name, address, number)
        #[arg(long)]
        clinics: Option<PathBuf>,
    },

    /// Print the rows of one table as JSON
    Read {
        /// Path to configuration file
        #[arg(long, default_value = "./clinicdb.json")]
        config: PathBuf,

        /// Table name
        table: String,

        /// Comma-separated column list
        #[arg(long, value_delimiter = ',')]
        select: Option<Vec<String>>,

        /// JSON object of column equalities
        #[arg(long)]
        filter: Option<String>,
    },

    /// Compact the store file
    Vacuum {
        /// Path to configuration file
        #[arg(long, default_value = "./clinicdb.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./clinicdb.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
