//! CLI argument definitions using clap
//!
//! Commands:
//! - arrayquery query --data <path> [--query <path>] [--config <path>]
//! - arrayquery explain --data <path> [--query <path>] [--config <path>]
//! - arrayquery check --data <path> [--config <path>]
//!
//! `--log-level` is accepted by every command.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::Severity;

/// arrayquery - in-memory queries over JSON record collections
#[derive(Parser, Debug)]
#[command(name = "arrayquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Lowest log severity written to stderr (TRACE, INFO, WARN, ERROR)
    #[arg(long, global = true, default_value = "WARN", value_parser = parse_severity)]
    pub log_level: Severity,
}

/// Input files shared by `query` and `explain`
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// JSON file holding an array (or keyed object) of records
    #[arg(long)]
    pub data: PathBuf,

    /// JSON query request; read from stdin when omitted
    #[arg(long)]
    pub query: Option<PathBuf>,

    /// Query configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a query and print the results
    Query(QueryArgs),

    /// Print the stages a query would run
    Explain(QueryArgs),

    /// Check that every record in a data file has the same shape
    Check {
        /// JSON file holding an array (or keyed object) of records
        #[arg(long)]
        data: PathBuf,

        /// Query configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    s.parse()
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
