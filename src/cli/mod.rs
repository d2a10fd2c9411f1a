//! CLI module for arrayquery
//!
//! Provides command-line interface for:
//! - query: run a JSON query request against a JSON data file
//! - explain: print the stages a query would run
//! - check: validate a data file's shape consistency

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, QueryArgs};
pub use commands::{build_query, check, explain, load_config, load_records, query, run, run_command};
pub use errors::{CliError, CliResult};
pub use io::{read_json_file, read_request, write_error, write_response, write_results};
