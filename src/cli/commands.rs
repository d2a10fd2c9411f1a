//! CLI command implementations
//!
//! Every command loads its inputs, runs against the library API, and
//! writes exactly one JSON object to stdout. Failures are also written to
//! stdout as an error object before being returned to `main`.

use std::path::Path;

use serde_json::Value;

use crate::builder::QueryBuilder;
use crate::collection::{normalize_value, Collection, ElementKey, Record};
use crate::config::QueryConfig;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::query::QueryRequest;

use super::args::{Cli, Command, QueryArgs};
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, read_request, write_error, write_response, write_results};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    Logger::set_min_severity(cli.log_level);
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match cmd {
        Command::Query(args) => query(&args),
        Command::Explain(args) => explain(&args),
        Command::Check { data, config } => check(&data, config.as_deref()),
    };

    if let Err(e) = &result {
        write_error(e.code(), &e.to_string())?;
    }
    result
}

/// Run a query and print its results
pub fn query(args: &QueryArgs) -> CliResult<()> {
    let builder = build_query(args)?;
    let rows = builder.get_results()?;
    write_results(rows.into_iter().map(Value::Object).collect())
}

/// Print the explain plan of a query without running it
pub fn explain(args: &QueryArgs) -> CliResult<()> {
    let builder = build_query(args)?;
    let plan = builder.explain();
    write_response(serde_json::to_value(&plan)?)
}

/// Check a data file for shape consistency
pub fn check(data: &Path, config: Option<&Path>) -> CliResult<()> {
    // Only validates the file; the empty-collection policy does not apply.
    load_config(config)?;
    let entries = load_records(data)?;
    let collection = Collection::from_keyed(entries)?;

    write_response(serde_json::json!({
        "consistent": true,
        "records": collection.len(),
    }))
}

/// Builds a configured query from command arguments
pub fn build_query(args: &QueryArgs) -> CliResult<QueryBuilder> {
    let config = load_config(args.config.as_deref())?;
    let entries = load_records(&args.data)?;
    let mut builder = QueryBuilder::from_keyed(entries, config)?;

    let text = match &args.query {
        Some(path) => read_json_file(path)?.to_string(),
        None => read_request()?,
    };
    let request = QueryRequest::from_json(&text)?;
    request.apply_to(&mut builder)?;

    Ok(builder)
}

/// Loads the configuration file, or the defaults when none is given
pub fn load_config(path: Option<&Path>) -> CliResult<QueryConfig> {
    let Some(path) = path else {
        return Ok(QueryConfig::default());
    };

    let config = QueryConfig::load(path)?;
    let shown = path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", shown.as_str())]);
    Ok(config)
}

/// Loads records from a JSON array (positional keys) or a JSON object
/// (its member names become element keys).
pub fn load_records(path: &Path) -> CliResult<Vec<(ElementKey, Record)>> {
    match read_json_file(path)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| -> CliResult<_> { Ok((ElementKey::Index(i), normalize_value(item)?)) })
            .collect(),
        Value::Object(members) => members
            .into_iter()
            .map(|(name, item)| -> CliResult<_> { Ok((ElementKey::Name(name), normalize_value(item)?)) })
            .collect(),
        _ => Err(CliError::invalid_input(format!(
            "{} must hold a JSON array or object of records",
            path.display()
        ))),
    }
}
