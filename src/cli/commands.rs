//! Command execution
//!
//! Runs one parsed command against the flat file and writes its result to
//! the given output. Logging goes through `tracing` (stderr); only command
//! results are written to `output`.

use crate::cli::args::{to_attribute_map, CliArgs, Command};
use crate::core::LegacyCodec;
use crate::io::csv_format::write_views_csv;
use crate::io::json_format::{parse_position, to_json_string};
use crate::store::FlatFileStore;
use crate::types::RecordError;
use std::io::Write;
use tracing::info;

/// Execute a parsed command
///
/// # Arguments
///
/// * `args` - Parsed command-line arguments
/// * `output` - Writer receiving the command's result
///
/// # Returns
///
/// * `Ok(())` if the command succeeded
/// * `Err(RecordError)` with the category the caller should report
pub fn execute(args: &CliArgs, output: &mut dyn Write) -> Result<(), RecordError> {
    let codec = LegacyCodec::new(FlatFileStore::new(&args.data_file), args.to_schema()?);

    match &args.command {
        Command::Read { key } => {
            let record = codec.read(key)?;
            writeln!(output, "{}", to_json_string(&record)?)?;
        }
        Command::Extract {
            key,
            attribute,
            value,
            subvalue,
        } => {
            let attribute = parse_position("attribute", attribute)?;
            let value = value
                .as_deref()
                .map(|v| parse_position("value", v))
                .transpose()?;
            let subvalue = subvalue
                .as_deref()
                .map(|s| parse_position("subvalue", s))
                .transpose()?;
            writeln!(output, "{}", codec.extract(key, attribute, value, subvalue)?)?;
        }
        Command::Project { key, projection } => {
            let view = codec.project(key, &projection.to_options()?)?;
            writeln!(output, "{}", to_json_string(&view)?)?;
        }
        Command::Update {
            key,
            json,
            set,
            values,
        } => {
            let map = to_attribute_map(json.as_deref(), set, values)?;
            let record = codec.update(key, &map)?;
            info!(key = %key, "legacy record updated");
            writeln!(output, "{}", record)?;
        }
        Command::Export { projection } => {
            let views = codec.project_all(&projection.to_options()?)?;
            write_views_csv(&views, output)?;
        }
    }

    Ok(())
}

/// Process exit code for an error category
///
/// - 1: I/O failure
/// - 2: configuration error (same code clap uses for usage errors)
/// - 3: record not found
pub fn exit_code(error: &RecordError) -> i32 {
    match error {
        RecordError::Io { .. } => 1,
        RecordError::Configuration { .. } => 2,
        RecordError::NotFound { .. } => 3,
    }
}
