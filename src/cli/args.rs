use crate::io::json_format::{parse_attribute_map, parse_position};
use crate::types::{AttributeMap, AttributeUpdate, FieldSchema, ProjectionOptions, RecordError};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Read, project and update records in a legacy dynamic-array flat file
#[derive(Parser, Debug)]
#[command(name = "legacy-dynarray")]
#[command(about = "Read, project and update legacy dynamic-array records", long_about = None)]
pub struct CliArgs {
    /// Flat file holding one record per line
    #[arg(
        long = "data",
        value_name = "FILE",
        env = "LEGACY_DATA_FILE",
        default_value = "LEGACY_CLIENTS.dat",
        global = true
    )]
    pub data_file: PathBuf,

    /// Attribute holding the client id
    #[arg(long = "id-attr", value_name = "POS", default_value_t = 1, global = true)]
    pub id_attr: usize,

    /// Attribute holding the client name
    #[arg(long = "name-attr", value_name = "POS", default_value_t = 2, global = true)]
    pub name_attr: usize,

    /// Attribute holding the balances history
    #[arg(long = "balances-attr", value_name = "POS", default_value_t = 3, global = true)]
    pub balances_attr: usize,

    /// Attribute holding the transaction dates
    #[arg(long = "dates-attr", value_name = "POS", default_value_t = 4, global = true)]
    pub dates_attr: usize,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the parsed record as nested JSON arrays
    Read {
        /// Record key (attribute 1)
        key: String,
    },

    /// Print the text at a 1-based address
    Extract {
        /// Record key (attribute 1)
        key: String,
        #[arg(value_name = "ATTRIBUTE", allow_hyphen_values = true)]
        attribute: String,
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: Option<String>,
        #[arg(value_name = "SUBVALUE", allow_hyphen_values = true)]
        subvalue: Option<String>,
    },

    /// Print the typed client view as JSON
    Project {
        /// Record key (attribute 1)
        key: String,
        #[command(flatten)]
        projection: ProjectionArgs,
    },

    /// Replace attributes and write the record back
    Update {
        /// Record key (attribute 1)
        key: String,

        /// JSON object mapping positions to a string or a list of strings
        #[arg(long = "json", value_name = "OBJECT")]
        json: Option<String>,

        /// Scalar replacement, e.g. `--set 2=Jane`
        #[arg(long = "set", value_name = "POS=TEXT")]
        set: Vec<String>,

        /// Multi-valued replacement, e.g. `--values 3=999.99,0.00`
        #[arg(long = "values", value_name = "POS=A,B")]
        values: Vec<String>,
    },

    /// Write a CSV summary of every record
    Export {
        #[command(flatten)]
        projection: ProjectionArgs,
    },
}

/// Projection switches shared by `project` and `export`
#[derive(Args, Debug, Clone)]
pub struct ProjectionArgs {
    /// Interpret balances as exact decimals
    #[arg(long = "parse-numbers", value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    pub parse_numbers: bool,

    /// Interpret dates as YYYY-MM-DD
    #[arg(long = "parse-dates", value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    pub parse_dates: bool,

    /// Which balance becomes current_balance: 'first' or 'last'
    #[arg(long = "latest", value_name = "WHICH", default_value = "last")]
    pub latest: String,
}

impl ProjectionArgs {
    /// Build validated projection options
    ///
    /// Kept as free text on the command line so an unknown selector is
    /// reported as a configuration error rather than a usage error.
    pub fn to_options(&self) -> Result<ProjectionOptions, RecordError> {
        ProjectionOptions::from_parts(self.parse_numbers, self.parse_dates, &self.latest)
    }
}

impl CliArgs {
    /// Build the field schema from the position flags
    pub fn to_schema(&self) -> Result<FieldSchema, RecordError> {
        FieldSchema::new(
            self.id_attr,
            self.name_attr,
            self.balances_attr,
            self.dates_attr,
        )
    }
}

/// Combine `--json`, `--set` and `--values` into one attribute map
///
/// Later sources override earlier ones for the same position, in the order
/// json, set, values.
pub fn to_attribute_map(
    json: Option<&str>,
    set: &[String],
    values: &[String],
) -> Result<AttributeMap, RecordError> {
    let mut map = match json {
        Some(json) => parse_attribute_map(json)?,
        None => AttributeMap::new(),
    };
    for assignment in set {
        let (position, text) = split_assignment(assignment)?;
        map.insert(position, AttributeUpdate::Scalar(text.to_string()))?;
    }
    for assignment in values {
        let (position, text) = split_assignment(assignment)?;
        let items = text.split(',').map(str::to_string).collect();
        map.insert(position, AttributeUpdate::List(items))?;
    }
    Ok(map)
}

fn split_assignment(assignment: &str) -> Result<(usize, &str), RecordError> {
    let (position, text) = assignment.split_once('=').ok_or_else(|| {
        RecordError::configuration(format!("expected POS=TEXT, got '{}'", assignment))
    })?;
    Ok((parse_position("attribute", position)?, text))
}
