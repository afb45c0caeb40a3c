//! Projection configuration
//!
//! The field schema says which attribute holds which business field; the
//! projection options say how raw text should be coerced. Both are plain
//! values passed into the projector so the wire layout stays decoupled from
//! the business mapping.

use super::error::RecordError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Label reported in every projected view unless the schema overrides it
pub const DEFAULT_DATA_SOURCE: &str = "Simulated Universe/Pick Flat File";

/// Which balances entry becomes the scalar `current_balance`
///
/// Deserialization goes through `FromStr`, so JSON options and command-line
/// text accept the same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LatestBalance {
    /// Entry 1 after value-splitting
    First,
    /// Final entry after value-splitting
    #[default]
    Last,
}

impl FromStr for LatestBalance {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(LatestBalance::First),
            "last" => Ok(LatestBalance::Last),
            _ => Err(RecordError::configuration(format!(
                "latest_balance must be 'first' or 'last', got '{}'",
                s
            ))),
        }
    }
}

impl TryFrom<String> for LatestBalance {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for LatestBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatestBalance::First => write!(f, "first"),
            LatestBalance::Last => write!(f, "last"),
        }
    }
}

/// Options recognised by `to_json`-style projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionOptions {
    /// Interpret balances entries as exact decimals where possible
    pub parse_numbers: bool,
    /// Interpret dates entries as `%Y-%m-%d` calendar dates where possible
    pub parse_dates: bool,
    /// Which balances entry becomes `current_balance`
    pub latest_balance: LatestBalance,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            parse_numbers: true,
            parse_dates: true,
            latest_balance: LatestBalance::Last,
        }
    }
}

impl ProjectionOptions {
    /// Build options from the loosely typed form a boundary layer receives
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Configuration` if `latest_balance` is neither
    /// `first` nor `last`.
    pub fn from_parts(
        parse_numbers: bool,
        parse_dates: bool,
        latest_balance: &str,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            parse_numbers,
            parse_dates,
            latest_balance: latest_balance.parse()?,
        })
    }

    /// Parse a JSON options object such as `{"latest_balance": "first"}`
    ///
    /// Unknown option names and invalid selectors are configuration errors.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Attribute positions of the business fields (all 1-based)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldSchema {
    /// Attribute holding the client id (the record key)
    pub id: usize,
    /// Attribute holding the client name
    pub name: usize,
    /// Multi-valued attribute holding the balances history
    pub balances: usize,
    /// Multi-valued attribute holding the transaction dates
    pub dates: usize,
    /// Label reported as `data_source` in projected views
    pub data_source: String,
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self {
            id: 1,
            name: 2,
            balances: 3,
            dates: 4,
            data_source: DEFAULT_DATA_SOURCE.to_string(),
        }
    }
}

impl FieldSchema {
    /// Create a schema with custom positions and the default data source
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Configuration` if any position is 0.
    pub fn new(id: usize, name: usize, balances: usize, dates: usize) -> Result<Self, RecordError> {
        let schema = Self {
            id,
            name,
            balances,
            dates,
            ..Self::default()
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Load a schema from JSON, validating the positions
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let schema: Self = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        for (field, position) in [
            ("id", self.id),
            ("name", self.name),
            ("balances", self.balances),
            ("dates", self.dates),
        ] {
            if position == 0 {
                return Err(RecordError::configuration(format!(
                    "schema field '{}' must name an attribute position of 1 or greater",
                    field
                )));
            }
        }
        Ok(())
    }
}
