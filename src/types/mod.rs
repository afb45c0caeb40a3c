//! Types module
//!
//! Contains core data structures used throughout the crate.
//! This module organizes types into logical submodules:
//! - `record`: the three-tier dynamic-array record and its delimiter marks
//! - `projection`: typed view produced by projection
//! - `config`: projection options and field schema
//! - `update`: attribute replacement requests
//! - `error`: error types for the codec and store

pub mod config;
pub mod error;
pub mod projection;
pub mod record;
pub mod update;

pub use config::{FieldSchema, LatestBalance, ProjectionOptions, DEFAULT_DATA_SOURCE};
pub use error::RecordError;
pub use projection::{ClientView, FieldValue, Transaction, DATE_FORMAT};
pub use record::{
    Attribute, Record, Value, ATTRIBUTE_MARK, MAX_ATTRIBUTE_POSITION, SUBVALUE_MARK, VALUE_MARK,
};
pub use update::{AttributeMap, AttributeUpdate};
