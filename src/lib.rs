//! Legacy Dynamic-Array Record Library
//! # Overview
//!
//! This library reads, projects and safely rewrites records stored in a legacy
//! Pick/Universe-style flat file, where each line is a "dynamic array" with
//! three nested delimiter tiers.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Record, ClientView, AttributeMap, errors, configuration)
//! - [`cli`] - CLI arguments parsing and command execution
//! - [`core`] - Record processing components:
//!   - [`core::delimiter`] - Parsing and serialization of the delimiter grammar
//!   - [`core::address`] - 1-based `extract(attribute, value, subvalue)`
//!   - [`core::projector`] - Typed projection (exact decimals, calendar dates)
//!   - [`core::codec`] - read / project / update orchestration
//! - [`store`] - Flat-file storage with backup, per-file locking and atomic rewrite
//! - [`io`] - JSON and CSV handling at the boundary
//!
//! # Record Format
//!
//! ```text
//! 101^John^100]50\25^2024-01-01]2024-02-01
//! ```
//!
//! - `^` separates attributes (attribute 1 is the record key)
//! - `]` separates the values of an attribute
//! - `\` separates the subvalues of a value
//!
//! # Contact Surface
//!
//! Anything outside this crate talks to it through three calls on
//! [`LegacyCodec`] (or its async twin [`AsyncLegacyCodec`]):
//! - `read(key)` - the parsed record, or `NotFound`
//! - `project(key, options)` - the typed view, or `NotFound`
//! - `update(key, attribute_map)` - write-back, or a typed error

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod store;
pub mod types;

pub use self::core::{AsyncLegacyCodec, LegacyCodec, RecordStore, TypeProjector};
pub use io::{parse_attribute_map, write_views_csv};
pub use store::{FileLockRegistry, FlatFileStore};
pub use types::{
    Attribute, AttributeMap, AttributeUpdate, ClientView, FieldSchema, FieldValue, LatestBalance,
    ProjectionOptions, Record, RecordError, Transaction, Value,
};
