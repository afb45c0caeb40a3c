//! I/O module
//!
//! Output formats and boundary parsing.
//!
//! # Components
//!
//! - `csv_format` - CSV export of projected client views
//! - `json_format` - JSON attribute maps in, records and views out

pub mod csv_format;
pub mod json_format;

pub use csv_format::write_views_csv;
pub use json_format::{parse_attribute_map, parse_position, to_json_string};
