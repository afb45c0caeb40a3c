//! Projected (application-shaped) view of a record
//!
//! These types exist only as the output of projection; nothing here is ever
//! written back to the flat file.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

/// Canonical calendar-date text format used for parsing and re-emitting
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A field that may or may not have been coerced to a typed value
///
/// Text that failed coercion (or was never attempted) stays as `Text`, so a
/// projection never drops a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Exact decimal, keeping the scale written in the file
    Number(Decimal),
    /// Calendar date, re-emitted as `%Y-%m-%d`
    Date(NaiveDate),
    /// Original text, unparsed
    Text(String),
}

impl FieldValue {
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(decimal) => Some(*decimal),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(decimal) => write!(f, "{}", decimal),
            FieldValue::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

// Decimals are emitted as strings so no JSON consumer rounds them through f64.
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One balance entry paired with the date entry at the same position
///
/// When the balances and dates attributes have different lengths the pairing
/// runs to the longer side and the missing half is `None` (`null` in JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub amount: Option<FieldValue>,
    pub date: Option<FieldValue>,
}

/// Typed view of one client record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientView {
    pub client_id: String,
    pub client_name: String,
    /// Selected balances entry, `None` when the record has no balances
    pub current_balance: Option<FieldValue>,
    pub legacy_balances_history: Vec<FieldValue>,
    pub transaction_dates: Vec<FieldValue>,
    pub transactions: Vec<Transaction>,
    pub data_source: String,
}
