//! Parsing and serialization of the three-tier delimiter grammar
//!
//! ```text
//! 101^John^100]50\25^2024-01-01]2024-02-01
//!    │      │  │  │
//!    │      │  │  └── subvalue mark  (\)
//!    │      │  └───── value mark     (])
//!    │      └──────── attribute mark (^)
//! ```
//!
//! Splitting is total at every tier: text without a separator yields exactly
//! one element, and empty text yields one empty element. Because of that,
//! `serialize(parse(line)) == line` for every line, including trailing empty
//! values and repeated separators.
//!
//! There is no escaping mechanism; field text is assumed never to contain a
//! mark character.

use crate::types::{Attribute, Record, Value, ATTRIBUTE_MARK, SUBVALUE_MARK, VALUE_MARK};

/// Parse one raw line into a record
///
/// A trailing `\n` or `\r\n` is not part of the record and must be stripped
/// by the caller; the store does this when locating a line.
pub fn parse_record(line: &str) -> Record {
    Record::from_attributes(line.split(ATTRIBUTE_MARK).map(parse_attribute).collect())
}

/// Parse the raw text of one attribute
pub fn parse_attribute(text: &str) -> Attribute {
    Attribute::from_values(text.split(VALUE_MARK).map(parse_value).collect())
}

/// Parse the raw text of one value
pub fn parse_value(text: &str) -> Value {
    Value::from_subvalues(text.split(SUBVALUE_MARK).map(str::to_string).collect())
}

/// Serialize a record back into one raw line (without line terminator)
pub fn serialize_record(record: &Record) -> String {
    join(record.attributes().iter().map(serialize_attribute), ATTRIBUTE_MARK)
}

/// Serialize one attribute: values joined with the value mark
pub fn serialize_attribute(attribute: &Attribute) -> String {
    join(attribute.values().iter().map(serialize_value), VALUE_MARK)
}

/// Serialize one value: subvalues joined with the subvalue mark
pub fn serialize_value(value: &Value) -> String {
    join(value.subvalues(), SUBVALUE_MARK)
}

/// Join pieces with a single-character mark
pub fn join<I, T>(parts: I, mark: char) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut buffer = [0u8; 4];
    let mark: &str = mark.encode_utf8(&mut buffer);
    parts
        .into_iter()
        .map(|part| part.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(mark)
}

impl std::str::FromStr for Record {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_record(s))
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&serialize_record(self))
    }
}
