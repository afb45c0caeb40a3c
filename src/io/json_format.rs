//! JSON at the boundary
//!
//! The surrounding layer speaks JSON: it sends attribute maps such as
//! `{"2": "Jane", "3": ["999.99", "0.00"]}` and expects records and views
//! back as JSON documents. This module converts between the two, rejecting
//! anything malformed as `RecordError::Configuration`.

use crate::core::address::to_position;
use crate::types::{AttributeMap, AttributeUpdate, RecordError};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Parse a JSON object body into a validated `AttributeMap`
///
/// Keys must be positive integers written as strings. Values may be strings
/// or numbers (scalar) or arrays of strings or numbers (one entry per value).
///
/// # Errors
///
/// Returns `RecordError::Configuration` if the body is not an object, a key
/// is not a positive integer, or a value has an unsupported shape.
pub fn parse_attribute_map(json: &str) -> Result<AttributeMap, RecordError> {
    let body: JsonValue = serde_json::from_str(json)?;
    let JsonValue::Object(entries) = body else {
        return Err(RecordError::configuration(
            "attribute map must be a JSON object",
        ));
    };

    let mut map = AttributeMap::new();
    for (key, value) in entries {
        let position = parse_position("attribute", &key)?;
        let update = match value {
            JsonValue::Array(items) => AttributeUpdate::List(
                items
                    .iter()
                    .map(|item| scalar_text(&key, item))
                    .collect::<Result<_, _>>()?,
            ),
            other => AttributeUpdate::Scalar(scalar_text(&key, &other)?),
        };
        map.insert(position, update)?;
    }
    Ok(map)
}

fn scalar_text(key: &str, value: &JsonValue) -> Result<String, RecordError> {
    match value {
        JsonValue::String(text) => Ok(text.clone()),
        JsonValue::Number(number) => Ok(number.to_string()),
        _ => Err(RecordError::configuration(format!(
            "attribute {}: expected a string, number or list of them",
            key
        ))),
    }
}

/// Parse a 1-based position given as text
///
/// # Errors
///
/// Returns `RecordError::Configuration` if the text is not an integer or is
/// zero or negative.
pub fn parse_position(tier: &str, text: &str) -> Result<usize, RecordError> {
    let position: i64 = text.trim().parse().map_err(|_| {
        RecordError::configuration(format!(
            "invalid {} key: '{}' (must be integer)",
            tier, text
        ))
    })?;
    to_position(tier, position)
}

/// Render any serializable result as pretty JSON
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, RecordError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| RecordError::io("render JSON output", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_attribute_map() {
        let map = parse_attribute_map(r#"{"1": "101", "2": "Jane Doe", "3": ["999.99", 0]}"#)
            .unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(
            map.get(2),
            Some(&AttributeUpdate::Scalar("Jane Doe".to_string()))
        );
        assert_eq!(
            map.get(3),
            Some(&AttributeUpdate::List(vec![
                "999.99".to_string(),
                "0".to_string()
            ]))
        );
    }

    #[rstest]
    #[case::not_object(r#"["Jane"]"#)]
    #[case::not_json("{2: Jane}")]
    #[case::word_key(r#"{"name": "Jane"}"#)]
    #[case::zero_key(r#"{"0": "Jane"}"#)]
    #[case::negative_key(r#"{"-1": "Jane"}"#)]
    #[case::null_value(r#"{"2": null}"#)]
    #[case::nested_object(r#"{"2": {"first": "Jane"}}"#)]
    #[case::nested_list(r#"{"3": [["1"]]}"#)]
    #[case::attribute_mark(r#"{"2": "Jane^Doe"}"#)]
    #[case::position_too_large(r#"{"1000000000000": "x"}"#)]
    #[case::position_just_past_maximum(r#"{"10001": "x"}"#)]
    fn test_parse_attribute_map_rejects(#[case] json: &str) {
        let error = parse_attribute_map(json).unwrap_err();
        assert!(error.is_configuration(), "unexpected error: {:?}", error);
    }

    #[rstest]
    #[case::plain("3", Ok(3))]
    #[case::padded(" 7 ", Ok(7))]
    #[case::zero("0", Err(()))]
    #[case::negative("-2", Err(()))]
    #[case::word("two", Err(()))]
    fn test_parse_position(#[case] text: &str, #[case] expected: Result<usize, ()>) {
        let result = parse_position("attribute", text);
        match expected {
            Ok(position) => assert_eq!(result.unwrap(), position),
            Err(()) => assert!(result.unwrap_err().is_configuration()),
        }
    }
}
