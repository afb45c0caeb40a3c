//! 1-based positional extraction
//!
//! `extract(attribute, value, subvalue)` reads a record at any of the three
//! tiers. A position past the end of its tier is normal and yields `""`; a
//! position of 0 is a caller error and yields `RecordError::Configuration`.

use crate::core::delimiter::{serialize_attribute, serialize_value};
use crate::types::{Record, RecordError};

impl Record {
    /// Extract the raw text at a 1-based address
    ///
    /// - `extract(a, None, None)`: attribute `a`, values and subvalues re-joined
    /// - `extract(a, Some(v), None)`: value `v` of attribute `a`, subvalues re-joined
    /// - `extract(a, Some(v), Some(s))`: subvalue `s` of value `v` of attribute `a`
    ///
    /// A subvalue position without a value position addresses value 1.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Configuration` if any supplied position is 0.
    /// Out-of-range positions are not errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use legacy_dynarray::core::delimiter::parse_record;
    ///
    /// let record = parse_record("101^John^100]50\\25");
    /// assert_eq!(record.extract(2, None, None).unwrap(), "John");
    /// assert_eq!(record.extract(3, Some(2), Some(2)).unwrap(), "25");
    /// assert_eq!(record.extract(9, None, None).unwrap(), "");
    /// ```
    pub fn extract(
        &self,
        attribute: usize,
        value: Option<usize>,
        subvalue: Option<usize>,
    ) -> Result<String, RecordError> {
        check_position("attribute", attribute)?;
        if let Some(value) = value {
            check_position("value", value)?;
        }
        if let Some(subvalue) = subvalue {
            check_position("subvalue", subvalue)?;
        }

        let Some(attr) = self.attribute(attribute) else {
            return Ok(String::new());
        };

        let value = match (value, subvalue) {
            (None, None) => return Ok(serialize_attribute(attr)),
            (Some(value), _) => value,
            (None, Some(_)) => 1,
        };

        let Some(val) = attr.value(value) else {
            return Ok(String::new());
        };

        match subvalue {
            None => Ok(serialize_value(val)),
            Some(subvalue) => Ok(val.subvalue(subvalue).unwrap_or_default().to_string()),
        }
    }

    /// Attribute text at a 1-based position, `""` when out of range
    ///
    /// Convenience for callers that already hold a validated position.
    pub fn attribute_text(&self, attribute: usize) -> String {
        self.attribute(attribute)
            .map(serialize_attribute)
            .unwrap_or_default()
    }
}

fn check_position(tier: &str, position: usize) -> Result<(), RecordError> {
    if position == 0 {
        return Err(RecordError::invalid_position(tier, 0));
    }
    Ok(())
}

/// Convert a signed position received as text or JSON into a checked one
///
/// # Errors
///
/// Returns `RecordError::Configuration` for zero or negative positions.
pub fn to_position(tier: &str, position: i64) -> Result<usize, RecordError> {
    if position < 1 {
        return Err(RecordError::invalid_position(tier, position));
    }
    usize::try_from(position).map_err(|_| RecordError::invalid_position(tier, position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::delimiter::parse_record;
    use rstest::rstest;

    const LINE: &str = "101^John^100]50\\25^2024-01-01]2024-02-01";

    #[rstest]
    #[case::key(1, None, None, "101")]
    #[case::name(2, None, None, "John")]
    #[case::whole_attribute(3, None, None, "100]50\\25")]
    #[case::first_value(3, Some(1), None, "100")]
    #[case::value_with_subvalues(3, Some(2), None, "50\\25")]
    #[case::subvalue(3, Some(2), Some(2), "25")]
    #[case::single_subvalue(3, Some(1), Some(1), "100")]
    #[case::subvalue_defaults_to_value_one(4, None, Some(1), "2024-01-01")]
    #[case::attribute_out_of_range(99, None, None, "")]
    #[case::value_out_of_range(3, Some(99), None, "")]
    #[case::subvalue_out_of_range(3, Some(1), Some(2), "")]
    #[case::all_out_of_range(99, Some(99), Some(99), "")]
    fn test_extract(
        #[case] attribute: usize,
        #[case] value: Option<usize>,
        #[case] subvalue: Option<usize>,
        #[case] expected: &str,
    ) {
        let record = parse_record(LINE);
        assert_eq!(record.extract(attribute, value, subvalue).unwrap(), expected);
    }

    #[rstest]
    #[case::attribute_zero(0, None, None)]
    #[case::value_zero(1, Some(0), None)]
    #[case::subvalue_zero(1, Some(1), Some(0))]
    #[case::zero_even_when_out_of_range(99, Some(0), None)]
    fn test_zero_position_is_configuration_error(
        #[case] attribute: usize,
        #[case] value: Option<usize>,
        #[case] subvalue: Option<usize>,
    ) {
        let record = parse_record(LINE);
        let error = record.extract(attribute, value, subvalue).unwrap_err();
        assert!(error.is_configuration());
    }

    #[test]
    fn test_empty_attribute_is_data() {
        let record = parse_record("103^Alex^^2024-04-20");
        assert_eq!(record.extract(3, None, None).unwrap(), "");
        assert_eq!(record.extract(3, Some(1), None).unwrap(), "");
        assert_eq!(record.extract(4, None, None).unwrap(), "2024-04-20");
    }

    #[rstest]
    #[case::one(1, Ok(1))]
    #[case::large(42, Ok(42))]
    #[case::zero(0, Err(()))]
    #[case::negative(-3, Err(()))]
    fn test_to_position(#[case] input: i64, #[case] expected: Result<usize, ()>) {
        let result = to_position("attribute", input);
        match expected {
            Ok(position) => assert_eq!(result.unwrap(), position),
            Err(()) => assert!(result.unwrap_err().is_configuration()),
        }
    }
}
