//! Attribute replacement requests
//!
//! An `AttributeMap` maps 1-based attribute positions to replacements. Each
//! replacement is either a single scalar string or an ordered list of strings
//! that become the values of the attribute.
//!
//! # Accepted text
//!
//! Replacement text is written into the record verbatim, so it must not
//! break the line structure:
//! - no attribute marks and no line breaks anywhere
//! - list elements additionally must not contain value marks (each element
//!   *is* one value)
//!
//! Subvalue marks are accepted and kept as already-formed value text.

use super::error::RecordError;
use super::record::{check_attribute_position, Attribute, Value, ATTRIBUTE_MARK, VALUE_MARK};
use std::collections::BTreeMap;

/// Replacement for one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeUpdate {
    /// The whole attribute content as one piece of text
    Scalar(String),
    /// One entry per value, joined with the value mark
    List(Vec<String>),
}

impl AttributeUpdate {
    /// Check the replacement text against the grammar
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Configuration` naming the offending position.
    pub fn validate(&self, position: usize) -> Result<(), RecordError> {
        match self {
            AttributeUpdate::Scalar(text) => check_text(position, text, false),
            AttributeUpdate::List(items) => items
                .iter()
                .try_for_each(|item| check_text(position, item, true)),
        }
    }

    /// Build the attribute this replacement stands for
    pub fn to_attribute(&self) -> Attribute {
        match self {
            AttributeUpdate::Scalar(text) => Attribute::from_values(vec![Value::from_text(text)]),
            AttributeUpdate::List(items) => {
                Attribute::from_values(items.iter().map(Value::from_text).collect())
            }
        }
    }
}

fn check_text(position: usize, text: &str, is_list_item: bool) -> Result<(), RecordError> {
    if text.contains(ATTRIBUTE_MARK) || text.contains(['\n', '\r']) {
        return Err(RecordError::configuration(format!(
            "replacement for attribute {} contains an attribute mark or line break",
            position
        )));
    }
    if is_list_item && text.contains(VALUE_MARK) {
        return Err(RecordError::configuration(format!(
            "list entry for attribute {} contains a value mark",
            position
        )));
    }
    Ok(())
}

/// Validated set of attribute replacements, ordered by position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: BTreeMap<usize, AttributeUpdate>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or overwrite) the replacement for a position
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Configuration` if the position is 0 or above
    /// `MAX_ATTRIBUTE_POSITION`, or the replacement text is malformed.
    pub fn insert(&mut self, position: usize, update: AttributeUpdate) -> Result<(), RecordError> {
        check_attribute_position(position)?;
        update.validate(position)?;
        self.entries.insert(position, update);
        Ok(())
    }

    /// Builder-style shorthand for a scalar replacement
    pub fn with_scalar(mut self, position: usize, text: &str) -> Result<Self, RecordError> {
        self.insert(position, AttributeUpdate::Scalar(text.to_string()))?;
        Ok(self)
    }

    /// Builder-style shorthand for a list replacement
    pub fn with_list(mut self, position: usize, items: &[&str]) -> Result<Self, RecordError> {
        let items = items.iter().map(|item| item.to_string()).collect();
        self.insert(position, AttributeUpdate::List(items))?;
        Ok(self)
    }

    pub fn get(&self, position: usize) -> Option<&AttributeUpdate> {
        self.entries.get(&position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &AttributeUpdate)> {
        self.entries.iter().map(|(position, update)| (*position, update))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
