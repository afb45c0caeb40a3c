//! Dynamic-array record types
//!
//! A record is one line of the flat file, modelled as a three-tier hierarchy:
//! attributes, each holding values, each holding subvalues. Positions are
//! 1-based everywhere in the public API, following the legacy convention.
//!
//! Every tier always holds at least one element: splitting text that contains
//! no separator yields one (possibly empty) element, never zero. Empty strings
//! are data, not absence.

use super::error::RecordError;
use serde::Serialize;

/// Attribute Mark: separates the attributes of a record
pub const ATTRIBUTE_MARK: char = '^';

/// Value Mark: separates the values of an attribute
pub const VALUE_MARK: char = ']';

/// Subvalue Mark: separates the subvalues of a value
pub const SUBVALUE_MARK: char = '\\';

/// Highest attribute position an update may write
///
/// Writing past the end of a record pads it with empty attributes, so the
/// position bounds how far one update can grow a line.
pub const MAX_ATTRIBUTE_POSITION: usize = 10_000;

/// One value of an attribute, holding one or more subvalues
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Value {
    subvalues: Vec<String>,
}

impl Value {
    /// Build a value from already-split subvalues
    ///
    /// An empty list is normalised to a single empty subvalue so the
    /// non-empty invariant holds.
    pub fn from_subvalues(subvalues: Vec<String>) -> Self {
        if subvalues.is_empty() {
            return Self::from_text("");
        }
        Self { subvalues }
    }

    /// Build a value holding `text` verbatim as its only subvalue
    ///
    /// No splitting happens here, so caller text containing subvalue marks
    /// is written back exactly as given.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            subvalues: vec![text.into()],
        }
    }

    pub fn subvalues(&self) -> &[String] {
        &self.subvalues
    }

    /// Subvalue at a 1-based position
    pub fn subvalue(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.subvalues.get(index))
            .map(String::as_str)
    }
}

/// One attribute of a record, holding one or more values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attribute {
    values: Vec<Value>,
}

impl Attribute {
    pub fn from_values(values: Vec<Value>) -> Self {
        if values.is_empty() {
            return Self::empty();
        }
        Self { values }
    }

    /// An attribute holding a single empty value
    pub fn empty() -> Self {
        Self {
            values: vec![Value::from_text("")],
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value at a 1-based position
    pub fn value(&self, position: usize) -> Option<&Value> {
        position
            .checked_sub(1)
            .and_then(|index| self.values.get(index))
    }
}

/// A parsed dynamic-array record
///
/// Attribute 1 holds the record key by convention. Records are short-lived:
/// one is built per read, mutated in place by an update, and replaced by a
/// freshly parsed record once the update has been written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    attributes: Vec<Attribute>,
}

impl Record {
    pub fn from_attributes(attributes: Vec<Attribute>) -> Self {
        if attributes.is_empty() {
            return Self {
                attributes: vec![Attribute::empty()],
            };
        }
        Self { attributes }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Attribute at a 1-based position
    pub fn attribute(&self, position: usize) -> Option<&Attribute> {
        position
            .checked_sub(1)
            .and_then(|index| self.attributes.get(index))
    }

    /// The record key: the raw text of attribute 1
    pub fn key(&self) -> String {
        self.attributes
            .first()
            .map(crate::core::delimiter::serialize_attribute)
            .unwrap_or_default()
    }

    /// Replace the attribute at a 1-based position
    ///
    /// Positions past the end extend the record with empty attributes first.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Configuration` if the position is 0 or above
    /// `MAX_ATTRIBUTE_POSITION`; the record is left unchanged.
    pub fn set_attribute(
        &mut self,
        position: usize,
        attribute: Attribute,
    ) -> Result<(), RecordError> {
        check_attribute_position(position)?;
        let index = position - 1;
        if index >= self.attributes.len() {
            self.attributes.resize(index + 1, Attribute::empty());
        }
        self.attributes[index] = attribute;
        Ok(())
    }
}

/// Check that `position` is a writable attribute position
///
/// # Errors
///
/// Returns `RecordError::Configuration` for 0 or anything above
/// `MAX_ATTRIBUTE_POSITION`.
pub fn check_attribute_position(position: usize) -> Result<(), RecordError> {
    if position == 0 {
        return Err(RecordError::invalid_position("attribute", 0));
    }
    if position > MAX_ATTRIBUTE_POSITION {
        return Err(RecordError::configuration(format!(
            "attribute position {} exceeds the maximum of {}",
            position, MAX_ATTRIBUTE_POSITION
        )));
    }
    Ok(())
}
