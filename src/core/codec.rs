//! Codec orchestration
//!
//! `LegacyCodec` is the entire contact surface offered to the surrounding
//! (HTTP / database) layer:
//! - `read(key)`: the parsed record
//! - `project(key, options)`: the typed `ClientView`
//! - `update(key, attribute_map)`: replace attributes and write back
//!
//! # Data flow
//!
//! ```text
//! read:    store.locate(key) ─► parse_record ─► Record ─► extract / TypeProjector
//! update:  store.modify(key, |line| parse ─► apply map ─► serialize) ─► fresh Record
//! ```
//!
//! The update runs entirely inside the store's write lock, so two concurrent
//! updates of the same key are applied one after the other to the latest
//! line and neither change is lost.

use crate::core::delimiter::{join, parse_record, serialize_record};
use crate::core::projector::TypeProjector;
use crate::core::traits::RecordStore;
use crate::types::{
    AttributeMap, AttributeUpdate, ClientView, FieldSchema, ProjectionOptions, Record, RecordError,
    VALUE_MARK,
};
use tracing::debug;

/// Read / project / update orchestration over a record store
#[derive(Debug, Clone)]
pub struct LegacyCodec<S> {
    store: S,
    projector: TypeProjector,
}

impl<S: RecordStore> LegacyCodec<S> {
    /// Create a codec over `store` using `schema` for projection
    pub fn new(store: S, schema: FieldSchema) -> Self {
        Self {
            store,
            projector: TypeProjector::new(schema),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn schema(&self) -> &FieldSchema {
        self.projector.schema()
    }

    /// Read and parse the record stored under `key`
    ///
    /// # Errors
    ///
    /// * `RecordError::NotFound` - no line has this key
    /// * `RecordError::Io` - the data file could not be read
    pub fn read(&self, key: &str) -> Result<Record, RecordError> {
        let line = self.store.locate(key)?;
        Ok(parse_record(&line))
    }

    /// Read the record under `key` and extract one 1-based address from it
    pub fn extract(
        &self,
        key: &str,
        attribute: usize,
        value: Option<usize>,
        subvalue: Option<usize>,
    ) -> Result<String, RecordError> {
        self.read(key)?.extract(attribute, value, subvalue)
    }

    /// Read the record under `key` and project it into its typed view
    ///
    /// Bad numeric or date text never makes this fail; it is reported in the
    /// view as the original string.
    pub fn project(&self, key: &str, options: &ProjectionOptions) -> Result<ClientView, RecordError> {
        let record = self.read(key)?;
        Ok(self.projector.project(&record, options))
    }

    /// Project a record already in hand
    pub fn project_record(&self, record: &Record, options: &ProjectionOptions) -> ClientView {
        self.projector.project(record, options)
    }

    /// Project every record in the store, in file order
    pub fn project_all(&self, options: &ProjectionOptions) -> Result<Vec<ClientView>, RecordError> {
        Ok(self
            .store
            .scan()?
            .iter()
            .map(|line| self.projector.project(&parse_record(line), options))
            .collect())
    }

    /// Apply `attribute_map` to the record under `key` and write it back
    ///
    /// # Returns
    ///
    /// The record freshly parsed from the committed line. Any `Record` the
    /// caller read before this call is stale and must not be reused.
    ///
    /// # Errors
    ///
    /// * `RecordError::Configuration` - empty map, or a replacement that
    ///   would change the key
    /// * `RecordError::NotFound` - no line has this key
    /// * `RecordError::Io` - backup or rewrite failed (the file is unchanged)
    pub fn update(&self, key: &str, attribute_map: &AttributeMap) -> Result<Record, RecordError> {
        if attribute_map.is_empty() {
            return Err(RecordError::configuration("attribute map is empty"));
        }
        check_key_unchanged(key, attribute_map)?;

        let committed = self.store.modify(key, |line| {
            let mut record = parse_record(line);
            apply_updates(&mut record, attribute_map)?;
            Ok(serialize_record(&record))
        })?;
        debug!(key, attributes = attribute_map.len(), "update committed");

        Ok(parse_record(&committed))
    }
}

/// Apply every replacement in `attribute_map` to `record`
///
/// Positions past the end of the record extend it with empty attributes.
pub fn apply_updates(
    record: &mut Record,
    attribute_map: &AttributeMap,
) -> Result<(), RecordError> {
    for (position, update) in attribute_map.iter() {
        record.set_attribute(position, update.to_attribute())?;
    }
    Ok(())
}

fn check_key_unchanged(key: &str, attribute_map: &AttributeMap) -> Result<(), RecordError> {
    let new_key = match attribute_map.get(1) {
        None => return Ok(()),
        Some(AttributeUpdate::Scalar(text)) => text.clone(),
        Some(AttributeUpdate::List(items)) => join(items, VALUE_MARK),
    };
    if new_key != key {
        return Err(RecordError::configuration(format!(
            "attribute 1 holds the record key '{}' and cannot be changed to '{}'",
            key, new_key
        )));
    }
    Ok(())
}
