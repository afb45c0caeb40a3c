//! Core trait for record storage
//!
//! The codec only needs to find a record's raw line by key and to replace
//! that line durably. Keeping this behind a trait lets an indexed store take
//! the place of the flat file without touching the codec.

use crate::types::RecordError;

/// Trait for locating and rewriting raw record lines by key
///
/// Implementations must serialise writers to the same backing file; readers
/// may observe the previous line until a write has committed.
pub trait RecordStore: Send + Sync {
    /// Return the raw line (without terminator) whose first field equals `key`
    fn locate(&self, key: &str) -> Result<String, RecordError>;

    /// Replace the line whose first field equals `key` with `line`
    fn write(&self, key: &str, line: &str) -> Result<(), RecordError>;

    /// Read-modify-write the line for `key` under the store's write lock
    ///
    /// `f` receives the current line and returns its replacement. Returns the
    /// line that was committed.
    fn modify<F>(&self, key: &str, f: F) -> Result<String, RecordError>
    where
        F: FnOnce(&str) -> Result<String, RecordError>;

    /// Every non-blank record line, in file order
    fn scan(&self) -> Result<Vec<String>, RecordError>;
}
