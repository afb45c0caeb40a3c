//! Error types for the legacy record codec
//!
//! This module defines every failure that can surface from reading, projecting
//! or writing back a legacy dynamic-array record.
//!
//! # Error Categories
//!
//! - **NotFound**: the requested key is absent from the flat file
//! - **I/O**: backup or rewrite of the flat file failed
//! - **Configuration**: a caller handed us something invalid (projection option,
//!   `latest_balance` selector, non-positive position, malformed attribute map)
//!
//! Unparseable numeric or date text is *not* an error: the projector keeps
//! the original string and carries on.

use thiserror::Error;

/// Main error type for the codec and record store
///
/// The boundary layer matches on the variant to decide how to answer its own
/// caller, so the three categories stay distinct.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// No line in the backing file has this key as its first field
    #[error("Record not found: {key}")]
    NotFound {
        /// The key that was looked up
        key: String,
    },

    /// Backup, scan or rewrite of the backing file failed
    ///
    /// A failure while creating the backup happens before any mutation. A
    /// failure while rewriting leaves the previous file in place.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// Invalid input supplied by the caller
    #[error("Configuration error: {message}")]
    Configuration {
        /// What was wrong with the input
        message: String,
    },
}

impl From<std::io::Error> for RecordError {
    fn from(error: std::io::Error) -> Self {
        RecordError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for RecordError {
    fn from(error: csv::Error) -> Self {
        RecordError::Io {
            message: format!("CSV output failed: {}", error),
        }
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(error: serde_json::Error) -> Self {
        // Malformed JSON can only come from the caller; output serialization
        // of our own view types does not fail.
        RecordError::Configuration {
            message: format!("invalid JSON: {}", error),
        }
    }
}

// Helper functions for creating common errors

impl RecordError {
    /// Create a NotFound error
    pub fn not_found(key: &str) -> Self {
        RecordError::NotFound {
            key: key.to_string(),
        }
    }

    /// Create an Io error with context about the failed operation
    pub fn io(operation: &str, error: impl std::fmt::Display) -> Self {
        RecordError::Io {
            message: format!("{}: {}", operation, error),
        }
    }

    /// Create a Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        RecordError::Configuration {
            message: message.into(),
        }
    }

    /// Create a Configuration error for a non-positive position
    pub fn invalid_position(tier: &str, position: i64) -> Self {
        RecordError::Configuration {
            message: format!("{} position must be 1 or greater, got {}", tier, position),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordError::NotFound { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, RecordError::Configuration { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, RecordError::Io { .. })
    }
}
