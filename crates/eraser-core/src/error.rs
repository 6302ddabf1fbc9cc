//! Error types for Eraser.
//!
//! Only configuration errors and the root record's own deletion failure ever
//! reach a caller. Everything raised while walking relations is logged and
//! counted, never propagated.

use std::error::Error as StdError;
use std::fmt;

/// Failure reported by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// Operation that failed (`"delete"`, `"detach"`, `"results"`, ...).
    pub operation: &'static str,
    /// Store-provided message.
    pub message: String,
}

impl StoreError {
    /// Create a store error for an operation.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.message)
    }
}

impl StdError for StoreError {}

/// Failure raised by a logger sink.
///
/// Sink failures are reported through the fallback sink and never become an
/// [`Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogError(pub String);

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for LogError {}

/// Errors produced by Eraser.
#[derive(Debug)]
pub enum Error {
    /// Invalid mode or configuration; surfaced to the caller.
    Config(String),
    /// Manual mode named an accessor the record does not have.
    MissingAccessor {
        record: &'static str,
        accessor: String,
    },
    /// The accessor exists but did not yield a relation.
    NotARelation {
        record: &'static str,
        accessor: String,
    },
    /// The persistence layer failed.
    Store(StoreError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => f.write_str(msg),
            Error::MissingAccessor { record, accessor } => {
                write!(f, "Relation '{}' not found on {}", accessor, record)
            }
            Error::NotARelation { accessor, .. } => {
                write!(f, "Method '{}' did not return a Relation", accessor)
            }
            Error::Store(err) => write!(f, "{}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Store(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(format!("invalid eraser configuration: {}", err))
    }
}

/// Result alias used across the Eraser crates.
pub type Result<T> = std::result::Result<T, Error>;
