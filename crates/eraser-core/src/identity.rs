//! Record identity: the `(type, primary key)` pair the cascade deduplicates on.

use std::fmt;

use crate::value::Value;

/// Unique identity of a record within a store.
///
/// Two handles to the same row compare equal even when they are distinct
/// objects, which is what lets the cascade recognise cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordIdentity {
    /// Short type name of the record (e.g. `"User"`).
    record_type: &'static str,
    /// Primary key value.
    key: Value,
}

impl RecordIdentity {
    /// Create an identity from a type name and a primary key.
    pub fn new(record_type: &'static str, key: impl Into<Value>) -> Self {
        Self {
            record_type,
            key: key.into(),
        }
    }

    /// The record type name.
    pub const fn record_type(&self) -> &'static str {
        self.record_type
    }

    /// The primary key value.
    pub const fn key(&self) -> &Value {
        &self.key
    }
}

/// Formats as `Type:key`, the registry key form.
impl fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.record_type, self.key)
    }
}
