//! The persistence contract: records, relation handles and resolved targets.
//!
//! The engine never constructs or destroys records on its own. It reads
//! identities, invokes accessors by name, and asks relation handles to
//! resolve, detach or bulk-delete. Every one of those calls may fail; the
//! engine decides which failures are isolated and which propagate.

use std::fmt;

use crate::config::RecordOverrides;
use crate::error::StoreError;
use crate::identity::RecordIdentity;
use crate::relationship::{AccessorInfo, RelationKind};
use crate::value::Value;

/// An addressable entity owned by the persistence layer.
pub trait Record {
    /// Stable `(type, primary key)` identity.
    fn identity(&self) -> RecordIdentity;

    /// Short type name, used for cache keys and log messages.
    fn record_type(&self) -> &'static str {
        self.identity().record_type()
    }

    /// Accessor table for this record type (what reflection would report).
    fn accessors(&self) -> &'static [AccessorInfo];

    /// Whether an accessor with this name exists on the record.
    fn has_accessor(&self, name: &str) -> bool {
        self.accessors().iter().any(|a| a.name == name)
    }

    /// Invoke a zero-argument accessor by name.
    fn invoke(&self, accessor: &str) -> Result<AccessorValue, StoreError>;

    /// Per-record settings that win over the global configuration.
    fn overrides(&self) -> RecordOverrides {
        RecordOverrides::default()
    }

    /// Remove this record's own row.
    ///
    /// This is the raw removal; cascading is the engine's job and happens
    /// before this is called.
    fn delete(&self) -> Result<(), StoreError>;
}

impl fmt::Debug for dyn Record + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Record").field(&self.identity()).finish()
    }
}

/// What invoking an accessor produced.
pub enum AccessorValue {
    /// A relation handle.
    Relation(Box<dyn Relation>),
    /// Anything else (a scalar attribute, a computed value, ...).
    Value(Value),
}

impl fmt::Debug for AccessorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessorValue::Relation(rel) => f
                .debug_tuple("Relation")
                .field(&rel.kind())
                .finish(),
            AccessorValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

/// A typed edge from a source record to zero or more targets.
pub trait Relation {
    /// Runtime kind of this relation.
    fn kind(&self) -> RelationKind;

    /// Resolve the current targets.
    fn results(&self) -> Result<Related, StoreError>;

    /// Remove pivot rows linking the source to the given target keys.
    ///
    /// Returns the number of pivot rows removed.
    fn detach(&self, keys: &[Value]) -> Result<u64, StoreError>;

    /// Delete every target row in one operation, without cascading.
    ///
    /// Returns the number of rows removed.
    fn bulk_delete(&self) -> Result<u64, StoreError>;
}

/// Resolved targets of a relation.
#[derive(Debug, Default)]
pub enum Related {
    /// Nothing related (a to-one relation with no target).
    #[default]
    None,
    /// A single target.
    One(Box<dyn Record>),
    /// A collection of targets (possibly empty).
    Many(Vec<Box<dyn Record>>),
}

impl Related {
    /// True when there is no target at all (not an empty collection).
    pub const fn is_none(&self) -> bool {
        matches!(self, Related::None)
    }

    /// Number of resolved targets.
    pub fn len(&self) -> usize {
        match self {
            Related::None => 0,
            Related::One(_) => 1,
            Related::Many(records) => records.len(),
        }
    }

    /// True when there are no targets, either null or an empty collection.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Primary keys of the resolved targets.
    pub fn keys(&self) -> Vec<Value> {
        match self {
            Related::None => Vec::new(),
            Related::One(record) => vec![record.identity().key().clone()],
            Related::Many(records) => records
                .iter()
                .map(|r| r.identity().key().clone())
                .collect(),
        }
    }

    /// Consume into a list of records.
    pub fn into_records(self) -> Vec<Box<dyn Record>> {
        match self {
            Related::None => Vec::new(),
            Related::One(record) => vec![record],
            Related::Many(records) => records,
        }
    }
}
