//! Auto-discovery of relation accessors.
//!
//! A record type's accessor table is scanned once; the names of accessors that
//! qualify are cached per type for the lifetime of the process. The cache is
//! never invalidated, so a type's accessors are assumed to be static.
//!
//! An accessor qualifies when it is public, takes no arguments, has a
//! receiver, is declared on the type itself, and either
//!
//! - declares a relation return type, or
//! - declares no return type and is whitelisted via `relation_methods`.
//!
//! Unions, intersections, builtins and other named types never qualify.
//! Candidates whose type cannot be resolved are skipped, not fatal.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use eraser_core::{AccessorInfo, Record, RecordOverrides, ReturnType};

/// Process-wide cache: record type -> discovered accessor names.
#[derive(Debug, Default)]
pub struct RelationCache {
    entries: RwLock<HashMap<&'static str, Arc<[&'static str]>>>,
}

impl RelationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared process-wide cache.
    pub fn global() -> Arc<RelationCache> {
        static GLOBAL: OnceLock<Arc<RelationCache>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(RelationCache::new())))
    }

    /// Cached names for a record type, if discovered already.
    pub fn get(&self, record_type: &str) -> Option<Arc<[&'static str]>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(record_type)
            .cloned()
    }

    /// Return the cached names, computing them first if absent.
    ///
    /// `compute` runs at most once per record type.
    pub fn get_or_insert_with<F>(&self, record_type: &'static str, compute: F) -> Arc<[&'static str]>
    where
        F: FnOnce() -> Vec<&'static str>,
    {
        if let Some(names) = self.get(record_type) {
            return names;
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            entries
                .entry(record_type)
                .or_insert_with(|| Arc::from(compute())),
        )
    }

    /// Whether a record type has been discovered.
    pub fn contains(&self, record_type: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(record_type)
    }

    /// Number of discovered record types.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing has been discovered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Finds relation accessors on record types.
#[derive(Debug, Clone)]
pub struct RelationDiscoverer {
    cache: Arc<RelationCache>,
}

impl RelationDiscoverer {
    /// Create a discoverer backed by the given cache.
    pub fn new(cache: Arc<RelationCache>) -> Self {
        Self { cache }
    }

    /// The backing cache.
    pub fn cache(&self) -> &Arc<RelationCache> {
        &self.cache
    }

    /// Relation accessor names for the record's type, in declaration order.
    pub fn discover(&self, record: &dyn Record, overrides: &RecordOverrides) -> Arc<[&'static str]> {
        let record_type = record.record_type();
        self.cache.get_or_insert_with(record_type, || {
            let names = scan(record.accessors(), overrides.relation_methods.as_deref());
            tracing::debug!(
                target: "eraser::discovery",
                record_type = record_type,
                relations = names.len(),
                "Discovered relation accessors"
            );
            names
        })
    }
}

impl Default for RelationDiscoverer {
    fn default() -> Self {
        Self::new(RelationCache::global())
    }
}

/// Filter an accessor table down to relation accessor names.
pub fn scan(accessors: &[AccessorInfo], whitelist: Option<&[String]>) -> Vec<&'static str> {
    accessors
        .iter()
        .filter(|a| a.is_candidate() && returns_relation(a, whitelist))
        .map(|a| a.name)
        .collect()
}

fn returns_relation(accessor: &AccessorInfo, whitelist: Option<&[String]>) -> bool {
    match accessor.return_type {
        ReturnType::Relation(_) | ReturnType::AnyRelation => true,
        ReturnType::Undeclared => {
            whitelist.is_some_and(|names| names.iter().any(|n| n == accessor.name))
        }
        ReturnType::Union(_)
        | ReturnType::Intersection(_)
        | ReturnType::Builtin(_)
        | ReturnType::Named(_) => false,
        ReturnType::Unresolvable(reason) => {
            tracing::debug!(
                target: "eraser::discovery",
                accessor = accessor.name,
                reason = reason,
                "Skipping accessor with unresolvable return type"
            );
            false
        }
    }
}
