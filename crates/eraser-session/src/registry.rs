//! Per-cascade deduplication of visited records.
//!
//! Cyclic relation graphs would recurse forever and diamond-shaped ones would
//! be processed twice without this. The registry only grows during a cascade
//! and is reset when the cascade finishes.

use std::collections::HashSet;

use eraser_core::RecordIdentity;

/// Set of record identities already processed in the current cascade.
#[derive(Debug, Clone, Default)]
pub struct DeduplicationRegistry {
    /// Fast membership.
    seen: HashSet<RecordIdentity>,
    /// Visit order, for reporting.
    order: Vec<RecordIdentity>,
}

impl DeduplicationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an identity as visited.
    ///
    /// Returns `true` if it was not visited before.
    pub fn mark(&mut self, identity: &RecordIdentity) -> bool {
        if self.seen.contains(identity) {
            return false;
        }
        self.seen.insert(identity.clone());
        self.order.push(identity.clone());
        true
    }

    /// Whether an identity was already visited.
    #[must_use]
    pub fn contains(&self, identity: &RecordIdentity) -> bool {
        self.seen.contains(identity)
    }

    /// Visited identities in visit order.
    #[must_use]
    pub fn visited(&self) -> &[RecordIdentity] {
        &self.order
    }

    /// Number of visited identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nothing was visited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget every visited identity.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.order.clear();
    }
}
