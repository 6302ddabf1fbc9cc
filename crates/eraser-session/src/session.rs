//! Per-invocation cascade state.

use eraser_core::{EraserLog, RecordIdentity};

use crate::registry::DeduplicationRegistry;

/// Counters collected while a cascade runs.
///
/// Reporting is additive: callers may ignore it, logging stays the primary
/// observable side effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Records cascaded from, in visit order (root first).
    pub visited: Vec<RecordIdentity>,
    /// Records reached again and skipped.
    pub duplicates_skipped: usize,
    /// Relations handed to the deletion strategy.
    pub relations_processed: usize,
    /// Relations skipped on purpose (parent, denied).
    pub relations_skipped: usize,
    /// Relations that could not be resolved (missing, not a relation, error).
    pub relations_failed: usize,
    /// Pivot rows removed.
    pub pivots_detached: u64,
    /// Target rows removed, individually or in bulk.
    pub rows_deleted: u64,
    /// Bulk delete operations issued.
    pub bulk_deletes: usize,
    /// Detach, resolve, bulk or per-target delete operations that failed.
    pub delete_failures: usize,
}

impl CascadeReport {
    /// Whether any operation failed during the cascade.
    pub fn has_failures(&self) -> bool {
        self.relations_failed > 0 || self.delete_failures > 0
    }
}

/// Ephemeral state for one top-level `clean`/`delete` invocation.
///
/// Holds the deduplication registry and the logging context bound to the
/// root record. Dropped (or reset) when the invocation ends.
#[derive(Debug)]
pub struct CascadeSession<'a> {
    root: RecordIdentity,
    registry: DeduplicationRegistry,
    log: EraserLog<'a>,
    report: CascadeReport,
}

impl<'a> CascadeSession<'a> {
    /// Start a session for a root record.
    pub fn new(root: RecordIdentity, log: EraserLog<'a>) -> Self {
        Self {
            root,
            registry: DeduplicationRegistry::new(),
            log,
            report: CascadeReport::default(),
        }
    }

    /// Identity of the root record.
    pub fn root(&self) -> &RecordIdentity {
        &self.root
    }

    /// Logging context.
    pub fn log(&self) -> &EraserLog<'a> {
        &self.log
    }

    /// Dedup registry.
    pub fn registry(&self) -> &DeduplicationRegistry {
        &self.registry
    }

    /// Mark a record as visited; `false` if it already was.
    pub fn mark_visited(&mut self, identity: &RecordIdentity) -> bool {
        self.registry.mark(identity)
    }

    /// Whether a record was already visited.
    pub fn is_visited(&self, identity: &RecordIdentity) -> bool {
        self.registry.contains(identity)
    }

    /// Counters so far.
    pub fn report(&self) -> &CascadeReport {
        &self.report
    }

    pub(crate) fn report_mut(&mut self) -> &mut CascadeReport {
        &mut self.report
    }

    /// Clear the registry and counters so the session can be reused.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.report = CascadeReport::default();
    }

    /// End the session: collect the report and reset the registry.
    pub fn finish(&mut self) -> CascadeReport {
        let mut report = std::mem::take(&mut self.report);
        report.visited = self.registry.visited().to_vec();
        self.registry.reset();
        report
    }
}
