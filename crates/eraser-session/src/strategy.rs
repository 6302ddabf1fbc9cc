//! Per-relation deletion strategy.
//!
//! For one relation of one record:
//!
//! 1. many-to-many: detach the pivot rows of the currently related keys;
//! 2. resolve the targets again; a null or empty result means nothing to do;
//! 3. bulk-allowlisted accessor: one bulk delete, no recursion;
//! 4. otherwise: cascade into each target, then delete it, one by one.
//!
//! Step 2 runs after a detach too. With the pivot rows gone the relation
//! usually resolves to an empty collection, so detached targets survive and
//! no bulk delete is issued for them.

use eraser_core::{Record, RecordOverrides, Related, Relation};

use crate::classifier::Classification;
use crate::executor::CascadeExecutor;
use crate::session::CascadeSession;

/// Executes the deletion policy for a single relation.
#[derive(Debug, Clone, Copy)]
pub struct DeletionStrategy<'e> {
    executor: &'e CascadeExecutor,
}

impl<'e> DeletionStrategy<'e> {
    /// Create a strategy that recurses through `executor`.
    pub fn new(executor: &'e CascadeExecutor) -> Self {
        Self { executor }
    }

    /// Apply the strategy to `relation`, reached through `accessor` on a record
    /// whose settings are `source`.
    pub fn execute(
        &self,
        session: &mut CascadeSession<'_>,
        source: &RecordOverrides,
        relation: &dyn Relation,
        accessor: &str,
        classification: Classification,
    ) {
        match classification {
            Classification::Parent => {
                tracing::debug!(accessor = accessor, "Refusing to cascade into a parent relation");
                return;
            }
            Classification::ManyToMany => self.detach(session, relation, accessor),
            Classification::Ordinary => {}
        }

        let related = match relation.results() {
            Ok(related) => related,
            Err(e) => {
                session
                    .log()
                    .error(&format!("No results for ({}): {}", accessor, e));
                session.report_mut().delete_failures += 1;
                return;
            }
        };

        if related.is_empty() {
            session
                .log()
                .info(&format!("No related models found for {}", accessor));
            return;
        }

        if source.must_bulk_delete(accessor) {
            self.bulk_delete(session, relation, accessor);
            return;
        }

        for target in related.into_records() {
            self.delete_target(session, target.as_ref());
        }
    }

    fn detach(&self, session: &mut CascadeSession<'_>, relation: &dyn Relation, accessor: &str) {
        let keys = match relation.results().map(|related: Related| related.keys()) {
            Ok(keys) => keys,
            Err(e) => {
                session
                    .log()
                    .error(&format!("failed to detach ({}): {}", accessor, e));
                session.report_mut().delete_failures += 1;
                return;
            }
        };

        if keys.is_empty() {
            session.log().info(&format!("No results for {}", accessor));
            return;
        }

        match relation.detach(&keys) {
            Ok(rows) => {
                session.report_mut().pivots_detached += rows;
                session
                    .log()
                    .info(&format!("Detached relation: {}", accessor));
            }
            Err(e) => {
                session
                    .log()
                    .error(&format!("failed to detach ({}): {}", accessor, e));
                session.report_mut().delete_failures += 1;
            }
        }
    }

    fn bulk_delete(&self, session: &mut CascadeSession<'_>, relation: &dyn Relation, accessor: &str) {
        match relation.bulk_delete() {
            Ok(rows) => {
                let report = session.report_mut();
                report.bulk_deletes += 1;
                report.rows_deleted += rows;
                session.log().info(&format!(
                    "Bulk deleted {} rows for relation '{}'",
                    rows, accessor
                ));
            }
            Err(e) => {
                session
                    .log()
                    .error(&format!("Bulk delete failed ({}): {}", accessor, e));
                session.report_mut().delete_failures += 1;
            }
        }
    }

    /// Cascade into one target (when its settings allow), then remove it.
    fn delete_target(&self, session: &mut CascadeSession<'_>, target: &dyn Record) {
        let identity = target.identity();

        if session.is_visited(&identity) {
            session
                .log()
                .info(&format!("Skipping already processed {}", identity));
            session.report_mut().duplicates_skipped += 1;
            return;
        }

        if self.executor.can_start_on_delete(target) {
            self.executor.cascade(session, target);
        } else {
            session.mark_visited(&identity);
        }

        match target.delete() {
            Ok(()) => session.report_mut().rows_deleted += 1,
            Err(e) => {
                session.log().error(&format!(
                    "Error Delete ({}): {}",
                    identity.record_type(),
                    e
                ));
                session.report_mut().delete_failures += 1;
            }
        }
    }
}
