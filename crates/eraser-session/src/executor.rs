//! The cascade traversal engine.
//!
//! `CascadeExecutor::cascade` is a depth-first walk:
//!
//! ```text
//! start(record) -> visited? --yes--> done
//!                     |no
//!                   mark -> resolve names -> for each name:
//!                                              denied?      -> skip
//!                                              invoke       -> error? log, next
//!                                              classify     -> parent? skip
//!                                              strategy     -> may recurse into start(target)
//! ```
//!
//! No per-relation failure aborts the walk. The only errors a caller sees come
//! from configuration (at construction) and the root record's own deletion
//! (in the facade).

use std::sync::Arc;

use eraser_core::{
    AccessorValue, EraserConfig, EraserLog, Error, LogChannels, Record, RecordOverrides,
};

use crate::classifier::{Classification, RelationClassifier};
use crate::denylist::Denylist;
use crate::discovery::{RelationCache, RelationDiscoverer};
use crate::mode::EraserMode;
use crate::session::{CascadeReport, CascadeSession};
use crate::strategy::DeletionStrategy;

/// Walks a record's relations and removes what it owns.
#[derive(Debug, Clone)]
pub struct CascadeExecutor {
    mode: EraserMode,
    config: Arc<EraserConfig>,
    channels: Arc<LogChannels>,
    classifier: RelationClassifier,
    discoverer: RelationDiscoverer,
    denylist: Denylist,
}

impl CascadeExecutor {
    /// Create an executor using the process-wide relation cache.
    pub fn new(mode: EraserMode, config: Arc<EraserConfig>, channels: Arc<LogChannels>) -> Self {
        let classifier = RelationClassifier::from_config(&config);
        let denylist = Denylist::new(&config.deny_list);
        Self {
            mode,
            config,
            channels,
            classifier,
            discoverer: RelationDiscoverer::default(),
            denylist,
        }
    }

    /// Use a specific relation cache instead of the process-wide one.
    pub fn with_cache(mut self, cache: Arc<RelationCache>) -> Self {
        self.discoverer = RelationDiscoverer::new(cache);
        self
    }

    /// Cascade mode.
    pub fn mode(&self) -> EraserMode {
        self.mode
    }

    /// Global configuration.
    pub fn config(&self) -> &EraserConfig {
        &self.config
    }

    /// Registered log channels.
    pub fn channels(&self) -> &LogChannels {
        &self.channels
    }

    /// Relation classifier.
    pub fn classifier(&self) -> &RelationClassifier {
        &self.classifier
    }

    /// Relation discoverer.
    pub fn discoverer(&self) -> &RelationDiscoverer {
        &self.discoverer
    }

    /// The global denylist, compiled once from the configuration.
    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    /// Whether deleting `record` should cascade first.
    pub fn can_start_on_delete(&self, record: &dyn Record) -> bool {
        record.overrides().can_start_on_delete(&self.config)
    }

    /// Open a session whose logging is bound to `root`.
    pub fn session(&self, root: &dyn Record) -> CascadeSession<'_> {
        let log = EraserLog::bind(&self.config, &self.channels, &root.overrides());
        CascadeSession::new(root.identity(), log)
    }

    /// Run a complete cascade from `root` without deleting `root` itself.
    #[tracing::instrument(level = "debug", skip(self, root), fields(mode = %self.mode, root = %root.identity()))]
    pub fn run(&self, root: &dyn Record) -> CascadeReport {
        let mut session = self.session(root);
        self.cascade(&mut session, root);
        session.finish()
    }

    /// Cascade from `record` within an existing session.
    pub fn cascade(&self, session: &mut CascadeSession<'_>, record: &dyn Record) {
        let identity = record.identity();
        if !session.mark_visited(&identity) {
            session
                .log()
                .info(&format!("Skipping already processed {}", identity));
            session.report_mut().duplicates_skipped += 1;
            return;
        }

        session.log().info(&format!(
            "Processing: {}[{}]",
            identity.record_type(),
            identity.key()
        ));

        let overrides = record.overrides();
        let Some(names) = self.resolve_names(session, record, &overrides) else {
            return;
        };

        // Only a record-level list needs compiling here.
        let record_denylist;
        let denylist = match &overrides.deny_list {
            Some(patterns) => {
                record_denylist = Denylist::new(patterns);
                &record_denylist
            }
            None => &self.denylist,
        };
        for name in &names {
            self.process_relation(session, record, &overrides, &denylist, name);
        }
    }

    /// Relation names to walk for `record`, or `None` when the record opts out.
    fn resolve_names(
        &self,
        session: &CascadeSession<'_>,
        record: &dyn Record,
        overrides: &RecordOverrides,
    ) -> Option<Vec<String>> {
        match self.mode {
            EraserMode::Manual => match &overrides.relations_to_delete {
                Some(names) if !names.is_empty() => Some(names.clone()),
                _ => {
                    session.log().warning(&format!(
                        "Missing 'relations_to_delete' on {}",
                        record.record_type()
                    ));
                    None
                }
            },
            EraserMode::Auto => {
                if !overrides.can_auto_discover(&self.config) {
                    session.log().error(&format!(
                        "Auto-discover is disabled for {}",
                        record.record_type()
                    ));
                    return None;
                }
                let names = self.discoverer.discover(record, overrides);
                Some(names.iter().map(|n| (*n).to_string()).collect())
            }
        }
    }

    fn process_relation(
        &self,
        session: &mut CascadeSession<'_>,
        record: &dyn Record,
        overrides: &RecordOverrides,
        denylist: &Denylist,
        name: &str,
    ) {
        if denylist.is_denied(name) {
            session
                .log()
                .info(&format!("Skipping denied relation '{}'", name));
            session.report_mut().relations_skipped += 1;
            return;
        }

        if !record.has_accessor(name) {
            let err = Error::MissingAccessor {
                record: record.record_type(),
                accessor: name.to_string(),
            };
            session.log().error(&err.to_string());
            session.report_mut().relations_failed += 1;
            return;
        }

        let relation = match record.invoke(name) {
            Ok(AccessorValue::Relation(relation)) => relation,
            Ok(AccessorValue::Value(_)) => {
                let err = Error::NotARelation {
                    record: record.record_type(),
                    accessor: name.to_string(),
                };
                session.log().warning(&err.to_string());
                session.report_mut().relations_failed += 1;
                return;
            }
            Err(e) => {
                session
                    .log()
                    .error(&format!("Error invoking relation '{}': {}", name, e));
                session.report_mut().relations_failed += 1;
                return;
            }
        };

        let classification = self.classifier.classify(relation.kind());
        if classification == Classification::Parent {
            session
                .log()
                .info(&format!("Skipping parent relation '{}'", name));
            session.report_mut().relations_skipped += 1;
            return;
        }

        session
            .log()
            .info(&format!("Processing relation '{}'", name));
        DeletionStrategy::new(self).execute(
            session,
            overrides,
            relation.as_ref(),
            name,
            classification,
        );
        session.report_mut().relations_processed += 1;
        session
            .log()
            .info(&format!("Relation '{}' processed", name));
    }
}
