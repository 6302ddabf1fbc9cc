//! Relation role classification.

use eraser_core::{EraserConfig, RelationKind};

/// Role of a relation with respect to cascading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Points at a parent; never followed.
    Parent,
    /// Linked through a pivot; detached before the ordinary pass.
    ManyToMany,
    /// Owned by the source record; targets are deleted.
    Ordinary,
}

/// Classifies relation kinds against the configured kind sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationClassifier {
    parent: Vec<RelationKind>,
    many_to_many: Vec<RelationKind>,
}

impl RelationClassifier {
    /// Create a classifier from explicit kind sets.
    pub fn new(parent: Vec<RelationKind>, many_to_many: Vec<RelationKind>) -> Self {
        Self {
            parent,
            many_to_many,
        }
    }

    /// Create a classifier from the configured kind sets.
    pub fn from_config(config: &EraserConfig) -> Self {
        Self::new(
            config.parent_relations.clone(),
            config.many_to_many_relations.clone(),
        )
    }

    /// Classify a relation kind. Parent is checked first; default is Ordinary.
    pub fn classify(&self, kind: RelationKind) -> Classification {
        if self.parent.contains(&kind) {
            Classification::Parent
        } else if self.many_to_many.contains(&kind) {
            Classification::ManyToMany
        } else {
            Classification::Ordinary
        }
    }

    /// Shorthand for `classify(kind) == Parent`.
    pub fn is_parent(&self, kind: RelationKind) -> bool {
        self.classify(kind) == Classification::Parent
    }
}

impl Default for RelationClassifier {
    fn default() -> Self {
        Self::from_config(&EraserConfig::default())
    }
}
