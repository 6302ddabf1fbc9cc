//! Relation metadata for Eraser.
//!
//! Record types describe their accessors with static `AccessorInfo` tables.
//! This replaces runtime reflection: auto-discovery reads the table to find
//! accessors that yield relations, and the classifier reads `RelationKind`
//! off the relation handles those accessors return.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a relation between two record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// One-to-one, this record owns the target: `User` has one `Profile`.
    HasOne,
    /// One-to-many, this record owns the targets: `User` has many `Post`s.
    HasMany,
    /// Polymorphic one-to-one owned by this record.
    MorphOne,
    /// Polymorphic one-to-many owned by this record.
    MorphMany,
    /// To-one pointing at the parent: `Post` belongs to `User`.
    BelongsTo,
    /// Polymorphic to-one pointing at the parent.
    MorphTo,
    /// Many-to-many through a pivot table.
    BelongsToMany,
    /// Polymorphic many-to-many through a pivot table.
    MorphToMany,
}

impl RelationKind {
    /// Every relation kind, in declaration order.
    pub const ALL: [RelationKind; 8] = [
        RelationKind::HasOne,
        RelationKind::HasMany,
        RelationKind::MorphOne,
        RelationKind::MorphMany,
        RelationKind::BelongsTo,
        RelationKind::MorphTo,
        RelationKind::BelongsToMany,
        RelationKind::MorphToMany,
    ];

    /// Canonical snake_case name (matches the serde representation).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RelationKind::HasOne => "has_one",
            RelationKind::HasMany => "has_many",
            RelationKind::MorphOne => "morph_one",
            RelationKind::MorphMany => "morph_many",
            RelationKind::BelongsTo => "belongs_to",
            RelationKind::MorphTo => "morph_to",
            RelationKind::BelongsToMany => "belongs_to_many",
            RelationKind::MorphToMany => "morph_to_many",
        }
    }

    /// Parse a relation kind (case-insensitive, `_` optional).
    ///
    /// Returns `None` if the string is not a recognized kind.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().replace('_', "") == normalized)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility of an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// Whether an accessor takes the record as receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Receiver {
    /// Called on a record instance.
    #[default]
    Instance,
    /// Associated function with no receiver.
    Static,
}

/// Declared return type of an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    /// No return type declared.
    Undeclared,
    /// A concrete relation type.
    Relation(RelationKind),
    /// The generic relation supertype (any kind).
    AnyRelation,
    /// A named non-relation type.
    Named(&'static str),
    /// A builtin scalar type (`int`, `string`, ...).
    Builtin(&'static str),
    /// A union of types.
    Union(&'static [&'static str]),
    /// An intersection of types.
    Intersection(&'static [&'static str]),
    /// The declared type could not be resolved by the store's introspection.
    Unresolvable(&'static str),
}

impl ReturnType {
    /// Whether this return type statically denotes a relation.
    #[must_use]
    pub const fn is_relation(&self) -> bool {
        matches!(self, ReturnType::Relation(_) | ReturnType::AnyRelation)
    }
}

/// Introspection metadata about one accessor on a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorInfo {
    /// Accessor name.
    pub name: &'static str,
    /// Declared return type.
    pub return_type: ReturnType,
    /// Visibility.
    pub visibility: Visibility,
    /// Instance or static.
    pub receiver: Receiver,
    /// Number of parameters besides the receiver.
    pub arity: u8,
    /// Declared on a parent type / helper rather than the record type itself.
    pub inherited: bool,
}

impl AccessorInfo {
    /// A public instance accessor with no parameters and the given return type.
    #[must_use]
    pub const fn new(name: &'static str, return_type: ReturnType) -> Self {
        Self {
            name,
            return_type,
            visibility: Visibility::Public,
            receiver: Receiver::Instance,
            arity: 0,
            inherited: false,
        }
    }

    /// A public zero-argument accessor declared to return `kind`.
    #[must_use]
    pub const fn relation(name: &'static str, kind: RelationKind) -> Self {
        Self::new(name, ReturnType::Relation(kind))
    }

    /// A public zero-argument accessor with no declared return type.
    #[must_use]
    pub const fn untyped(name: &'static str) -> Self {
        Self::new(name, ReturnType::Undeclared)
    }

    /// Set visibility.
    #[must_use]
    pub const fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark as a static (receiver-less) function.
    #[must_use]
    pub const fn static_fn(mut self) -> Self {
        self.receiver = Receiver::Static;
        self
    }

    /// Set the number of parameters.
    #[must_use]
    pub const fn arity(mut self, arity: u8) -> Self {
        self.arity = arity;
        self
    }

    /// Mark as inherited from a parent type.
    #[must_use]
    pub const fn inherited(mut self) -> Self {
        self.inherited = true;
        self
    }

    /// Public, instance, zero-argument, and declared on the type itself.
    #[must_use]
    pub const fn is_candidate(&self) -> bool {
        matches!(self.visibility, Visibility::Public)
            && matches!(self.receiver, Receiver::Instance)
            && self.arity == 0
            && !self.inherited
    }
}
