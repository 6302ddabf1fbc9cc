//! Cascade engine re-exports.
//!
//! The traversal engine lives in the separate `eraser-session` crate. This
//! module exists so the `eraser` facade can expose it without forcing users
//! to depend on sub-crates directly.

pub use eraser_session::{
    CascadeExecutor, CascadeReport, CascadeSession, Classification, DeduplicationRegistry,
    DeletionStrategy, Denylist, EraserMode, RelationCache, RelationClassifier, RelationDiscoverer,
};
