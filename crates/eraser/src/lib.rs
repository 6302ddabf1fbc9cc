//! Eraser: cascading relation cleanup for record graphs.
//!
//! When a record goes away, the records it owns usually have to go first.
//! Eraser walks a record's relations and removes or detaches what hangs off
//! it, following per-relation policy:
//!
//! - parent-pointing relations (`BelongsTo`, `MorphTo`) are never followed;
//! - many-to-many relations get their pivot rows detached;
//! - allowlisted relations are bulk-deleted in one operation;
//! - everything else is deleted record by record, recursing into each one.
//!
//! Cycles and diamonds are handled by a per-invocation dedup registry, and a
//! failure on one relation or target never stops its siblings.
//!
//! # Example
//!
//! ```ignore
//! use eraser::prelude::*;
//!
//! let eraser = Eraser::new();                 // manual mode
//! let report = eraser.clean(&user);           // user's relations only
//! eraser.delete(&user)?;                      // relations, then user
//!
//! let auto = Eraser::with_mode(EraserMode::Auto);
//! auto.clean(&user);                          // discovered relations
//! ```
//!
//! Stores implement [`Record`] and [`Relation`] from `eraser-core`. To get the
//! on-delete behaviour, call [`Eraser::deleting`] from the store's delete path
//! right before the row is removed.

pub mod eraser;
pub mod session;

pub use eraser::Eraser;
pub use eraser_core::{
    AccessorInfo, AccessorValue, EraserConfig, EraserLog, Error, LogChannels, LogError, LogLevel,
    Logger, Receiver, Record, RecordIdentity, RecordOverrides, Related, Relation, RelationKind,
    Result, ReturnType, StoreError, Value, Visibility,
};
pub use session::{
    CascadeExecutor, CascadeReport, CascadeSession, Classification, DeduplicationRegistry,
    Denylist, EraserMode, RelationCache, RelationClassifier, RelationDiscoverer,
};

/// Everything needed to wire a store up and run cascades.
pub mod prelude {
    pub use crate::eraser::Eraser;
    pub use eraser_core::{
        AccessorInfo, AccessorValue, EraserConfig, Error, LogChannels, LogError, LogLevel, Logger,
        Record, RecordIdentity, RecordOverrides, Related, Relation, RelationKind, ReturnType,
        StoreError, Value,
    };
    pub use eraser_session::{CascadeReport, EraserMode, RelationCache};
}
