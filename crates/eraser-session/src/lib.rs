//! Cascade traversal engine for Eraser.
//!
//! Given a root record, the engine walks the record's relations and removes or
//! detaches what hangs off it, recursing into every removed target. It is the
//! unit-of-work counterpart to a store's `delete`: the store removes one row,
//! the engine decides what else has to go first.
//!
//! # Design Philosophy
//!
//! - **Best effort, not all-or-nothing**: a failing relation or target is
//!   logged and counted; siblings keep going.
//! - **Explicit session state**: the dedup registry lives in a
//!   `CascadeSession` created per invocation and passed down the recursion.
//! - **Never climb**: parent-pointing relations are classified and skipped.
//! - **Discover once**: auto-discovery results are cached per record type for
//!   the process lifetime.
//!
//! # Example
//!
//! ```ignore
//! let executor = CascadeExecutor::new(EraserMode::Manual, config, channels);
//!
//! // Remove everything `user` owns, but keep `user` itself.
//! let report = executor.run(&user);
//! assert_eq!(report.delete_failures, 0);
//! ```

pub mod classifier;
pub mod denylist;
pub mod discovery;
pub mod executor;
pub mod mode;
pub mod registry;
pub mod session;
pub mod strategy;

pub use classifier::{Classification, RelationClassifier};
pub use denylist::Denylist;
pub use discovery::{RelationCache, RelationDiscoverer};
pub use executor::CascadeExecutor;
pub use mode::EraserMode;
pub use registry::DeduplicationRegistry;
pub use session::{CascadeReport, CascadeSession};
pub use strategy::DeletionStrategy;
