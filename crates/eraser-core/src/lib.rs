//! Core types and traits for Eraser.
//!
//! `eraser-core` is the **contract layer** between the cascade engine and the
//! persistence layer that owns the records. Nothing in here deletes anything by
//! itself; it only describes what the engine needs to ask of a store.
//!
//! # Role In The Architecture
//!
//! - **Persistence contract**: `Record` and `Relation` are implemented by the
//!   store (or the ORM adapter) and consumed by `eraser-session`.
//! - **Introspection metadata**: `AccessorInfo` describes a record type's
//!   accessors the way a reflection API would, so auto-discovery can work
//!   without runtime reflection.
//! - **Settings**: `EraserConfig` holds process-wide defaults and
//!   `RecordOverrides` holds the per-record values that win over them.
//! - **Logging port**: `EraserLog` resolves a record logger override, a named
//!   channel, or the `tracing` fallback sink.
//!
//! Most applications should use the `eraser` facade; reach for `eraser-core`
//! directly when writing a store adapter.

pub mod config;
pub mod error;
pub mod identity;
pub mod log;
pub mod record;
pub mod relationship;
pub mod value;

pub use config::{EraserConfig, RecordOverrides};
pub use error::{Error, LogError, Result, StoreError};
pub use identity::RecordIdentity;
pub use log::{EraserLog, LogChannels, LogLevel, Logger};
pub use record::{AccessorValue, Record, Related, Relation};
pub use relationship::{AccessorInfo, Receiver, RelationKind, ReturnType, Visibility};
pub use value::Value;
