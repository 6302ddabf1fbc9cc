//! Eraser configuration.
//!
//! `EraserConfig` carries the process-wide defaults. `RecordOverrides` carries
//! the per-record values; any field set there wins over the global one.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::log::Logger;
use crate::relationship::RelationKind;

const ENV_ON_DELETE_START: &str = "ERASER_ON_DELETE_START";
const ENV_AUTO_DISCOVER: &str = "ERASER_AUTO_DISCOVER";
const ENV_LOGGING: &str = "ERASER_LOGGING";
const ENV_LOG_CHANNEL: &str = "ERASER_LOG_CHANNEL";

/// Global Eraser settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraserConfig {
    /// Start cascading when a record is being deleted.
    pub on_delete_start: bool,
    /// Discover relations automatically in auto mode.
    pub auto_discover: bool,
    /// Emit log events.
    pub logging: bool,
    /// Named log channel; `None` falls through to the fallback sink.
    pub log_channel: Option<String>,
    /// Accessor name patterns never cascaded (`name`, `prefix*`, `*suffix`).
    pub deny_list: Vec<String>,
    /// Relation kinds that point at a parent and are never followed.
    pub parent_relations: Vec<RelationKind>,
    /// Relation kinds that need pivot detach.
    pub many_to_many_relations: Vec<RelationKind>,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            on_delete_start: true,
            auto_discover: true,
            logging: true,
            log_channel: None,
            deny_list: [
                "get", "set", "update", "create", "save", "delete", "calc", "make", "send",
                "attach", "detach",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            parent_relations: vec![RelationKind::BelongsTo, RelationKind::MorphTo],
            many_to_many_relations: vec![RelationKind::BelongsToMany, RelationKind::MorphToMany],
        }
    }
}

impl EraserConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration document; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults overlaid with `ERASER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_ON_DELETE_START).as_deref().and_then(parse_bool) {
            config.on_delete_start = v;
        }
        if let Some(v) = lookup(ENV_AUTO_DISCOVER).as_deref().and_then(parse_bool) {
            config.auto_discover = v;
        }
        if let Some(v) = lookup(ENV_LOGGING).as_deref().and_then(parse_bool) {
            config.logging = v;
        }
        if let Some(channel) = lookup(ENV_LOG_CHANNEL) {
            let channel = channel.trim();
            if !channel.is_empty() {
                config.log_channel = Some(channel.to_string());
            }
        }

        config
    }

    /// Set the on-delete start flag.
    pub fn on_delete_start(mut self, value: bool) -> Self {
        self.on_delete_start = value;
        self
    }

    /// Set the auto-discover flag.
    pub fn auto_discover(mut self, value: bool) -> Self {
        self.auto_discover = value;
        self
    }

    /// Set the logging flag.
    pub fn logging(mut self, value: bool) -> Self {
        self.logging = value;
        self
    }

    /// Set the log channel name.
    pub fn log_channel(mut self, channel: impl Into<String>) -> Self {
        self.log_channel = Some(channel.into());
        self
    }

    /// Replace the deny list.
    pub fn deny_list<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny_list = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the parent relation kinds.
    pub fn parent_relations(mut self, kinds: impl Into<Vec<RelationKind>>) -> Self {
        self.parent_relations = kinds.into();
        self
    }

    /// Replace the many-to-many relation kinds.
    pub fn many_to_many_relations(mut self, kinds: impl Into<Vec<RelationKind>>) -> Self {
        self.many_to_many_relations = kinds.into();
        self
    }

    /// Validate the configuration.
    ///
    /// A kind listed as both parent and many-to-many is ambiguous.
    pub fn validate(&self) -> Result<()> {
        if let Some(kind) = self
            .parent_relations
            .iter()
            .find(|k| self.many_to_many_relations.contains(k))
        {
            return Err(Error::Config(format!(
                "relation kind '{}' is configured as both parent and many-to-many",
                kind
            )));
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Per-record Eraser settings.
///
/// Every field is optional; `None` defers to `EraserConfig`.
#[derive(Clone, Default)]
pub struct RecordOverrides {
    /// Cascade when this record is deleted.
    pub on_delete_start: Option<bool>,
    /// Auto-discover relations on this record.
    pub auto_discover: Option<bool>,
    /// Emit log events while cascading from this record.
    pub logging: Option<bool>,
    /// Logger used instead of the configured channel.
    pub logger: Option<Arc<dyn Logger>>,
    /// Deny list replacing the global one (no merge).
    pub deny_list: Option<Vec<String>>,
    /// Accessors whose targets are removed in a single bulk delete.
    pub bulk_delete: Vec<String>,
    /// Manual mode: accessors to cascade, in order.
    pub relations_to_delete: Option<Vec<String>>,
    /// Auto mode: untyped accessors known to yield relations.
    pub relation_methods: Option<Vec<String>>,
}

impl RecordOverrides {
    /// Empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the on-delete start flag.
    pub fn on_delete_start(mut self, value: bool) -> Self {
        self.on_delete_start = Some(value);
        self
    }

    /// Override the auto-discover flag.
    pub fn auto_discover(mut self, value: bool) -> Self {
        self.auto_discover = Some(value);
        self
    }

    /// Override the logging flag.
    pub fn logging(mut self, value: bool) -> Self {
        self.logging = Some(value);
        self
    }

    /// Use a specific logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Replace the deny list for this record.
    pub fn deny_list<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny_list = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the bulk-delete allowlist.
    pub fn bulk_delete<I, S>(mut self, accessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bulk_delete = accessors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the manual-mode relation list.
    pub fn relations_to_delete<I, S>(mut self, accessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relations_to_delete = Some(accessors.into_iter().map(Into::into).collect());
        self
    }

    /// Set the auto-mode untyped accessor whitelist.
    pub fn relation_methods<I, S>(mut self, accessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relation_methods = Some(accessors.into_iter().map(Into::into).collect());
        self
    }

    /// Effective on-delete start flag.
    pub fn can_start_on_delete(&self, config: &EraserConfig) -> bool {
        self.on_delete_start.unwrap_or(config.on_delete_start)
    }

    /// Effective auto-discover flag.
    pub fn can_auto_discover(&self, config: &EraserConfig) -> bool {
        self.auto_discover.unwrap_or(config.auto_discover)
    }

    /// Effective logging flag.
    pub fn can_log(&self, config: &EraserConfig) -> bool {
        self.logging.unwrap_or(config.logging)
    }

    /// Effective deny list.
    pub fn effective_deny_list<'a>(&'a self, config: &'a EraserConfig) -> &'a [String] {
        self.deny_list.as_deref().unwrap_or(&config.deny_list)
    }

    /// Whether an accessor is on the bulk-delete allowlist.
    pub fn must_bulk_delete(&self, accessor: &str) -> bool {
        self.bulk_delete.iter().any(|a| a == accessor)
    }
}

impl fmt::Debug for RecordOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordOverrides")
            .field("on_delete_start", &self.on_delete_start)
            .field("auto_discover", &self.auto_discover)
            .field("logging", &self.logging)
            .field("logger", &self.logger.as_ref().map(|_| "<logger>"))
            .field("deny_list", &self.deny_list)
            .field("bulk_delete", &self.bulk_delete)
            .field("relations_to_delete", &self.relations_to_delete)
            .field("relation_methods", &self.relation_methods)
            .finish()
    }
}
