//! The `Eraser` facade.

use std::sync::Arc;

use eraser_core::{EraserConfig, Error, LogChannels, Record, Result};
use eraser_session::{CascadeExecutor, CascadeReport, EraserMode, RelationCache};

/// Entry point for cleaning and deleting records with their relations.
///
/// Cheap to clone; configuration, channels and the relation cache are shared.
#[derive(Debug, Clone)]
pub struct Eraser {
    executor: CascadeExecutor,
}

impl Eraser {
    /// Manual mode with default configuration.
    pub fn new() -> Self {
        Self::with_mode(EraserMode::default())
    }

    /// The given mode with default configuration.
    pub fn with_mode(mode: EraserMode) -> Self {
        Self::build(mode, Arc::new(EraserConfig::default()), Arc::new(LogChannels::new()))
    }

    /// Manual mode with a custom configuration.
    ///
    /// Fails if the configuration is inconsistent.
    pub fn with_config(config: EraserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(
            EraserMode::default(),
            Arc::new(config),
            Arc::new(LogChannels::new()),
        ))
    }

    /// Manual mode configured from `ERASER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::with_config(EraserConfig::from_env())
    }

    fn build(mode: EraserMode, config: Arc<EraserConfig>, channels: Arc<LogChannels>) -> Self {
        Self {
            executor: CascadeExecutor::new(mode, config, channels),
        }
    }

    fn rebuild(&mut self, mode: EraserMode, channels: Arc<LogChannels>) {
        let cache = Arc::clone(self.executor.discoverer().cache());
        let config = Arc::new(self.executor.config().clone());
        self.executor = CascadeExecutor::new(mode, config, channels).with_cache(cache);
    }

    /// Current mode.
    pub fn mode(&self) -> EraserMode {
        self.executor.mode()
    }

    /// Switch mode by name (`"manual"` or `"auto"`).
    pub fn set_mode(&mut self, mode: &str) -> Result<&mut Self> {
        let mode: EraserMode = mode.parse()?;
        let channels = Arc::new(self.executor.channels().clone());
        self.rebuild(mode, channels);
        Ok(self)
    }

    /// Builder-style mode switch by name.
    pub fn mode_str(mut self, mode: &str) -> Result<Self> {
        self.set_mode(mode)?;
        Ok(self)
    }

    /// Use these named log channels.
    pub fn with_channels(mut self, channels: LogChannels) -> Self {
        let mode = self.mode();
        self.rebuild(mode, Arc::new(channels));
        self
    }

    /// Use a specific relation cache instead of the process-wide one.
    pub fn with_cache(mut self, cache: Arc<RelationCache>) -> Self {
        self.executor = self.executor.with_cache(cache);
        self
    }

    /// Global configuration.
    pub fn config(&self) -> &EraserConfig {
        self.executor.config()
    }

    /// The underlying executor.
    pub fn executor(&self) -> &CascadeExecutor {
        &self.executor
    }

    /// Remove or detach `record`'s relations; `record` itself stays.
    pub fn clean(&self, record: &dyn Record) -> CascadeReport {
        self.executor.run(record)
    }

    /// Clean `record`, then delete it.
    ///
    /// Relation failures never block the root deletion; the root deletion's
    /// own failure is returned.
    pub fn delete(&self, record: &dyn Record) -> Result<CascadeReport> {
        let report = self.clean(record);
        record.delete().map_err(Error::from)?;
        Ok(report)
    }

    /// Lifecycle hook for stores: call right before removing `record`'s row.
    ///
    /// Cascades only when the record's (or the global) `on_delete_start`
    /// allows it; returns `None` otherwise.
    pub fn deleting(&self, record: &dyn Record) -> Option<CascadeReport> {
        if !self.executor.can_start_on_delete(record) {
            tracing::debug!(
                target: "eraser",
                record = %record.identity(),
                "On-delete cascade disabled"
            );
            return None;
        }
        Some(self.clean(record))
    }
}

impl Default for Eraser {
    fn default() -> Self {
        Self::new()
    }
}

impl From<EraserMode> for Eraser {
    fn from(mode: EraserMode) -> Self {
        Self::with_mode(mode)
    }
}
