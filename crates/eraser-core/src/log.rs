//! Logging port for Eraser.
//!
//! The engine never talks to a sink directly. It goes through `EraserLog`,
//! which resolves, in order:
//!
//! 1. the record's logger override,
//! 2. the channel named by `EraserConfig::log_channel`,
//! 3. the fallback sink, a `tracing` event with target `eraser`.
//!
//! Sink failures are swallowed: they are reported through the fallback sink
//! and the message continues down the chain. Logging never fails a cascade.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::{EraserConfig, RecordOverrides};
use crate::error::LogError;

/// Severity levels, PSR-3 style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl LogLevel {
    /// Lowercase level name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Notice => "notice",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
            LogLevel::Alert => "alert",
            LogLevel::Emergency => "emergency",
        }
    }

    /// Parse a level name (case-insensitive).
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "notice" => Some(LogLevel::Notice),
            "warning" | "warn" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            "critical" => Some(LogLevel::Critical),
            "alert" => Some(LogLevel::Alert),
            "emergency" => Some(LogLevel::Emergency),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A log sink.
pub trait Logger: Send + Sync {
    /// Write one message.
    fn log(&self, level: LogLevel, message: &str) -> Result<(), LogError>;
}

impl<F> Logger for F
where
    F: Fn(LogLevel, &str) -> Result<(), LogError> + Send + Sync,
{
    fn log(&self, level: LogLevel, message: &str) -> Result<(), LogError> {
        self(level, message)
    }
}

/// Named log channels the configuration can refer to.
#[derive(Clone, Default)]
pub struct LogChannels {
    channels: HashMap<String, Arc<dyn Logger>>,
}

impl LogChannels {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a channel.
    pub fn register(&mut self, name: impl Into<String>, logger: Arc<dyn Logger>) {
        self.channels.insert(name.into(), logger);
    }

    /// Builder-style `register`.
    pub fn with_channel(mut self, name: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        self.register(name, logger);
        self
    }

    /// Look up a channel by name.
    pub fn channel(&self, name: &str) -> Result<&Arc<dyn Logger>, LogError> {
        self.channels
            .get(name)
            .ok_or_else(|| LogError(format!("log channel [{}] is not defined", name)))
    }

    /// Number of registered channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True when no channel is registered.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl fmt::Debug for LogChannels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.channels.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("LogChannels").field("channels", &names).finish()
    }
}

/// Logging context bound to the root record of one cascade.
#[derive(Clone)]
pub struct EraserLog<'a> {
    enabled: bool,
    logger: Option<Arc<dyn Logger>>,
    channel: Option<&'a str>,
    channels: &'a LogChannels,
}

impl<'a> EraserLog<'a> {
    /// Bind the logging port to a record's overrides.
    pub fn bind(
        config: &'a EraserConfig,
        channels: &'a LogChannels,
        overrides: &RecordOverrides,
    ) -> Self {
        Self {
            enabled: overrides.can_log(config),
            logger: overrides.logger.clone(),
            channel: config.log_channel.as_deref().filter(|c| !c.is_empty()),
            channels,
        }
    }

    /// Whether anything will be emitted.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Emit a message.
    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled {
            return;
        }

        if let Some(logger) = &self.logger {
            match logger.log(level, message) {
                Ok(()) => return,
                Err(e) => fallback(
                    LogLevel::Error,
                    &format!("Eraser: logger override failed: {}", e),
                ),
            }
        }

        if let Some(name) = self.channel {
            match self
                .channels
                .channel(name)
                .and_then(|logger| logger.log(level, message))
            {
                Ok(()) => return,
                Err(e) => fallback(
                    LogLevel::Error,
                    &format!("Eraser: resolving log channel failed: {}", e),
                ),
            }
        }

        fallback(level, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

impl fmt::Debug for EraserLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EraserLog")
            .field("enabled", &self.enabled)
            .field("logger", &self.logger.as_ref().map(|_| "<logger>"))
            .field("channel", &self.channel)
            .finish()
    }
}

/// The guaranteed-available sink.
fn fallback(level: LogLevel, message: &str) {
    let line = format!("[Eraser][{}] {}", level.as_str().to_uppercase(), message);
    match level {
        LogLevel::Debug => tracing::debug!(target: "eraser", level = level.as_str(), "{}", line),
        LogLevel::Info | LogLevel::Notice => {
            tracing::info!(target: "eraser", level = level.as_str(), "{}", line);
        }
        LogLevel::Warning => tracing::warn!(target: "eraser", level = level.as_str(), "{}", line),
        LogLevel::Error | LogLevel::Critical | LogLevel::Alert | LogLevel::Emergency => {
            tracing::error!(target: "eraser", level = level.as_str(), "{}", line);
        }
    }
}
