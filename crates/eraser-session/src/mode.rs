//! Cascade mode selection.

use std::fmt;
use std::str::FromStr;

use eraser_core::Error;

/// How the relation set of a record is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EraserMode {
    /// Only the accessors a record lists in `relations_to_delete`.
    #[default]
    Manual,
    /// Every accessor auto-discovery finds on the record's type.
    Auto,
}

impl EraserMode {
    /// Mode name as accepted by `from_str`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            EraserMode::Manual => "manual",
            EraserMode::Auto => "auto",
        }
    }
}

impl FromStr for EraserMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(EraserMode::Manual),
            "auto" => Ok(EraserMode::Auto),
            other => Err(Error::Config(format!("Invalid Eraser Type: {}", other))),
        }
    }
}

impl fmt::Display for EraserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
