//! Accessor-name denylist.
//!
//! Patterns are matched case-insensitively, in order, first match wins:
//!
//! - `update*` (prefix) matches `updateRate`
//! - `*Rate` (suffix) matches `updateRate`
//! - `updateRate` matches only itself
//!
//! A bare `*` matches every name.

use regex::{Regex, RegexBuilder};

/// A compiled denylist.
#[derive(Debug, Clone, Default)]
pub struct Denylist {
    rules: Vec<Regex>,
}

impl Denylist {
    /// Compile a list of patterns.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .filter_map(|p| {
                let pattern = p.as_ref();
                match compile(pattern) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::warn!(
                            target: "eraser::denylist",
                            pattern = pattern,
                            error = %e,
                            "Ignoring denylist pattern"
                        );
                        None
                    }
                }
            })
            .collect();
        Self { rules }
    }

    /// Whether `name` matches any pattern.
    pub fn is_denied(&self, name: &str) -> bool {
        self.rules.iter().any(|re| re.is_match(name))
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no pattern is configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One-shot check without keeping the compiled list around.
pub fn is_denied<S: AsRef<str>>(name: &str, patterns: &[S]) -> bool {
    Denylist::new(patterns).is_denied(name)
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    let source = if let Some(prefix) = strip_trailing_stars(pattern) {
        format!("^{}", regex::escape(prefix))
    } else if let Some(suffix) = pattern.strip_prefix('*') {
        format!("{}$", regex::escape(suffix.trim_start_matches('*')))
    } else {
        format!("^{}$", regex::escape(pattern))
    };

    RegexBuilder::new(&source).case_insensitive(true).build()
}

fn strip_trailing_stars(pattern: &str) -> Option<&str> {
    pattern
        .ends_with('*')
        .then(|| pattern.trim_end_matches('*'))
}
