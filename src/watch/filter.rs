// src/watch/filter.rs

use std::path::Path;

use regex::Regex;

use crate::errors::{Result, WatchrunError};

/// Include/exclude predicate pair deciding which paths produce visible
/// events.
///
/// A path matches iff the include pattern is absent or matches it, and
/// the exclude pattern, when present, does not. Exclude wins when both
/// match.
#[derive(Debug, Clone, Default)]
pub struct FilterPolicy {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl FilterPolicy {
    /// Compile a policy from optional pattern strings.
    pub fn from_patterns(include: Option<&str>, exclude: Option<&str>) -> Result<FilterPolicy> {
        Ok(FilterPolicy {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    pub fn matches(&self, path: &Path) -> bool {
        let s = path.to_string_lossy();
        if let Some(include) = &self.include {
            if !include.is_match(&s) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(&s) {
                return false;
            }
        }
        true
    }
}

fn compile(pattern: Option<&str>) -> Result<Option<Regex>> {
    pattern
        .map(|p| {
            Regex::new(p).map_err(|e| WatchrunError::InvalidPattern {
                pattern: p.to_string(),
                source: e,
            })
        })
        .transpose()
}
