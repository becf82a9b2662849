//! Directories excluded from the walk.

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashSet;

/// Set of ignore patterns. A pattern matches a directory when it equals the
/// directory's name or path, or when it matches either as a glob. Wildcards
/// never cross a `/`.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    exact: HashSet<String>,
    globs: Vec<Glob>,
    set: GlobSet,
}

impl Default for IgnoreMatcher {
    fn default() -> Self {
        Self {
            exact: HashSet::new(),
            globs: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

impl IgnoreMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a matcher from user patterns.
    /// Patterns that are not valid globs still match exactly and are reported.
    pub fn from_patterns(patterns: &[String]) -> Self {
        let mut matcher = Self::new();
        let mut invalid = Vec::new();
        for pattern in patterns {
            if matcher.add(pattern).is_err() {
                invalid.push(pattern.as_str());
            }
        }
        if !invalid.is_empty() {
            tracing::warn!(
                "invalid ignore pattern(s), matched literally only: {:?}",
                invalid
            );
        }
        matcher
    }

    /// Register one pattern. The exact form is always kept; the error only
    /// says the glob form could not be compiled.
    pub fn add(&mut self, pattern: &str) -> Result<(), globset::Error> {
        self.exact.insert(pattern.to_string());
        let glob = GlobBuilder::new(pattern).literal_separator(true).build()?;
        self.globs.push(glob);

        let mut builder = GlobSetBuilder::new();
        for glob in &self.globs {
            builder.add(glob.clone());
        }
        self.set = builder.build()?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Whether the directory `name` found at `path` is excluded.
    pub fn is_ignored(&self, name: &str, path: &str) -> bool {
        if self.exact.contains(name) || self.exact.contains(path) {
            return true;
        }
        self.set.is_match(name) || self.set.is_match(path)
    }
}
