//! Cached path classification.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::rules::RuleTable;
use super::UNKNOWN_TYPE;
use crate::data::{ChangeRecord, StagedChange};

/// Memoized classifications keyed by lowercased path.
///
/// Reads share the lock; writes take it exclusively. Two workers racing on
/// the same unseen path both compute the same type, so the last write wins
/// without changing the outcome.
#[derive(Debug, Default)]
pub struct LookupCache {
    entries: RwLock<HashMap<String, String>>,
}

impl LookupCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached type for a lowercased path.
    pub fn get(&self, lower_path: &str) -> Option<String> {
        // Entries are inserted whole, so a poisoned map is still consistent.
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(lower_path).cloned()
    }

    fn insert(&self, lower_path: String, commit_type: String) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(lower_path, commit_type);
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps file paths to conventional-commit types.
///
/// Tiers are tried in order (exact path, directory wildcard, file name glob)
/// and the first hit wins. Paths matching nothing classify as
/// [`UNKNOWN_TYPE`]. Every outcome is cached per instance.
pub struct Classifier {
    rules: Arc<RuleTable>,
    cache: LookupCache,
}

impl Classifier {
    /// Creates a classifier with an empty cache.
    pub fn new(rules: Arc<RuleTable>) -> Self {
        Self {
            rules,
            cache: LookupCache::new(),
        }
    }

    /// Returns the conventional-commit type of `path`.
    pub fn classify(&self, path: &str) -> String {
        let lower = path.to_lowercase();

        if let Some(commit_type) = self.cache.get(&lower) {
            return commit_type;
        }

        let (tier, commit_type) = if let Some(t) = self.rules.match_exact(&lower) {
            ("exact", t)
        } else if let Some(t) = self.rules.match_directory(&lower) {
            ("directory", t)
        } else if let Some(t) = self.rules.match_glob(&lower) {
            ("glob", t)
        } else {
            ("none", UNKNOWN_TYPE)
        };
        debug!(path, tier, commit_type, "Classified path");

        let commit_type = commit_type.to_string();
        self.cache.insert(lower, commit_type.clone());
        commit_type
    }

    /// Classifies every change reported by a change source.
    pub fn classify_changes(&self, changes: &[StagedChange]) -> Vec<ChangeRecord> {
        changes
            .iter()
            .map(|change| ChangeRecord {
                file: change.path.clone(),
                kind: change.kind,
                commit_type: self.classify(&change.path),
                extra: change.previous_path.clone(),
            })
            .collect()
    }

    /// The rules this classifier consults.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Number of distinct paths classified so far.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
