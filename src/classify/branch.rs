//! Branch-name fallback for paths no rule recognizes.

use std::sync::Arc;

use tracing::debug;

use super::rules::RuleTable;
use super::UNKNOWN_TYPE;

/// Resolves a conventional-commit type from a branch name.
pub struct BranchResolver {
    rules: Arc<RuleTable>,
}

impl BranchResolver {
    /// Creates a resolver over a shared rule table.
    pub fn new(rules: Arc<RuleTable>) -> Self {
        Self { rules }
    }

    /// Returns the type mapped to the branch's first `/` segment.
    ///
    /// `feature/login` is looked up as `feature`. Matching is exact and
    /// case-sensitive; anything unmapped resolves to [`UNKNOWN_TYPE`].
    pub fn resolve(&self, branch_name: &str) -> String {
        let prefix = branch_name.split('/').next().unwrap_or(branch_name);
        let commit_type = self.rules.match_branch(prefix).unwrap_or(UNKNOWN_TYPE);
        debug!(branch = branch_name, prefix, commit_type, "Resolved branch type");
        commit_type.to_string()
    }
}
