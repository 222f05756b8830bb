//! Conventional-commit classification of changed file paths.

pub mod branch;
pub mod classifier;
pub mod rules;

pub use branch::BranchResolver;
pub use classifier::Classifier;
pub use rules::{BranchRule, ClassificationRule, RuleError, RuleTable};

/// Type returned when no rule matches a path or branch.
pub const UNKNOWN_TYPE: &str = "unknown";
