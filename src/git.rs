//! Git operations and repository management.

use anyhow::Result;

use crate::data::StagedChange;

pub mod repository;

pub use repository::GitRepository;

/// Anything that can report staged changes and the current branch.
///
/// Classification and message assembly only depend on this trait, never on
/// a particular version-control library.
pub trait ChangeSource {
    /// Short name of the current branch.
    fn current_branch(&self) -> Result<String>;

    /// Changed paths with their staged state, in a stable order.
    fn staged_changes(&self) -> Result<Vec<StagedChange>>;
}
