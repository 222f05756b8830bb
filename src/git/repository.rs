//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::{ErrorCode, Repository, Status, StatusOptions};
use tracing::debug;

use super::ChangeSource;
use crate::data::{ChangeKind, StagedChange};

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open repository at specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path)
            .with_context(|| format!("Not in a git repository: {}", path.display()))?;

        Ok(Self { repo })
    }

    /// Get workdir path
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Get current branch name
    ///
    /// An unborn branch (no commits yet) resolves through HEAD's symbolic
    /// target. A detached HEAD yields `HEAD`.
    pub fn get_current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) => Ok(head.shorthand().unwrap_or("HEAD").to_string()),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self
                    .repo
                    .find_reference("HEAD")
                    .context("Failed to read HEAD reference")?;
                let target = head
                    .symbolic_target()
                    .context("HEAD reference has no symbolic target")?;
                Ok(target
                    .strip_prefix("refs/heads/")
                    .unwrap_or(target)
                    .to_string())
            }
            Err(e) => Err(e).context("Failed to get HEAD reference"),
        }
    }

    /// Get staged changes, including untracked files
    pub fn get_staged_changes(&self) -> Result<Vec<StagedChange>> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .include_ignored(false)
            .renames_head_to_index(true);

        let statuses = self
            .repo
            .statuses(Some(&mut options))
            .context("Failed to get repository status")?;

        let mut changes = Vec::new();

        for entry in statuses.iter() {
            let flags = entry.status();
            let kind = staged_kind(flags);

            let entry_path = lossy_path(entry.path_bytes());
            let (path, previous_path) = if kind == ChangeKind::Renamed {
                let delta = entry.head_to_index();
                let new_path = delta
                    .as_ref()
                    .and_then(|d| d.new_file().path_bytes().map(lossy_path));
                let old_path = delta
                    .as_ref()
                    .and_then(|d| d.old_file().path_bytes().map(lossy_path));
                (new_path.unwrap_or(entry_path), old_path)
            } else {
                (entry_path, None)
            };

            changes.push(StagedChange {
                path,
                kind,
                previous_path,
            });
        }

        changes.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(count = changes.len(), "Collected status entries");

        Ok(changes)
    }
}

impl ChangeSource for GitRepository {
    fn current_branch(&self) -> Result<String> {
        self.get_current_branch()
    }

    fn staged_changes(&self) -> Result<Vec<StagedChange>> {
        self.get_staged_changes()
    }
}

/// Decode a git path, replacing bytes that are not valid UTF-8
fn lossy_path(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Map git status flags onto the staged change kind
///
/// Only index-side flags count. A file changed solely in the working tree
/// has not been staged and maps to [`ChangeKind::Other`].
fn staged_kind(flags: Status) -> ChangeKind {
    if flags.contains(Status::INDEX_RENAMED) {
        ChangeKind::Renamed
    } else if flags.contains(Status::INDEX_NEW) {
        ChangeKind::Added
    } else if flags.contains(Status::INDEX_MODIFIED) {
        ChangeKind::Modified
    } else if flags.contains(Status::INDEX_DELETED) {
        ChangeKind::Deleted
    } else if flags.contains(Status::WT_NEW) {
        ChangeKind::Untracked
    } else {
        ChangeKind::Other
    }
}
