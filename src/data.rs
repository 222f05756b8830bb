//! Data structures shared between change enumeration, classification and
//! message assembly.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Staged state of a changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Content changed.
    Modified,
    /// Newly added to the index.
    Added,
    /// Removed from the index.
    Deleted,
    /// Moved from another path.
    Renamed,
    /// Copied from another path.
    Copied,
    /// Present in the working tree but never staged.
    Untracked,
    /// Any state without a commit-body label.
    Other,
}

impl ChangeKind {
    /// Whether changes of this kind belong in a commit body.
    pub fn is_reportable(self) -> bool {
        !matches!(self, Self::Untracked | Self::Other)
    }

    /// Lowercase label used in the rendered body.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modified => "modified",
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
            Self::Untracked => "untracked",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A changed path as reported by a change source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedChange {
    /// Repository-relative path with `/` separators.
    pub path: String,
    /// Staged state of the path.
    pub kind: ChangeKind,
    /// Previous path for renames and copies.
    pub previous_path: Option<String>,
}

impl StagedChange {
    /// Creates a change without a previous path.
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            previous_path: None,
        }
    }
}

/// A changed file together with its conventional-commit type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    /// Repository-relative path, as reported.
    pub file: String,
    /// Staged state of the file.
    pub kind: ChangeKind,
    /// Conventional-commit type, possibly [`crate::classify::UNKNOWN_TYPE`].
    pub commit_type: String,
    /// Auxiliary detail from the change source, e.g. the source of a rename.
    pub extra: Option<String>,
}

impl ChangeRecord {
    /// Creates a record with no auxiliary detail.
    pub fn new(file: impl Into<String>, kind: ChangeKind, commit_type: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            kind,
            commit_type: commit_type.into(),
            extra: None,
        }
    }
}
