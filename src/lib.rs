//! # autocommit
//!
//! Turns the staged changes of a git working tree into a commented
//! conventional-commit message body.
//!
//! Each changed path is classified by an ordered rule table (exact path,
//! then `dir/*` directory wildcard, then `*.ext` file name glob). Paths no
//! rule recognizes take a type derived from the branch name. Files sharing a
//! type and change kind are grouped onto one line.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use autocommit::classify::{Classifier, RuleTable};
//! use autocommit::data::{ChangeKind, StagedChange};
//! use autocommit::message::MessageAssembler;
//!
//! # fn main() -> Result<(), autocommit::classify::RuleError> {
//! let classifier = Classifier::new(Arc::new(RuleTable::builtin()?));
//! let records = classifier.classify_changes(&[
//!     StagedChange::new("README.md", ChangeKind::Modified),
//! ]);
//! let body = MessageAssembler::new("feat").assemble(&records, None, None);
//! assert_eq!(body, "# docs: modified README.md");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod classify;
pub mod cli;
pub mod config;
pub mod data;
pub mod git;
pub mod message;

pub use crate::cli::Cli;

/// The current version of autocommit.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
