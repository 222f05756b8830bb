//! Message command — writes the grouped commit body.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use crate::config::{self, Settings};
use crate::git::GitRepository;

/// Message command options.
#[derive(Parser)]
pub struct MessageCommand {
    /// Commit message file to write, e.g. the file git passes to a
    /// prepare-commit-msg hook. Defaults to stdout when omitted.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Header placed above the grouped changes.
    #[arg(value_name = "HEADER")]
    pub header_arg: Option<String>,

    /// Footer placed below the grouped changes.
    #[arg(value_name = "FOOTER")]
    pub footer_arg: Option<String>,

    /// Header placed above the grouped changes (overrides HEADER).
    #[arg(long)]
    pub header: Option<String>,

    /// Footer placed below the grouped changes (overrides FOOTER).
    #[arg(long)]
    pub footer: Option<String>,

    /// Write to stdout and leave FILE untouched.
    #[arg(long)]
    pub stdout: bool,

    /// Repository to read staged changes from.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,
}

impl MessageCommand {
    /// Executes the message command.
    pub fn execute(self) -> Result<()> {
        let settings = Settings::load()?;
        let header = self
            .header
            .or(self.header_arg)
            .or_else(|| settings.header());
        let footer = self
            .footer
            .or(self.footer_arg)
            .or_else(|| settings.footer());

        let repo = GitRepository::open_at(&self.repo)?;
        let root = repo.workdir().unwrap_or(self.repo.as_path()).to_path_buf();
        let rules = Arc::new(config::load_rule_table(&root)?);

        let body = crate::message::compose(&repo, rules, header.as_deref(), footer.as_deref())?;

        match self.file {
            Some(path) if !self.stdout => {
                write_message_file(&path, &body)?;
                info!(path = %path.display(), "Wrote commit message");
            }
            Some(_) => write_stdout(&body)?,
            None => {
                warn!("Commit message file not provided. Defaulting to stdout.");
                write_stdout(&body)?;
            }
        }

        Ok(())
    }
}

fn write_stdout(body: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(body.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write commit message to stdout")
}

/// Replaces the contents of `path` with `body`. New files get mode 0644.
fn write_message_file(path: &Path, body: &str) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("Failed to open commit message file: {}", path.display()))?;
    file.write_all(body.as_bytes())
        .with_context(|| format!("Failed to write commit message file: {}", path.display()))?;

    Ok(())
}
