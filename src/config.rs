//! Project rules and user settings.
//!
//! Rules come from an optional `rules.yaml` layered in front of the built-in
//! table. User settings live in `$HOME/.autocommit/settings.json` and act as a
//! fallback for environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::classify::rules::{RuleFile, RuleTable};

/// Name of the per-project and per-user configuration directory.
pub const CONFIG_DIR_NAME: &str = ".autocommit";

/// File holding project rule overrides.
pub const RULES_FILE_NAME: &str = "rules.yaml";

/// Environment variable supplying a default commit header.
pub const HEADER_ENV: &str = "AUTOCOMMIT_HEADER";

/// Environment variable supplying a default commit footer.
pub const FOOTER_ENV: &str = "AUTOCOMMIT_FOOTER";

/// Environment variable overriding the project configuration directory.
pub const CONFIG_DIR_ENV: &str = "AUTOCOMMIT_CONFIG_DIR";

/// Returns the project configuration directory.
///
/// `AUTOCOMMIT_CONFIG_DIR` wins when set and non-empty; otherwise
/// `<repo_root>/.autocommit`.
pub fn resolve_config_dir(repo_root: &Path) -> PathBuf {
    match env::var(CONFIG_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => repo_root.join(CONFIG_DIR_NAME),
    }
}

/// Finds a configuration file, most specific location first:
///
/// 1. `{dir}/local/{filename}`
/// 2. `{dir}/{filename}`
/// 3. `$HOME/.autocommit/{filename}`
///
/// Returns `None` when the file exists nowhere.
pub fn resolve_config_file(dir: &Path, filename: &str) -> Option<PathBuf> {
    let home = dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME));
    find_config_file(dir, home.as_deref(), filename)
}

fn find_config_file(dir: &Path, global_dir: Option<&Path>, filename: &str) -> Option<PathBuf> {
    [
        Some(dir.join("local").join(filename)),
        Some(dir.join(filename)),
        global_dir.map(|g| g.join(filename)),
    ]
    .into_iter()
    .flatten()
    .find(|path| path.is_file())
}

/// Reads a rules file.
pub fn load_rule_file(path: &Path) -> Result<RuleFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
    RuleFile::from_yaml(&content)
        .with_context(|| format!("Invalid rules file: {}", path.display()))
}

/// Builds the rule table for a repository.
///
/// Without a rules file this is exactly the built-in table.
pub fn load_rule_table(repo_root: &Path) -> Result<RuleTable> {
    let dir = resolve_config_dir(repo_root);
    match resolve_config_file(&dir, RULES_FILE_NAME) {
        Some(path) => {
            debug!(path = %path.display(), "Loading rule overrides");
            let overrides = load_rule_file(&path)?;
            RuleTable::with_overrides(overrides)
                .with_context(|| format!("Invalid rule in {}", path.display()))
        }
        None => RuleTable::builtin().context("Built-in rules failed to compile"),
    }
}

/// User settings from `$HOME/.autocommit/settings.json`.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Values consulted when an environment variable is unset.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the user's home directory, or defaults when the
    /// file or the home directory is missing.
    pub fn load() -> Result<Self> {
        match dirs::home_dir() {
            Some(home) => Self::load_from_path(home.join(CONFIG_DIR_NAME).join("settings.json")),
            None => Ok(Self::default()),
        }
    }

    /// Loads settings from a specific file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns an environment variable, falling back to the settings file.
    /// Empty values count as unset.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        env::var(key)
            .ok()
            .or_else(|| self.env.get(key).cloned())
            .filter(|value| !value.is_empty())
    }

    /// Default header from `AUTOCOMMIT_HEADER`.
    pub fn header(&self) -> Option<String> {
        self.get_env_var(HEADER_ENV)
    }

    /// Default footer from `AUTOCOMMIT_FOOTER`.
    pub fn footer(&self) -> Option<String> {
        self.get_env_var(FOOTER_ENV)
    }
}
