//! Rule inspection commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use crate::classify::Classifier;
use crate::config;

/// Rules command options.
#[derive(Parser)]
pub struct RulesCommand {
    /// Repository whose rule overrides are applied.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,
}

impl RulesCommand {
    /// Executes the rules command.
    pub fn execute(self) -> Result<()> {
        let table = config::load_rule_table(&self.repo)?;
        let yaml = serde_yaml::to_string(table.rules()).context("Failed to serialize rules")?;
        print!("{yaml}");
        Ok(())
    }
}

/// Classify command options.
#[derive(Parser)]
pub struct ClassifyCommand {
    /// Repository-relative paths to classify.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,

    /// Repository whose rule overrides are applied.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,
}

impl ClassifyCommand {
    /// Executes the classify command.
    ///
    /// Only path rules are consulted; unmatched paths print as `unknown`
    /// rather than taking the branch type.
    pub fn execute(self) -> Result<()> {
        let classifier = Classifier::new(Arc::new(config::load_rule_table(&self.repo)?));
        for line in classify_lines(&classifier, &self.paths) {
            println!("{line}");
        }
        Ok(())
    }
}

fn classify_lines(classifier: &Classifier, paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .map(|path| format!("{path}: {}", classifier.classify(path)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::classify::RuleTable;

    #[test]
    fn lines_use_original_spelling() {
        let classifier = Classifier::new(Arc::new(RuleTable::builtin().unwrap()));
        let paths = vec![
            "README.md".to_string(),
            "docs/Guide.md".to_string(),
            "src/lib.rs".to_string(),
        ];
        assert_eq!(
            classify_lines(&classifier, &paths),
            vec![
                "README.md: docs",
                "docs/Guide.md: docs",
                "src/lib.rs: unknown"
            ]
        );
    }

    #[test]
    fn builtin_rules_serialize() {
        let table = RuleTable::builtin().unwrap();
        let yaml = serde_yaml::to_string(table.rules()).unwrap();
        assert!(yaml.contains("pattern: readme.md"));
        assert!(yaml.contains("prefix: feature"));
        let reparsed = crate::classify::rules::RuleFile::from_yaml(&yaml).unwrap();
        assert_eq!(&reparsed, table.rules());
    }
}
