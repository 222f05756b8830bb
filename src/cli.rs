//! CLI interface for autocommit.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod message;
pub mod rules;

pub use message::MessageCommand;
pub use rules::{ClassifyCommand, RulesCommand};

/// autocommit: Writes a conventional-commit message body from staged changes.
#[derive(Parser)]
#[command(name = "autocommit")]
#[command(about = "Groups staged changes by conventional-commit type", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Optional helper command; without one, a commit message is generated.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Commit message generation options.
    #[command(flatten)]
    pub message: MessageCommand,
}

/// Helper commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Prints the effective classification rules as YAML.
    Rules(RulesCommand),
    /// Prints the rule-based type of each path.
    Classify(ClassifyCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Some(Commands::Rules(rules_cmd)) => rules_cmd.execute(),
            Some(Commands::Classify(classify_cmd)) => classify_cmd.execute(),
            None => self.message.execute(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn positional_file_header_footer() {
        let cli = Cli::try_parse_from([
            "autocommit",
            ".git/COMMIT_EDITMSG",
            "Header text",
            "Footer text",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.message.file, Some(PathBuf::from(".git/COMMIT_EDITMSG")));
        assert_eq!(cli.message.header_arg.as_deref(), Some("Header text"));
        assert_eq!(cli.message.footer_arg.as_deref(), Some("Footer text"));
        assert!(!cli.message.stdout);
    }

    #[test]
    fn flags() {
        let cli = Cli::try_parse_from([
            "autocommit",
            "--stdout",
            "--header",
            "H",
            "--footer",
            "F",
            "--repo",
            "/tmp/repo",
        ])
        .unwrap();
        assert!(cli.message.stdout);
        assert!(cli.message.file.is_none());
        assert_eq!(cli.message.header.as_deref(), Some("H"));
        assert_eq!(cli.message.footer.as_deref(), Some("F"));
        assert_eq!(cli.message.repo, PathBuf::from("/tmp/repo"));
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["autocommit"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.message.file.is_none());
        assert_eq!(cli.message.repo, PathBuf::from("."));
    }

    #[test]
    fn classify_subcommand() {
        let cli = Cli::try_parse_from(["autocommit", "classify", "README.md", "src/main.rs"])
            .unwrap();
        match cli.command {
            Some(Commands::Classify(cmd)) => {
                assert_eq!(cmd.paths, vec!["README.md", "src/main.rs"]);
            }
            _ => panic!("expected classify subcommand"),
        }
    }

    #[test]
    fn classify_requires_paths() {
        assert!(Cli::try_parse_from(["autocommit", "classify"]).is_err());
    }

    #[test]
    fn rules_subcommand() {
        let cli = Cli::try_parse_from(["autocommit", "rules", "--repo", "elsewhere"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Rules(RulesCommand { ref repo })) if repo == &PathBuf::from("elsewhere")
        ));
    }

    #[test]
    fn too_many_positionals_rejected() {
        assert!(Cli::try_parse_from(["autocommit", "f", "h", "t", "extra"]).is_err());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
