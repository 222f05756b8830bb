//! Path and branch rules mapping changes to conventional-commit types.

use std::collections::HashMap;

use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Built-in path rules, in priority order within each tier.
const BUILTIN_RULES: &[(&str, &str)] = &[
    // Exact paths
    ("readme.md", "docs"),
    ("license", "docs"),
    ("license.md", "docs"),
    ("changelog.md", "docs"),
    ("contributing.md", "docs"),
    ("code_of_conduct.md", "docs"),
    ("cargo.toml", "build"),
    ("cargo.lock", "build"),
    ("build.rs", "build"),
    ("go.mod", "build"),
    ("go.sum", "build"),
    ("package.json", "build"),
    ("package-lock.json", "build"),
    ("yarn.lock", "build"),
    ("pnpm-lock.yaml", "build"),
    ("pyproject.toml", "build"),
    ("requirements.txt", "build"),
    ("makefile", "build"),
    ("dockerfile", "build"),
    ("docker-compose.yml", "build"),
    (".gitlab-ci.yml", "ci"),
    (".travis.yml", "ci"),
    ("jenkinsfile", "ci"),
    (".gitignore", "chore"),
    (".gitattributes", "chore"),
    (".gitmodules", "chore"),
    (".editorconfig", "chore"),
    ("rustfmt.toml", "style"),
    (".rustfmt.toml", "style"),
    (".prettierrc", "style"),
    // Directories
    (".github/workflows/*", "ci"),
    (".circleci/*", "ci"),
    (".github/*", "chore"),
    ("docs/*", "docs"),
    ("doc/*", "docs"),
    ("tests/*", "test"),
    ("test/*", "test"),
    ("__tests__/*", "test"),
    ("spec/*", "test"),
    ("scripts/*", "build"),
    (".vscode/*", "chore"),
    (".idea/*", "chore"),
    ("vendor/*", "chore"),
    // File name globs
    ("*_test.go", "test"),
    ("*_test.rs", "test"),
    ("*_test.py", "test"),
    ("test_*.py", "test"),
    ("*.test.js", "test"),
    ("*.test.ts", "test"),
    ("*.spec.js", "test"),
    ("*.spec.ts", "test"),
    ("*.md", "docs"),
    ("*.rst", "docs"),
    ("*.adoc", "docs"),
    ("*.txt", "docs"),
    ("*.lock", "build"),
    ("*.css", "style"),
    ("*.scss", "style"),
];

/// Built-in branch prefix rules.
const BUILTIN_BRANCHES: &[(&str, &str)] = &[
    ("feature", "feat"),
    ("feat", "feat"),
    ("fix", "fix"),
    ("bugfix", "fix"),
    ("hotfix", "fix"),
    ("docs", "docs"),
    ("doc", "docs"),
    ("refactor", "refactor"),
    ("perf", "perf"),
    ("test", "test"),
    ("tests", "test"),
    ("style", "style"),
    ("build", "build"),
    ("ci", "ci"),
    ("chore", "chore"),
    ("release", "chore"),
    ("revert", "revert"),
];

/// Errors raised while building a rule table.
#[derive(Error, Debug)]
pub enum RuleError {
    /// A path rule had an empty pattern.
    #[error("Rule for type '{0}' has an empty pattern")]
    EmptyPattern(String),

    /// A file name glob could not be compiled.
    #[error("Invalid glob pattern '{pattern}'")]
    InvalidGlob {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: globset::Error,
    },

    /// A rules file was not valid YAML or had the wrong shape.
    #[error("Failed to parse rules file")]
    Parse(#[from] serde_yaml::Error),
}

/// A path pattern and the conventional-commit type it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    /// Literal path, `dir/*` directory wildcard, or `*`-prefixed file name glob.
    pub pattern: String,
    /// Conventional-commit type for matching paths.
    #[serde(rename = "type")]
    pub commit_type: String,
}

impl ClassificationRule {
    /// Creates a rule from a pattern and type.
    pub fn new(pattern: impl Into<String>, commit_type: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            commit_type: commit_type.into(),
        }
    }

    /// Returns the precedence tier this rule's pattern belongs to.
    pub fn kind(&self) -> PatternKind {
        PatternKind::of(&self.pattern)
    }
}

/// A branch name prefix and the conventional-commit type it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRule {
    /// First `/`-separated segment of the branch name, matched exactly.
    pub prefix: String,
    /// Conventional-commit type for matching branches.
    #[serde(rename = "type")]
    pub commit_type: String,
}

impl BranchRule {
    /// Creates a rule from a branch prefix and type.
    pub fn new(prefix: impl Into<String>, commit_type: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            commit_type: commit_type.into(),
        }
    }
}

/// Precedence tier of a path pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Whole-path literal match.
    Exact,
    /// `dir/*`: matches anything below `dir/`.
    Directory,
    /// `*.ext` or `*name`: matched against the file name only.
    Glob,
}

impl PatternKind {
    /// Determines the tier of a pattern. A pattern ending in `/*` is always a
    /// directory wildcard, even if it also starts with `*`.
    pub fn of(pattern: &str) -> Self {
        if pattern.ends_with("/*") {
            Self::Directory
        } else if pattern.starts_with('*') {
            Self::Glob
        } else {
            Self::Exact
        }
    }
}

/// Rules as written in a `rules.yaml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFile {
    /// Path rules, in priority order.
    #[serde(default)]
    pub rules: Vec<ClassificationRule>,
    /// Branch prefix rules, in priority order.
    #[serde(default)]
    pub branches: Vec<BranchRule>,
}

impl RuleFile {
    /// Parses a rules file from YAML.
    pub fn from_yaml(content: &str) -> Result<Self, RuleError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Returns the built-in rules.
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES
                .iter()
                .map(|(pattern, commit_type)| ClassificationRule::new(*pattern, *commit_type))
                .collect(),
            branches: BUILTIN_BRANCHES
                .iter()
                .map(|(prefix, commit_type)| BranchRule::new(*prefix, *commit_type))
                .collect(),
        }
    }
}

/// Compiled, immutable rule table.
///
/// Rules keep the order they were given in. Within a tier the first matching
/// rule wins, so overlapping wildcards resolve to whichever was listed first.
#[derive(Debug, Clone)]
pub struct RuleTable {
    source: RuleFile,
    exact: HashMap<String, String>,
    directories: Vec<(String, String)>,
    globs: Vec<(GlobMatcher, String)>,
}

impl RuleTable {
    /// Compiles the built-in rule table.
    pub fn builtin() -> Result<Self, RuleError> {
        Self::new(RuleFile::builtin())
    }

    /// Compiles the built-in table with `overrides` taking priority.
    pub fn with_overrides(overrides: RuleFile) -> Result<Self, RuleError> {
        let builtin = RuleFile::builtin();
        let mut rules = overrides.rules;
        rules.extend(builtin.rules);
        let mut branches = overrides.branches;
        branches.extend(builtin.branches);
        Self::new(RuleFile { rules, branches })
    }

    /// Compiles exactly the given rules.
    pub fn new(source: RuleFile) -> Result<Self, RuleError> {
        let mut exact = HashMap::new();
        let mut directories = Vec::new();
        let mut globs = Vec::new();

        for rule in &source.rules {
            if rule.pattern.is_empty() {
                return Err(RuleError::EmptyPattern(rule.commit_type.clone()));
            }
            let pattern = rule.pattern.to_lowercase();
            let commit_type = rule.commit_type.clone();

            match PatternKind::of(&pattern) {
                PatternKind::Exact => {
                    exact.entry(pattern).or_insert(commit_type);
                }
                PatternKind::Directory => {
                    // Keep the trailing slash so `docs/*` never matches `docsextra/`.
                    let prefix = pattern[..pattern.len() - 1].to_string();
                    directories.push((prefix, commit_type));
                }
                PatternKind::Glob => {
                    let matcher = GlobBuilder::new(&pattern)
                        .literal_separator(true)
                        .build()
                        .map_err(|source| RuleError::InvalidGlob {
                            pattern: rule.pattern.clone(),
                            source,
                        })?
                        .compile_matcher();
                    globs.push((matcher, commit_type));
                }
            }
        }

        Ok(Self {
            source,
            exact,
            directories,
            globs,
        })
    }

    /// Looks up a lowercased path as a literal.
    pub fn match_exact(&self, lower_path: &str) -> Option<&str> {
        self.exact.get(lower_path).map(String::as_str)
    }

    /// Returns the first directory wildcard containing a lowercased path.
    pub fn match_directory(&self, lower_path: &str) -> Option<&str> {
        self.directories
            .iter()
            .find(|(prefix, _)| lower_path.starts_with(prefix.as_str()))
            .map(|(_, commit_type)| commit_type.as_str())
    }

    /// Returns the first glob matching the file name of a lowercased path.
    pub fn match_glob(&self, lower_path: &str) -> Option<&str> {
        let trimmed = lower_path.trim_end_matches('/');
        let file_name = trimmed.rsplit('/').next().unwrap_or(trimmed);
        self.globs
            .iter()
            .find(|(matcher, _)| matcher.is_match(file_name))
            .map(|(_, commit_type)| commit_type.as_str())
    }

    /// Looks up a branch prefix exactly as authored.
    pub fn match_branch(&self, prefix: &str) -> Option<&str> {
        self.source
            .branches
            .iter()
            .find(|rule| rule.prefix == prefix)
            .map(|rule| rule.commit_type.as_str())
    }

    /// Returns the rules this table was compiled from.
    pub fn rules(&self) -> &RuleFile {
        &self.source
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn table(rules: &[(&str, &str)]) -> RuleTable {
        RuleTable::new(RuleFile {
            rules: rules
                .iter()
                .map(|(p, t)| ClassificationRule::new(*p, *t))
                .collect(),
            branches: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn builtin_table_compiles() {
        let table = RuleTable::builtin().unwrap();
        assert_eq!(table.match_exact("readme.md"), Some("docs"));
        assert_eq!(table.match_branch("feature"), Some("feat"));
    }

    #[test]
    fn pattern_kinds() {
        assert_eq!(PatternKind::of("readme.md"), PatternKind::Exact);
        assert_eq!(PatternKind::of("docs/*"), PatternKind::Directory);
        assert_eq!(PatternKind::of("*.md"), PatternKind::Glob);
        assert_eq!(PatternKind::of("*_test.go"), PatternKind::Glob);
        assert_eq!(PatternKind::of("*/*"), PatternKind::Directory);
    }

    #[test]
    fn patterns_are_lowercased() {
        let table = table(&[("README.MD", "docs"), ("Docs/*", "docs"), ("*.GO", "feat")]);
        assert_eq!(table.match_exact("readme.md"), Some("docs"));
        assert_eq!(table.match_directory("docs/intro.md"), Some("docs"));
        assert_eq!(table.match_glob("src/main.go"), Some("feat"));
    }

    #[test]
    fn directory_wildcard_requires_separator() {
        let table = table(&[("docs/*", "docs")]);
        assert_eq!(table.match_directory("docs/intro.md"), Some("docs"));
        assert_eq!(table.match_directory("docs/nested/deep.md"), Some("docs"));
        assert_eq!(table.match_directory("docsextra/intro.md"), None);
        assert_eq!(table.match_directory("docs"), None);
    }

    #[test]
    fn glob_only_sees_file_name() {
        let table = table(&[("*.md", "docs")]);
        assert_eq!(table.match_glob("a/b/readme.md"), Some("docs"));
        assert_eq!(table.match_glob("readme.md"), Some("docs"));
        assert_eq!(table.match_glob("a/b/readme.md/"), Some("docs"));
        assert_eq!(table.match_glob("/"), None);
        assert_eq!(table.match_glob("md/file.rs"), None);
    }

    #[test]
    fn first_rule_wins_within_tier() {
        let table = table(&[("*_test.go", "test"), ("*.go", "feat")]);
        assert_eq!(table.match_glob("pkg/a_test.go"), Some("test"));

        let table = self::table(&[("*.go", "feat"), ("*_test.go", "test")]);
        assert_eq!(table.match_glob("pkg/a_test.go"), Some("feat"));
    }

    #[test]
    fn first_exact_duplicate_wins() {
        let table = table(&[("main.go", "feat"), ("main.go", "fix")]);
        assert_eq!(table.match_exact("main.go"), Some("feat"));
    }

    #[test]
    fn nested_directories_follow_list_order() {
        let builtin = RuleTable::builtin().unwrap();
        assert_eq!(builtin.match_directory(".github/workflows/ci.yml"), Some("ci"));
        assert_eq!(builtin.match_directory(".github/dependabot.yml"), Some("chore"));
    }

    #[test]
    fn branch_match_is_case_sensitive() {
        let table = RuleTable::builtin().unwrap();
        assert_eq!(table.match_branch("fix"), Some("fix"));
        assert_eq!(table.match_branch("Fix"), None);
    }

    #[test]
    fn empty_pattern_rejected() {
        let err = RuleTable::new(RuleFile {
            rules: vec![ClassificationRule::new("", "feat")],
            branches: Vec::new(),
        })
        .unwrap_err();
        assert!(matches!(err, RuleError::EmptyPattern(t) if t == "feat"));
    }

    #[test]
    fn invalid_glob_rejected() {
        let err = RuleTable::new(RuleFile {
            rules: vec![ClassificationRule::new("*.{rs", "feat")],
            branches: Vec::new(),
        })
        .unwrap_err();
        assert!(matches!(err, RuleError::InvalidGlob { pattern, .. } if pattern == "*.{rs"));
    }

    #[test]
    fn rule_file_from_yaml() {
        let yaml = r#"
rules:
  - pattern: "*.proto"
    type: feat
  - pattern: "migrations/*"
    type: chore
branches:
  - prefix: story
    type: feat
"#;
        let file = RuleFile::from_yaml(yaml).unwrap();
        assert_eq!(file.rules.len(), 2);
        assert_eq!(file.rules[0], ClassificationRule::new("*.proto", "feat"));
        assert_eq!(file.branches, vec![BranchRule::new("story", "feat")]);
    }

    #[test]
    fn rule_file_sections_optional() {
        let file = RuleFile::from_yaml("branches: []\n").unwrap();
        assert!(file.rules.is_empty());
        assert!(RuleFile::from_yaml("rules: 3\n").is_err());
    }

    #[test]
    fn overrides_take_priority() {
        let overrides = RuleFile {
            rules: vec![
                ClassificationRule::new("readme.md", "chore"),
                ClassificationRule::new("*.md", "feat"),
            ],
            branches: vec![BranchRule::new("feature", "fix")],
        };
        let table = RuleTable::with_overrides(overrides).unwrap();
        assert_eq!(table.match_exact("readme.md"), Some("chore"));
        assert_eq!(table.match_glob("guide.md"), Some("feat"));
        assert_eq!(table.match_branch("feature"), Some("fix"));
        // Untouched built-ins remain.
        assert_eq!(table.match_exact("cargo.toml"), Some("build"));
    }
}
