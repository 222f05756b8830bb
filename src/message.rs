//! Commit message body assembly.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::classify::{BranchResolver, Classifier, RuleTable, UNKNOWN_TYPE};
use crate::data::ChangeRecord;
use crate::git::ChangeSource;

/// Files grouped under `"<type>: <kind>"` keys.
///
/// Keys iterate in lexicographic order and each file list is sorted, so the
/// rendered body does not depend on the order changes were reported in.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GroupedBody {
    groups: BTreeMap<String, Vec<String>>,
}

impl GroupedBody {
    fn push(&mut self, key: String, file: String) {
        self.groups.entry(key).or_default().push(file);
    }

    fn sort_files(&mut self) {
        for files in self.groups.values_mut() {
            files.sort();
        }
    }

    /// Files recorded under a group key.
    pub fn files(&self, key: &str) -> Option<&[String]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Iterates groups in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(key, files)| (key.as_str(), files.as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no change survived filtering.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Builds the commented commit body from classified changes.
pub struct MessageAssembler {
    branch_type: String,
}

impl MessageAssembler {
    /// Creates an assembler that labels unclassified files with `branch_type`.
    pub fn new(branch_type: impl Into<String>) -> Self {
        Self {
            branch_type: branch_type.into(),
        }
    }

    /// Creates an assembler whose fallback type comes from the current branch.
    pub fn for_branch(resolver: &BranchResolver, branch_name: &str) -> Self {
        Self::new(resolver.resolve(branch_name))
    }

    /// Type given to files no path rule matched.
    pub fn branch_type(&self) -> &str {
        &self.branch_type
    }

    /// Groups reportable records by type and change kind.
    ///
    /// Untracked and unlabelled changes are dropped. Records typed
    /// [`UNKNOWN_TYPE`] take the branch type instead.
    pub fn group(&self, records: &[ChangeRecord]) -> GroupedBody {
        let mut body = GroupedBody::default();

        for record in records {
            if !record.kind.is_reportable() {
                debug!(file = %record.file, kind = %record.kind, "Skipping change");
                continue;
            }

            let commit_type = if record.commit_type == UNKNOWN_TYPE {
                self.branch_type.as_str()
            } else {
                record.commit_type.as_str()
            };

            body.push(
                format!("{commit_type}: {}", record.kind),
                record.file.clone(),
            );
        }

        body.sort_files();
        body
    }

    /// Renders the body with an optional header and footer.
    ///
    /// A present header is followed by a `#` separator line and a present
    /// footer is preceded by one. Empty strings count as absent.
    pub fn assemble(
        &self,
        records: &[ChangeRecord],
        header: Option<&str>,
        footer: Option<&str>,
    ) -> String {
        let grouped = self.group(records);
        let mut lines: Vec<String> = Vec::with_capacity(grouped.len() + 4);

        if let Some(header) = header.filter(|h| !h.is_empty()) {
            lines.push(header.to_string());
            lines.push("#".to_string());
        }

        for (key, files) in grouped.iter() {
            lines.push(format!("# {key} {}", files.join(", ")));
        }

        if let Some(footer) = footer.filter(|f| !f.is_empty()) {
            lines.push("#".to_string());
            lines.push(footer.to_string());
        }

        lines.join("\n")
    }
}

/// Reads the current branch and staged changes from `source`, classifies
/// them against `rules` and renders the commit body.
pub fn compose(
    source: &dyn ChangeSource,
    rules: Arc<RuleTable>,
    header: Option<&str>,
    footer: Option<&str>,
) -> Result<String> {
    let branch = source.current_branch()?;
    let changes = source.staged_changes()?;

    let classifier = Classifier::new(Arc::clone(&rules));
    let records = classifier.classify_changes(&changes);
    let assembler = MessageAssembler::for_branch(&BranchResolver::new(rules), &branch);
    info!(
        branch = %branch,
        branch_type = assembler.branch_type(),
        changes = records.len(),
        "Assembling commit message"
    );

    Ok(assembler.assemble(&records, header, footer))
}
