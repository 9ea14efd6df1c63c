//! Checks that every replicate carries the roles needed for processing

use crate::dataset::grouping::{ExperimentGrouping, group_experiments};
use crate::io::configuration::{REPORT_SEPARATOR_WIDTH, REQUIRED_PATTERNS};
use crate::io::error::{DatasetError, Result};
use regex::Regex;
use std::fmt;
use std::path::Path;

/// Missing role patterns for one identifier and replicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicateStatus {
    /// Sample or condition label
    pub identifier: String,
    /// Acquisition number
    pub replicate: u32,
    /// Required patterns no role key matched, in checking order
    pub missing: Vec<String>,
}

impl ReplicateStatus {
    /// Whether every required pattern was found
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Outcome of a completeness pass over a grouping
///
/// The `Display` form is the human-readable diagnostic printed by the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletenessReport {
    /// One entry per replicate, in grouping order
    pub statuses: Vec<ReplicateStatus>,
}

impl CompletenessReport {
    /// Whether all replicates are complete
    pub fn is_complete(&self) -> bool {
        self.statuses.iter().all(ReplicateStatus::is_complete)
    }

    /// Replicates with at least one missing pattern
    pub fn incomplete(&self) -> impl Iterator<Item = &ReplicateStatus> {
        self.statuses.iter().filter(|status| !status.is_complete())
    }

    /// Status for one identifier and replicate
    pub fn status(&self, identifier: &str, replicate: u32) -> Option<&ReplicateStatus> {
        self.statuses
            .iter()
            .find(|status| status.identifier == identifier && status.replicate == replicate)
    }
}

impl fmt::Display for CompletenessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(REPORT_SEPARATOR_WIDTH);
        for status in &self.statuses {
            let (identifier, replicate) = (&status.identifier, status.replicate);
            writeln!(f, "testing {identifier} {replicate}")?;
            for pattern in &status.missing {
                writeln!(f, "could not find {pattern} in {identifier} {replicate}")?;
            }
            if status.is_complete() {
                writeln!(f, "ok")?;
            }
            writeln!(f, "{separator}")?;
        }
        Ok(())
    }
}

/// Matches record role keys against the required patterns
#[derive(Debug, Clone)]
pub struct CompletenessChecker {
    patterns: Vec<Regex>,
}

impl CompletenessChecker {
    /// Checker for the default [`REQUIRED_PATTERNS`]
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile
    pub fn new() -> Result<Self> {
        Self::with_patterns(&REQUIRED_PATTERNS)
    }

    /// Checker for a custom list of role patterns
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile
    pub fn with_patterns(patterns: &[&str]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|&pattern| {
                Regex::new(pattern).map_err(|e| DatasetError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Patterns not matched by any of the given role keys
    pub fn missing_patterns<S: AsRef<str>>(&self, role_keys: &[S]) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|pattern| !role_keys.iter().any(|key| pattern.is_match(key.as_ref())))
            .map(|pattern| pattern.as_str().to_string())
            .collect()
    }

    /// Check every replicate of a grouping
    pub fn check(&self, grouping: &ExperimentGrouping) -> CompletenessReport {
        let statuses = grouping
            .iter()
            .map(|(identifier, replicate, record)| ReplicateStatus {
                identifier: identifier.to_string(),
                replicate,
                missing: self.missing_patterns(&record.role_keys()),
            })
            .collect();

        CompletenessReport { statuses }
    }
}

/// Group the dataset under `root` and check it with the default patterns
///
/// # Errors
///
/// Returns an error if grouping fails or a pattern fails to compile
pub fn ensure_files_exist(root: impl AsRef<Path>) -> Result<CompletenessReport> {
    let grouping = group_experiments(root)?;
    Ok(CompletenessChecker::new()?.check(&grouping))
}
