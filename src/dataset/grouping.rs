//! Groups raw channel images and their companions by identifier and replicate
//!
//! The root directory is scanned once, without recursion. Every raw image that
//! follows the naming convention lands in a [`ReplicateRecord`], and the fixed
//! companion folders are probed for masks and spot outputs belonging to the
//! same replicate.

use crate::dataset::companions::{COMPANION_RULES, CompanionRole};
use crate::dataset::naming::{ChannelTag, FileNameParser};
use crate::io::error::{Result, file_system};
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Record key of the synthesized output name
pub const OUTPUT_NAME_KEY: &str = "output_name";

/// Files and derived names known for one acquisition
///
/// Entries are only ever added or overwritten. A record is not required to
/// hold every role; see [`crate::dataset::completeness`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicateRecord {
    /// Raw image per channel
    pub channels: BTreeMap<ChannelTag, PathBuf>,
    /// Derived files per companion role
    pub companions: BTreeMap<CompanionRole, PathBuf>,
    /// Output base name, set once a fluorescence channel is seen
    pub output_name: Option<String>,
}

impl ReplicateRecord {
    /// Raw image path for a channel
    pub fn channel(&self, channel: &ChannelTag) -> Option<&Path> {
        self.channels.get(channel).map(PathBuf::as_path)
    }

    /// Companion path for a role
    pub fn companion(&self, role: CompanionRole) -> Option<&Path> {
        self.companions.get(&role).map(PathBuf::as_path)
    }

    /// All role names present in this record
    pub fn role_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.channels.keys().map(ToString::to_string).collect();
        keys.extend(self.companions.keys().map(|role| role.name().to_string()));
        if self.output_name.is_some() {
            keys.push(OUTPUT_NAME_KEY.to_string());
        }
        keys
    }

    /// Role name to file path, ready to hand to [`crate::io::loader::load_data`]
    pub fn paths(&self) -> BTreeMap<String, PathBuf> {
        self.channels
            .iter()
            .map(|(channel, path)| (channel.to_string(), path.clone()))
            .chain(
                self.companions
                    .iter()
                    .map(|(role, path)| (role.name().to_string(), path.clone())),
            )
            .collect()
    }

    /// Role name to display value for every entry, output name included
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .paths()
            .into_iter()
            .map(|(key, path)| (key, path.display().to_string()))
            .collect();
        if let Some(name) = &self.output_name {
            entries.push((OUTPUT_NAME_KEY.to_string(), name.clone()));
        }
        entries
    }
}

/// Identifier to replicate to record, in sorted order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperimentGrouping {
    experiments: BTreeMap<String, BTreeMap<u32, ReplicateRecord>>,
}

impl ExperimentGrouping {
    /// Record for one identifier and replicate
    pub fn get(&self, identifier: &str, replicate: u32) -> Option<&ReplicateRecord> {
        self.experiments.get(identifier)?.get(&replicate)
    }

    /// All replicates of one identifier
    pub fn replicates(&self, identifier: &str) -> Option<&BTreeMap<u32, ReplicateRecord>> {
        self.experiments.get(identifier)
    }

    /// Identifiers in sorted order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.experiments.keys().map(String::as_str)
    }

    /// Every (identifier, replicate, record) triple in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32, &ReplicateRecord)> {
        self.experiments.iter().flat_map(|(identifier, replicates)| {
            replicates
                .iter()
                .map(move |(&replicate, record)| (identifier.as_str(), replicate, record))
        })
    }

    /// Number of (identifier, replicate) pairs
    pub fn replicate_count(&self) -> usize {
        self.experiments.values().map(BTreeMap::len).sum()
    }

    /// Whether no raw image was grouped
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }
}

/// Accumulates a grouping one file at a time
pub struct ExperimentGrouper {
    root: PathBuf,
    parser: FileNameParser,
    experiments: BTreeMap<String, BTreeMap<u32, ReplicateRecord>>,
}

impl ExperimentGrouper {
    /// Create a grouper for the dataset rooted at `root`
    ///
    /// # Errors
    ///
    /// Returns an error if the filename pattern fails to compile
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            parser: FileNameParser::new()?,
            experiments: BTreeMap::new(),
        })
    }

    /// Add one raw image path
    ///
    /// Returns `false` when the filename doesn't follow the convention, in
    /// which case nothing is recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if a companion glob pattern is malformed
    pub fn add_file(&mut self, path: &Path) -> Result<bool> {
        let Some(name) = self.parser.parse_path(path) else {
            debug!("Skipping {} (not a raw channel image)", path.display());
            return Ok(false);
        };

        let record = self
            .experiments
            .entry(name.identifier.clone())
            .or_default()
            .entry(name.replicate)
            .or_default();

        record
            .channels
            .insert(name.channel.clone(), path.to_path_buf());

        for rule in &COMPANION_RULES {
            if let Some(companion) = rule.find(&self.root, &name.identifier, name.replicate)? {
                record.companions.insert(rule.role, companion);
            }
        }

        if name.channel.is_fluorescence() {
            record.output_name = Some(name.output_name());
        }

        Ok(true)
    }

    /// Finish accumulation
    pub fn finish(self) -> ExperimentGrouping {
        ExperimentGrouping {
            experiments: self.experiments,
        }
    }
}

/// Group every raw channel image directly inside `root`
///
/// # Errors
///
/// Returns an error if the root directory can't be listed or a companion glob
/// pattern is malformed
pub fn group_experiments(root: impl AsRef<Path>) -> Result<ExperimentGrouping> {
    let root = root.as_ref();
    let mut grouper = ExperimentGrouper::new(root)?;

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(root).map_err(file_system(root, "list directory"))? {
        let path = entry.map_err(file_system(root, "read directory entry"))?.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if path.is_file() && !hidden {
            entries.push(path);
        }
    }
    entries.sort();

    let mut matched = 0usize;
    for path in &entries {
        if grouper.add_file(path)? {
            matched += 1;
        }
    }

    let grouping = grouper.finish();
    info!(
        "Grouped {matched} of {} files under {} into {} replicates",
        entries.len(),
        root.display(),
        grouping.replicate_count()
    );

    Ok(grouping)
}
