//! Declarative lookup table for files derived from a raw acquisition
//!
//! Each rule names a role, the sibling folder it lives in and a glob template.
//! Templates use `{id}` for the identifier and `{rep}` for the zero-padded
//! replicate number.

use crate::dataset::naming::format_replicate;
use crate::io::configuration::{DENSE_FOLDER, MASK_FOLDER, SPOT_FOLDER};
use crate::io::error::{DatasetError, Result};
use glob::{MatchOptions, Pattern};
use log::warn;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of derived file attached to a replicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompanionRole {
    /// Nuclear segmentation from the DAPI channel
    NuclearMask,
    /// Cell segmentation from the DIC channel
    CellMask,
    /// Spot detection output
    Spots,
    /// Dense-region spot decomposition output
    Dense,
}

impl CompanionRole {
    /// Role name used as record key
    pub const fn name(self) -> &'static str {
        match self {
            Self::NuclearMask => "nuclear_mask",
            Self::CellMask => "cell_mask",
            Self::Spots => "spots",
            Self::Dense => "dense",
        }
    }
}

impl fmt::Display for CompanionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where and how to look for one companion role
#[derive(Debug, Clone, Copy)]
pub struct CompanionRule {
    /// Role recorded on a match
    pub role: CompanionRole,
    /// Folder under the dataset root
    pub folder: &'static str,
    /// Glob template for the file name
    pub template: &'static str,
}

/// Companion conventions, probed in order for every raw image
pub const COMPANION_RULES: [CompanionRule; 4] = [
    CompanionRule {
        role: CompanionRole::NuclearMask,
        folder: MASK_FOLDER,
        template: "*{id}_DAPI_{rep}_seg.tif",
    },
    CompanionRule {
        role: CompanionRole::CellMask,
        folder: MASK_FOLDER,
        template: "*{id}_DIC_{rep}_seg.tif",
    },
    // Matches spot files of every channel; only the first is kept
    CompanionRule {
        role: CompanionRole::Spots,
        folder: SPOT_FOLDER,
        template: "*{id}*{rep}*spots*",
    },
    CompanionRule {
        role: CompanionRole::Dense,
        folder: DENSE_FOLDER,
        template: "*{id}*{rep}*spots*dd*",
    },
];

impl CompanionRule {
    /// Full glob pattern for an identifier and replicate under `root`
    pub fn glob_pattern(&self, root: &Path, identifier: &str, replicate: u32) -> String {
        let folder = root.join(self.folder);
        let file_pattern = self
            .template
            .replace("{id}", &Pattern::escape(identifier))
            .replace("{rep}", &format_replicate(replicate));

        format!(
            "{}/{file_pattern}",
            Pattern::escape(&folder.to_string_lossy())
        )
    }

    /// Find the companion file for an identifier and replicate
    ///
    /// Matches are taken in sorted path order and the first one wins. Hidden
    /// files are never matched and a missing folder yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the rendered glob pattern is malformed
    pub fn find(&self, root: &Path, identifier: &str, replicate: u32) -> Result<Option<PathBuf>> {
        let pattern = self.glob_pattern(root, identifier, replicate);
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };
        let matches: Vec<PathBuf> = glob::glob_with(&pattern, options)
            .map_err(|e| DatasetError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?
            .filter_map(std::result::Result::ok)
            .collect();

        if matches.len() > 1 {
            warn!(
                "{} candidates for {} of {identifier} {replicate}, using {}",
                matches.len(),
                self.role,
                matches
                    .first()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            );
        }

        Ok(matches.into_iter().next())
    }
}
