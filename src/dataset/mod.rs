//! Dataset discovery and validation
//!
//! This module contains the filesystem-facing side of the workflow:
//! - Raw image filename parsing
//! - Companion file conventions
//! - Grouping by identifier and replicate
//! - Completeness checks

/// Companion file lookup table
pub mod companions;
/// Required-role checks over a grouping
pub mod completeness;
/// Identifier and replicate grouping
pub mod grouping;
/// Raw image filename convention
pub mod naming;

pub use completeness::{CompletenessReport, ensure_files_exist};
pub use grouping::{ExperimentGrouping, ReplicateRecord, group_experiments};
