//! Dataset utilities for smFISH microscopy image analysis
//!
//! Groups raw channel images with their segmentation masks and spot detection
//! outputs, checks datasets for completeness, fetches sample data, and picks
//! regions of interest: the densest patch of a mask and the in-focus z-range of
//! a stack.

#![forbid(unsafe_code)]

/// Numeric helpers for patch and focus-range selection
pub mod analysis;
/// Dataset grouping and completeness checks
pub mod dataset;
/// Input/output operations and error handling
pub mod io;

pub use io::error::{DatasetError, Result};
