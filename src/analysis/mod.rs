//! Numeric helpers for choosing regions of interest

/// In-focus z-range detection
pub mod focus;
/// Dense patch sampling on segmentation masks
pub mod patch;
