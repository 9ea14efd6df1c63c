//! Random search for the most densely populated window of a segmentation mask

use crate::io::error::{Result, invalid_parameter};
use ndarray::{ArrayView2, Axis, Slice};
use num_traits::Zero;
use rand::Rng;

/// Top-left corner of a sampled window and its foreground pixel count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchSample {
    /// Top row of the window
    pub row: usize,
    /// Left column of the window
    pub col: usize,
    /// Number of strictly positive pixels inside the window
    pub foreground_pixels: usize,
}

/// Count strictly positive pixels in the window at (`row`, `col`)
///
/// Windows reaching past the mask edge are cut at the edge.
pub fn count_foreground<T>(
    mask: &ArrayView2<'_, T>,
    row: usize,
    col: usize,
    patch_size: (usize, usize),
) -> usize
where
    T: PartialOrd + Zero,
{
    let (height, width) = mask.dim();
    let (row_start, col_start) = (row.min(height), col.min(width));
    let row_end = row.saturating_add(patch_size.0).min(height);
    let col_end = col.saturating_add(patch_size.1).min(width);
    let zero = T::zero();

    mask.slice_axis(Axis(0), Slice::from(row_start..row_end))
        .slice_axis(Axis(1), Slice::from(col_start..col_end))
        .iter()
        .filter(|&value| *value > zero)
        .count()
}

/// Sample `attempts` random windows and keep the one with the most foreground
///
/// Rows are drawn from `[0, h - patch_height)` and columns from
/// `[0, w - patch_width)`; a dimension where the patch spans the whole mask
/// only admits offset 0. A window replaces the current best only with a
/// strictly larger count, so ties keep the earliest sample and windows
/// without foreground are never selected.
///
/// Returns `None` when `attempts` is zero or no sampled window contains
/// foreground.
///
/// # Errors
///
/// Returns an error if the patch is larger than the mask in either dimension
pub fn find_high_density_patch<T, R>(
    mask: &ArrayView2<'_, T>,
    patch_size: (usize, usize),
    attempts: usize,
    rng: &mut R,
) -> Result<Option<PatchSample>>
where
    T: PartialOrd + Zero,
    R: Rng,
{
    let (height, width) = mask.dim();
    let (patch_height, patch_width) = patch_size;

    if patch_height > height || patch_width > width {
        return Err(invalid_parameter(
            "patch_size",
            &format!("{patch_height}x{patch_width}"),
            &format!("patch does not fit in a {height}x{width} mask"),
        ));
    }

    let row_span = height - patch_height;
    let col_span = width - patch_width;
    let mut best: Option<PatchSample> = None;

    for _ in 0..attempts {
        let row = if row_span > 0 {
            rng.random_range(0..row_span)
        } else {
            0
        };
        let col = if col_span > 0 {
            rng.random_range(0..col_span)
        } else {
            0
        };

        let foreground_pixels = count_foreground(mask, row, col, patch_size);
        let best_count = best.map_or(0, |sample| sample.foreground_pixels);
        if foreground_pixels > best_count {
            best = Some(PatchSample {
                row,
                col,
                foreground_pixels,
            });
        }
    }

    Ok(best)
}
