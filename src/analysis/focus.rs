//! In-focus z-range detection from a per-slice focus curve
//!
//! The range spans the steepest rise and the steepest fall of the curve,
//! padded on both sides. This is a heuristic: on noisy or monotonic curves the
//! two transitions can land anywhere, and the padded bounds are not clamped.

use crate::io::error::{Result, invalid_parameter};
use ndarray::{Array1, ArrayView1, ArrayView3};
use std::ops::{Range, Sub};

/// Padded z-index bounds around the in-focus region
///
/// Either bound may fall outside `[0, n)`; use [`FocusRange::clamp`] before
/// indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRange {
    /// Lower z-index, padded downwards
    pub low: isize,
    /// Upper z-index, padded upwards
    pub high: isize,
}

impl FocusRange {
    /// Clamp to a valid half-open slice range for a stack of `len` slices
    pub fn clamp(&self, len: usize) -> Range<usize> {
        let start = self.low.max(0).unsigned_abs().min(len);
        let end = self.high.max(0).unsigned_abs().min(len);
        start..end.max(start)
    }
}

/// Locate the in-focus range of a focus curve
///
/// With `d` the first difference of `focus`, the result is
/// `min(argmax d, argmin d) - adjustment_bottom` to
/// `max(argmax d, argmin d) + adjustment_top`. Ties resolve to the first
/// index.
///
/// # Errors
///
/// Returns an error if the curve has fewer than two samples or the padded
/// bounds overflow `isize`
pub fn find_in_focus_indices<T>(
    focus: &ArrayView1<'_, T>,
    adjustment_bottom: isize,
    adjustment_top: isize,
) -> Result<FocusRange>
where
    T: Copy + PartialOrd + Sub<Output = T>,
{
    let diffs: Vec<T> = focus
        .iter()
        .zip(focus.iter().skip(1))
        .map(|(&previous, &next)| next - previous)
        .collect();

    let (Some(steepest_rise), Some(steepest_fall)) = (
        first_extreme(&diffs, |candidate, best| candidate > best),
        first_extreme(&diffs, |candidate, best| candidate < best),
    ) else {
        return Err(invalid_parameter(
            "focus",
            &format!("{} samples", focus.len()),
            &"at least two samples are needed to take a difference",
        ));
    };

    let low = steepest_rise
        .min(steepest_fall)
        .cast_signed()
        .checked_sub(adjustment_bottom)
        .ok_or_else(|| {
            invalid_parameter("adjustment_bottom", &adjustment_bottom, &"range start overflows")
        })?;
    let high = steepest_rise
        .max(steepest_fall)
        .cast_signed()
        .checked_add(adjustment_top)
        .ok_or_else(|| invalid_parameter("adjustment_top", &adjustment_top, &"range end overflows"))?;

    Ok(FocusRange { low, high })
}

// Index of the first element no later element beats
fn first_extreme<T: Copy>(values: &[T], beats: impl Fn(T, T) -> bool) -> Option<usize> {
    let (&first, rest) = values.split_first()?;
    let mut best = (0, first);
    for (offset, &value) in rest.iter().enumerate() {
        if beats(value, best.1) {
            best = (offset + 1, value);
        }
    }
    Some(best.0)
}

/// Maximum intensity of each z-slice of a (z, h, w) stack
///
/// This is the focus curve the range finder expects. Empty slices yield
/// negative infinity.
pub fn max_intensity_profile(stack: &ArrayView3<'_, f64>) -> Array1<f64> {
    stack
        .outer_iter()
        .map(|plane| plane.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        .collect()
}
