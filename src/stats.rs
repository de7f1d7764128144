//! Summary statistics for configuring scales from data.
//!
//! All helpers take a value accessor and skip items whose value is not
//! finite, so missing measurements never poison a domain.

use tracing::warn;

use crate::scale::util::sorted_pair;

/// Longest progression [`range`] will allocate.
pub const MAX_RANGE_LEN: usize = 1 << 20;

/// Smallest and largest finite value, or `None` if there is none.
///
/// ```rust
/// use tegn::stats::extent;
///
/// let rows = [("a", 4.0), ("b", f64::NAN), ("c", -1.5)];
/// assert_eq!(extent(&rows, |r| r.1), Some((-1.5, 4.0)));
/// ```
pub fn extent<T>(items: &[T], value: impl Fn(&T) -> f64) -> Option<(f64, f64)> {
    items
        .iter()
        .map(value)
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Sum of finite values; `0.0` for an empty input.
pub fn sum<T>(items: &[T], value: impl Fn(&T) -> f64) -> f64 {
    items.iter().map(value).filter(|v| v.is_finite()).sum()
}

/// Arithmetic mean of finite values.
pub fn mean<T>(items: &[T], value: impl Fn(&T) -> f64) -> Option<f64> {
    let (total, count) = items
        .iter()
        .map(value)
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));
    (count > 0).then(|| total / count as f64)
}

/// Largest finite value.
pub fn max<T>(items: &[T], value: impl Fn(&T) -> f64) -> Option<f64> {
    extent(items, value).map(|(_, hi)| hi)
}

/// Smallest finite value.
pub fn min<T>(items: &[T], value: impl Fn(&T) -> f64) -> Option<f64> {
    extent(items, value).map(|(lo, _)| lo)
}

/// Arithmetic progression from `start` (inclusive) towards `stop`
/// (exclusive) in increments of `step`.
///
/// A zero, non-finite or wrong-signed step yields an empty vector, as does
/// a progression longer than [`MAX_RANGE_LEN`].
pub fn range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step == 0.0 || !step.is_finite() || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil();
    if !(n > 0.0) {
        return Vec::new();
    }
    if !n.is_finite() || n > MAX_RANGE_LEN as f64 {
        warn!(start, stop, step, "range too long, returning nothing");
        return Vec::new();
    }
    (0..n as usize).map(|i| start + i as f64 * step).collect()
}

/// Domain covering `[0, max]`, the usual starting point for bar and area
/// charts. Falls back to `[0, 1]` when there is no positive value.
pub fn zero_based_domain<T>(items: &[T], value: impl Fn(&T) -> f64) -> [f64; 2] {
    match extent(items, value) {
        Some((lo, hi)) => {
            let (lo, hi) = sorted_pair(lo.min(0.0), hi.max(0.0));
            if lo == hi { [0.0, 1.0] } else { [lo, hi] }
        }
        None => [0.0, 1.0],
    }
}
