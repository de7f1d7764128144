use std::cmp::Ordering;
use std::f64::consts::TAU;

use crate::error::{Error, Result};

/// Angular extent of one row in a pie layout.
///
/// Angles are in radians, clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice<'a, T> {
    pub data: &'a T,
    pub value: f64,
    /// Position of the slice around the circle after sorting.
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub pad_angle: f64,
}

impl<T> PieSlice<'_, T> {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Pie layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pie {
    start_angle: f64,
    end_angle: f64,
    pad_angle: f64,
}

impl Default for Pie {
    fn default() -> Self {
        Self {
            start_angle: 0.0,
            end_angle: TAU,
            pad_angle: 0.0,
        }
    }
}

impl Pie {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn start_angle(mut self, angle: f64) -> Self {
        self.start_angle = angle;
        self
    }

    #[must_use]
    pub fn end_angle(mut self, angle: f64) -> Self {
        self.end_angle = angle;
        self
    }

    /// Gap inserted between adjacent slices.
    #[must_use]
    pub fn pad_angle(mut self, angle: f64) -> Self {
        self.pad_angle = angle.max(0.0);
        self
    }

    /// Lays out `rows`, returning one slice per row in input order.
    ///
    /// With `sort` the slices are arranged around the circle in comparator
    /// order; otherwise they follow the input. Rows with a non-positive (or
    /// non-finite) value get a zero-width slice at the angle where they fall.
    /// Fails with [`Error::EmptyDataset`] when `rows` is empty.
    pub fn layout<'a, T>(
        &self,
        rows: &'a [T],
        value: impl Fn(&T) -> f64,
        sort: Option<&dyn Fn(&T, &T) -> Ordering>,
    ) -> Result<Vec<PieSlice<'a, T>>> {
        if rows.is_empty() {
            return Err(Error::EmptyDataset { layout: "pie" });
        }

        let n = rows.len();
        let values: Vec<f64> = rows
            .iter()
            .map(|row| {
                let v = value(row);
                if v.is_finite() { v } else { 0.0 }
            })
            .collect();
        let sum: f64 = values.iter().filter(|v| **v > 0.0).sum();

        let mut order: Vec<usize> = (0..n).collect();
        if let Some(compare) = sort {
            order.sort_by(|&a, &b| compare(&rows[a], &rows[b]));
        }

        let span = (self.end_angle - self.start_angle).clamp(-TAU, TAU);
        let pad = self.pad_angle.min(span.abs() / n as f64) * span.signum();
        let k = if sum > 0.0 { (span - n as f64 * pad) / sum } else { 0.0 };

        let mut placed: Vec<Option<PieSlice<'a, T>>> = (0..n).map(|_| None).collect();
        let mut a0 = self.start_angle;
        for (position, &i) in order.iter().enumerate() {
            let v = values[i];
            let a1 = a0 + if v > 0.0 { v * k } else { 0.0 } + pad;
            placed[i] = Some(PieSlice {
                data: &rows[i],
                value: v,
                index: position,
                start_angle: a0,
                end_angle: a1,
                pad_angle: pad.abs(),
            });
            a0 = a1;
        }

        Ok(placed.into_iter().flatten().collect())
    }
}

/// Full-circle pie over `rows` with no padding. See [`Pie::layout`].
///
/// ```rust
/// use std::f64::consts::PI;
/// use tegn::layout::pie;
///
/// let slices = pie(&[1.0, 1.0, 2.0], |v| *v, None).unwrap();
///
/// assert_eq!(slices[0].start_angle, 0.0);
/// assert_eq!(slices[0].end_angle, PI / 2.0);
/// assert_eq!(slices[1].end_angle, PI);
/// assert_eq!(slices[2].end_angle, 2.0 * PI);
/// ```
pub fn pie<'a, T>(
    rows: &'a [T],
    value: impl Fn(&T) -> f64,
    sort: Option<&dyn Fn(&T, &T) -> Ordering>,
) -> Result<Vec<PieSlice<'a, T>>> {
    Pie::default().layout(rows, value, sort)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_angles_cover_the_circle() {
        let slices = pie(&[2.0, 5.0, 1.0], |v| *v, None).unwrap();
        let total: f64 = slices.iter().map(PieSlice::sweep).sum();
        assert!((total - TAU).abs() < EPS);
        for pair in slices.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
    }

    #[test]
    fn test_sort_reorders_angles_not_output() {
        let desc = |a: &f64, b: &f64| b.total_cmp(a);
        let slices = pie(&[1.0, 3.0], |v| *v, Some(&desc)).unwrap();
        assert_eq!(*slices[0].data, 1.0);
        assert_eq!(slices[0].index, 1);
        assert_eq!(slices[1].start_angle, 0.0);
        assert!((slices[0].start_angle - 1.5 * PI).abs() < EPS);
    }

    #[test]
    fn test_non_positive_values_get_zero_width() {
        let slices = pie(&[1.0, -4.0, f64::NAN, 1.0], |v| *v, None).unwrap();
        assert_eq!(slices.len(), 4);
        assert_eq!(slices[1].sweep(), 0.0);
        assert_eq!(slices[1].start_angle, PI);
        assert_eq!(slices[2].start_angle, PI);
        assert_eq!(slices[2].value, 0.0);
    }

    #[test]
    fn test_all_zero_values() {
        let slices = pie(&[0.0, 0.0], |v| *v, None).unwrap();
        assert!(slices.iter().all(|s| s.sweep() == 0.0));
    }

    #[test]
    fn test_custom_span_and_padding() {
        let layout = Pie::new().start_angle(-PI / 2.0).end_angle(PI / 2.0).pad_angle(0.1);
        let slices = layout.layout(&[1.0, 1.0], |v| *v, None).unwrap();
        assert_eq!(slices[0].start_angle, -PI / 2.0);
        assert!((slices[1].end_angle - PI / 2.0).abs() < EPS);
        assert!((slices[0].sweep() - PI / 2.0).abs() < EPS);
        assert_eq!(slices[0].pad_angle, 0.1);
    }

    #[test]
    fn test_empty_rows() {
        let rows: [f64; 0] = [];
        assert_eq!(
            pie(&rows, |v| *v, None).unwrap_err(),
            Error::EmptyDataset { layout: "pie" }
        );
    }
}
