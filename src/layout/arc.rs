use std::f64::consts::{PI, TAU};

use super::PieSlice;
use crate::path::PathBuilder;

const EPSILON: f64 = 1e-12;

/// Cartesian position of the point at `angle` (radians, clockwise from
/// 12 o'clock) and distance `radius` from the origin, in screen orientation
/// (y grows downward).
///
/// ```rust
/// use std::f64::consts::PI;
/// use tegn::layout::point_radial;
///
/// let (x, y) = point_radial(PI, 10.0);
/// assert!(x.abs() < 1e-9);
/// assert_eq!(y, 10.0);
/// ```
pub fn point_radial(angle: f64, radius: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Annular sector geometry for pie and donut charts.
///
/// Paths are centered on the origin; translate the element to position it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGenerator {
    inner_radius: f64,
    outer_radius: f64,
    pad_angle: Option<f64>,
}

impl ArcGenerator {
    /// Radii are reordered if given backwards.
    pub fn new(inner_radius: f64, outer_radius: f64) -> Self {
        let (inner_radius, outer_radius) = if inner_radius <= outer_radius {
            (inner_radius.max(0.0), outer_radius.max(0.0))
        } else {
            (outer_radius.max(0.0), inner_radius.max(0.0))
        };
        Self {
            inner_radius,
            outer_radius,
            pad_angle: None,
        }
    }

    /// Overrides the pad angle carried by each [`PieSlice`] and the one passed
    /// to [`ArcGenerator::path_between`].
    #[must_use]
    pub fn pad_angle(mut self, angle: f64) -> Self {
        self.pad_angle = Some(angle.max(0.0));
        self
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// SVG path data for a pie slice.
    pub fn path<T>(&self, slice: &PieSlice<'_, T>) -> String {
        self.path_between(slice.start_angle, slice.end_angle, slice.pad_angle)
    }

    /// Midpoint of the slice, halfway between the radii. Used to place labels.
    pub fn centroid<T>(&self, slice: &PieSlice<'_, T>) -> (f64, f64) {
        self.centroid_between(slice.start_angle, slice.end_angle)
    }

    pub fn centroid_between(&self, start_angle: f64, end_angle: f64) -> (f64, f64) {
        let r = (self.inner_radius + self.outer_radius) / 2.0;
        point_radial((start_angle + end_angle) / 2.0, r)
    }

    /// SVG path data for the sector from `start_angle` to `end_angle`.
    ///
    /// `pad_angle` (or the generator's own, when set) is removed from the
    /// sector, half on each side, with the gap kept at constant width along
    /// both edges.
    ///
    /// ```rust
    /// use std::f64::consts::PI;
    /// use tegn::layout::ArcGenerator;
    ///
    /// let donut = ArcGenerator::new(5.0, 10.0);
    /// assert_eq!(
    ///     donut.path_between(0.0, PI / 2.0, 0.0),
    ///     "M0,-10A10,10,0,0,1,10,0L5,0A5,5,0,0,0,0,-5Z"
    /// );
    /// ```
    pub fn path_between(&self, start_angle: f64, end_angle: f64, pad_angle: f64) -> String {
        let (r0, r1) = (self.inner_radius, self.outer_radius);
        let mut path = PathBuilder::new();

        if r1 <= EPSILON {
            path.move_to(0.0, 0.0).close();
            return path.finish();
        }

        let clockwise = end_angle >= start_angle;
        let da = (end_angle - start_angle).abs();

        if da >= TAU - EPSILON {
            full_circle(&mut path, start_angle, r1, clockwise);
            if r0 > EPSILON {
                full_circle(&mut path, start_angle, r0, !clockwise);
            }
            path.close();
            return path.finish();
        }

        let half_pad = self.pad_angle.unwrap_or(pad_angle) / 2.0;
        let pad_radius = (r0 * r0 + r1 * r1).sqrt();
        let (a10, a11, da1) = shrink(start_angle, end_angle, da, r1, half_pad, pad_radius);
        let (a00, a01, da0) = shrink(start_angle, end_angle, da, r0, half_pad, pad_radius);

        let (x, y) = point_radial(a10, r1);
        path.move_to(x, y);
        if da1 > EPSILON {
            let (x, y) = point_radial(a11, r1);
            path.arc_to(r1, da1 > PI, clockwise, x, y);
        }

        if r0 > EPSILON {
            let (x, y) = point_radial(a01, r0);
            path.line_to(x, y);
            if da0 > EPSILON {
                let (x, y) = point_radial(a00, r0);
                path.arc_to(r0, da0 > PI, !clockwise, x, y);
            }
        } else {
            path.line_to(0.0, 0.0);
        }
        path.close();
        path.finish()
    }
}

/// Start and end angle at `radius` after removing the padding, plus the
/// remaining sweep. A sector narrower than its padding collapses to its
/// middle angle.
fn shrink(a0: f64, a1: f64, da: f64, radius: f64, half_pad: f64, pad_radius: f64) -> (f64, f64, f64) {
    if half_pad <= EPSILON || radius <= EPSILON {
        return (a0, a1, da);
    }
    let p = (pad_radius / radius * half_pad.sin()).clamp(-1.0, 1.0).asin();
    let remaining = da - 2.0 * p;
    if remaining > EPSILON {
        let p = if a1 >= a0 { p } else { -p };
        (a0 + p, a1 - p, remaining)
    } else {
        let mid = (a0 + a1) / 2.0;
        (mid, mid, 0.0)
    }
}

fn full_circle(path: &mut PathBuilder, start: f64, r: f64, clockwise: bool) {
    let half = if clockwise { PI } else { -PI };
    let (x0, y0) = point_radial(start, r);
    let (x1, y1) = point_radial(start + half, r);
    path.move_to(x0, y0)
        .arc_to(r, true, clockwise, x1, y1)
        .arc_to(r, true, clockwise, x0, y0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::pie;

    #[test]
    fn test_wedge_without_hole() {
        let wedge = ArcGenerator::new(0.0, 10.0);
        assert_eq!(
            wedge.path_between(0.0, PI / 2.0, 0.0),
            "M0,-10A10,10,0,0,1,10,0L0,0Z"
        );
    }

    #[test]
    fn test_large_arc_flag() {
        let wedge = ArcGenerator::new(0.0, 10.0);
        let d = wedge.path_between(0.0, 1.5 * PI, 0.0);
        assert_eq!(d, "M0,-10A10,10,0,1,1,-10,0L0,0Z");
    }

    #[test]
    fn test_full_circle() {
        let disc = ArcGenerator::new(0.0, 10.0);
        assert_eq!(
            disc.path_between(0.0, TAU, 0.0),
            "M0,-10A10,10,0,1,1,0,10A10,10,0,1,1,0,-10Z"
        );

        let ring = ArcGenerator::new(5.0, 10.0);
        assert_eq!(
            ring.path_between(0.0, TAU, 0.0),
            "M0,-10A10,10,0,1,1,0,10A10,10,0,1,1,0,-10M0,-5A5,5,0,1,0,0,5A5,5,0,1,0,0,-5Z"
        );
    }

    #[test]
    fn test_padding_shrinks_sector() {
        let donut = ArcGenerator::new(5.0, 10.0).pad_angle(0.2);
        let plain = ArcGenerator::new(5.0, 10.0);
        assert_ne!(
            donut.path_between(0.0, PI / 2.0, 0.0),
            plain.path_between(0.0, PI / 2.0, 0.0)
        );
        // start point is rotated clockwise off 12 o'clock
        let d = donut.path_between(0.0, PI / 2.0, 0.0);
        assert!(d.starts_with("M2.") || d.starts_with("M1."), "{d}");
    }

    #[test]
    fn test_generator_pad_overrides_argument() {
        let donut = ArcGenerator::new(5.0, 10.0).pad_angle(0.2);
        let plain = ArcGenerator::new(5.0, 10.0);
        assert_eq!(
            donut.path_between(0.0, PI / 2.0, 0.0),
            plain.path_between(0.0, PI / 2.0, 0.2)
        );
        assert_eq!(
            donut.path_between(0.0, PI / 2.0, 0.05),
            donut.path_between(0.0, PI / 2.0, 0.0)
        );
    }

    #[test]
    fn test_tiny_sector_collapses_under_padding() {
        let donut = ArcGenerator::new(5.0, 10.0);
        let d = donut.path_between(0.0, 0.01, 0.5);
        assert!(!d.contains('A'), "{d}");
    }

    #[test]
    fn test_centroid_and_slices() {
        let slices = pie(&[1.0, 1.0], |v| *v, None).unwrap();
        let donut = ArcGenerator::new(4.0, 8.0);
        let (x, y) = donut.centroid(&slices[0]);
        assert!((x - 6.0).abs() < 1e-9 && y.abs() < 1e-9);
        assert_eq!(donut.path(&slices[1]), donut.path_between(PI, TAU, 0.0));
    }

    #[test]
    fn test_zero_radius() {
        assert_eq!(ArcGenerator::new(0.0, 0.0).path_between(0.0, 1.0, 0.0), "M0,0Z");
        let swapped = ArcGenerator::new(10.0, 5.0);
        assert_eq!(swapped.inner_radius(), 5.0);
    }
}
