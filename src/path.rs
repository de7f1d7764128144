//! SVG path data generation.
//!
//! [`PathBuilder`] writes raw commands; the free functions turn point lists
//! into line, area and radial shapes. Points with a non-finite coordinate are
//! treated as gaps, splitting the shape into separate segments.

use std::fmt::Write;

use crate::layout::point_radial;

/// Interpolation between consecutive points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Curve {
    /// Straight segments.
    #[default]
    Linear,
    /// Straight segments, with each segment closed back to its first point.
    LinearClosed,
    /// Horizontal then vertical steps, changing at the midpoint between points.
    Step,
}

/// Incremental builder for the `d` attribute of an SVG `<path>`.
///
/// Coordinates are written with at most three decimals.
///
/// ```rust
/// use tegn::path::PathBuilder;
///
/// let mut path = PathBuilder::new();
/// path.move_to(0.0, 0.0);
/// path.line_to(10.0, 2.5);
/// path.close();
///
/// assert_eq!(path.finish(), "M0,0L10,2.5Z");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathBuilder {
    data: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.command('M', &[x, y])
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.command('L', &[x, y])
    }

    /// Elliptical arc with equal radii and no rotation.
    pub fn arc_to(&mut self, r: f64, large_arc: bool, sweep: bool, x: f64, y: f64) -> &mut Self {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        self.command('A', &[r, r, 0.0, flag(large_arc), flag(sweep), x, y])
    }

    pub fn close(&mut self) -> &mut Self {
        self.data.push('Z');
        self
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn finish(self) -> String {
        self.data
    }

    fn command(&mut self, name: char, args: &[f64]) -> &mut Self {
        self.data.push(name);
        for (i, v) in args.iter().enumerate() {
            if i > 0 {
                self.data.push(',');
            }
            push_number(&mut self.data, *v);
        }
        self
    }
}

fn push_number(out: &mut String, v: f64) {
    let rounded = (v * 1000.0).round() / 1000.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let _ = write!(out, "{rounded}");
}

fn is_defined(p: &(f64, f64)) -> bool {
    p.0.is_finite() && p.1.is_finite()
}

/// Appends one connected run of points to `path`.
fn trace_segment(path: &mut PathBuilder, points: &[(f64, f64)], curve: Curve, start_with_line: bool) {
    let Some(&(x0, y0)) = points.first() else {
        return;
    };
    if start_with_line {
        path.line_to(x0, y0);
    } else {
        path.move_to(x0, y0);
    }
    for w in points.windows(2) {
        let ((xa, ya), (xb, yb)) = (w[0], w[1]);
        if curve == Curve::Step {
            let mid = (xa + xb) / 2.0;
            path.line_to(mid, ya);
            path.line_to(mid, yb);
        }
        path.line_to(xb, yb);
    }
    if curve == Curve::LinearClosed {
        path.close();
    }
}

fn defined_runs(points: &[(f64, f64)]) -> impl Iterator<Item = &[(f64, f64)]> {
    points.split(|p| !is_defined(p)).filter(|run| !run.is_empty())
}

/// Path through `points`.
///
/// ```rust
/// use tegn::path::{Curve, line};
///
/// let d = line(&[(0.0, 10.0), (5.0, 0.0), (f64::NAN, 0.0), (8.0, 4.0)], Curve::Linear);
/// assert_eq!(d, "M0,10L5,0M8,4");
/// ```
pub fn line(points: &[(f64, f64)], curve: Curve) -> String {
    let mut path = PathBuilder::new();
    for run in defined_runs(points) {
        trace_segment(&mut path, run, curve, false);
    }
    path.finish()
}

/// Filled band between a baseline and a topline.
///
/// Each point is `(x, y0, y1)`: the topline is traced through `(x, y1)` and
/// the baseline back through `(x, y0)`.
pub fn area(points: &[(f64, f64, f64)], curve: Curve) -> String {
    let mut path = PathBuilder::new();
    let defined = |p: &(f64, f64, f64)| p.0.is_finite() && p.1.is_finite() && p.2.is_finite();
    for run in points.split(|p| !defined(p)).filter(|run| !run.is_empty()) {
        let top: Vec<(f64, f64)> = run.iter().map(|&(x, _, y1)| (x, y1)).collect();
        let base: Vec<(f64, f64)> = run.iter().rev().map(|&(x, y0, _)| (x, y0)).collect();
        let curve = if curve == Curve::LinearClosed { Curve::Linear } else { curve };
        trace_segment(&mut path, &top, curve, false);
        trace_segment(&mut path, &base, curve, true);
        path.close();
    }
    path.finish()
}

/// Line through `(angle, radius)` points around the origin.
///
/// Angles are clockwise from 12 o'clock, as in [`point_radial`].
pub fn line_radial(points: &[(f64, f64)], curve: Curve) -> String {
    let cartesian: Vec<(f64, f64)> = points.iter().map(|&(a, r)| point_radial(a, r)).collect();
    line(&cartesian, curve)
}

/// Radial band: each point is `(angle, inner_radius, outer_radius)`.
pub fn area_radial(points: &[(f64, f64, f64)], curve: Curve) -> String {
    let mut path = PathBuilder::new();
    let defined = |p: &(f64, f64, f64)| p.0.is_finite() && p.1.is_finite() && p.2.is_finite();
    for run in points.split(|p| !defined(p)).filter(|run| !run.is_empty()) {
        let outer: Vec<(f64, f64)> = run.iter().map(|&(a, _, r1)| point_radial(a, r1)).collect();
        let inner: Vec<(f64, f64)> = run.iter().rev().map(|&(a, r0, _)| point_radial(a, r0)).collect();
        if curve == Curve::LinearClosed {
            // two closed rings; the even-odd gap between them is the band
            trace_segment(&mut path, &outer, Curve::LinearClosed, false);
            trace_segment(&mut path, &inner, Curve::LinearClosed, false);
        } else {
            trace_segment(&mut path, &outer, curve, false);
            trace_segment(&mut path, &inner, curve, true);
            path.close();
        }
    }
    path.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_number_formatting() {
        let mut path = PathBuilder::new();
        path.move_to(-0.0001, 1.23456).line_to(1e6, -2.5);
        assert_eq!(path.as_str(), "M0,1.235L1000000,-2.5");
    }

    #[test]
    fn test_arc_command() {
        let mut path = PathBuilder::new();
        path.move_to(0.0, -10.0).arc_to(10.0, false, true, 10.0, 0.0);
        assert_eq!(path.finish(), "M0,-10A10,10,0,0,1,10,0");
    }

    #[test]
    fn test_closed_line() {
        let d = line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], Curve::LinearClosed);
        assert_eq!(d, "M0,0L1,0L1,1Z");
    }

    #[test]
    fn test_step_line() {
        let d = line(&[(0.0, 0.0), (2.0, 4.0)], Curve::Step);
        assert_eq!(d, "M0,0L1,0L1,4L2,4");
    }

    #[test]
    fn test_area_traces_top_then_base() {
        let d = area(&[(0.0, 0.0, 5.0), (10.0, 1.0, 6.0)], Curve::Linear);
        assert_eq!(d, "M0,5L10,6L10,1L0,0Z");
    }

    #[test]
    fn test_empty_shapes() {
        assert_eq!(line(&[], Curve::Linear), "");
        assert_eq!(area(&[(f64::NAN, 0.0, 0.0)], Curve::Linear), "");
    }

    #[test]
    fn test_radial_line() {
        let d = line_radial(&[(0.0, 10.0), (PI / 2.0, 10.0)], Curve::Linear);
        assert_eq!(d, "M0,-10L10,0");
    }

    #[test]
    fn test_radial_area_closed_makes_two_rings() {
        let d = area_radial(&[(0.0, 5.0, 10.0), (PI, 5.0, 10.0)], Curve::LinearClosed);
        assert_eq!(d, "M0,-10L0,10ZM0,5L0,-5Z");
    }
}
