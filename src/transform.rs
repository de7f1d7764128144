//! Coordinate frames between the drawing surface and the data.
//!
//! Charts lay out a plot area inside the surface by subtracting [`Margins`],
//! then configure their scales with pixel ranges local to that area (a
//! vertical axis typically runs `[height, 0]` so larger values sit higher).
//! A [`Transform`] adds the plot area's origin back, so scale output lands
//! on surface coordinates, and runs the inverse path for hit testing and
//! brushing.
//!
//! - [`ScreenRect`] / [`ScreenPoint`]: pixels, origin top-left, y down.
//! - [`PlotRect`] / [`PlotPoint`]: domain values.
//!
//! ```rust
//! use tegn::scale::Linear;
//! use tegn::transform::{Margins, PlotPoint, ScreenPoint, ScreenRect, Transform};
//!
//! let surface = ScreenRect::new(0.0, 0.0, 640.0, 480.0);
//! let area = Margins::new(20.0, 20.0, 40.0, 60.0).inset(surface);
//! assert_eq!(area, ScreenRect::new(60.0, 20.0, 560.0, 420.0));
//!
//! let x = Linear::new([0.0, 100.0], [0.0, area.width]);
//! let y = Linear::new([0.0, 50.0], [area.height, 0.0]);
//! let transform = Transform::new(area, &x, &y);
//!
//! let pixel = transform.to_screen(&PlotPoint::new(50.0, 50.0)).unwrap();
//! assert_eq!(pixel, ScreenPoint::new(340.0, 20.0));
//!
//! let back = transform.from_screen(&pixel).unwrap();
//! assert_eq!(back, PlotPoint::new(50.0, 50.0));
//! ```

use num_traits::Float;

use crate::error::Result;
use crate::scale::util::sorted_pair;
use crate::scale::{Invert, Scale};

/// A rectangle in surface pixels. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanned by two corners, in either order. This is the shape
    /// of a drag selection.
    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Self {
        let (x0, x1) = sorted_pair(a.x, b.x);
        let (y0, y1) = sorted_pair(a.y, b.y);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: &ScreenPoint) -> bool {
        let (x0, x1) = sorted_pair(self.x, self.max_x());
        let (y0, y1) = sorted_pair(self.y, self.max_y());
        (x0..=x1).contains(&point.x) && (y0..=y1).contains(&point.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Space reserved around the plot area for axes and labels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// Margins in CSS order: top, right, bottom, left.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// The plot area left inside `outer`. Never negative in size.
    pub fn inset(&self, outer: ScreenRect) -> ScreenRect {
        ScreenRect {
            x: outer.x + self.left,
            y: outer.y + self.top,
            width: (outer.width - self.left - self.right).max(0.0),
            height: (outer.height - self.top - self.bottom).max(0.0),
        }
    }
}

/// A point in data coordinates. The axes may use different domain types.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlotPoint<X = f64, Y = X> {
    pub x: X,
    pub y: Y,
}

impl<X, Y> PlotPoint<X, Y> {
    pub const fn new(x: X, y: Y) -> Self {
        Self { x, y }
    }
}

/// A rectangle in data coordinates.
///
/// Widths and heights may be negative; the query methods compare sorted
/// endpoints.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlotRect<D = f64> {
    pub x: D,
    pub y: D,
    pub width: D,
    pub height: D,
}

impl<D: Float> PlotRect<D> {
    /// Rectangle with non-negative spans covering both points.
    ///
    /// ```
    /// use tegn::transform::{PlotPoint, PlotRect};
    ///
    /// let rect = PlotRect::from_points(PlotPoint::new(50.0, 20.0), PlotPoint::new(10.0, 80.0));
    /// assert_eq!((rect.x, rect.y, rect.width, rect.height), (10.0, 20.0, 40.0, 60.0));
    /// ```
    pub fn from_points(p1: PlotPoint<D>, p2: PlotPoint<D>) -> Self {
        let (x_min, x_max) = sorted_pair(p1.x, p2.x);
        let (y_min, y_max) = sorted_pair(p1.y, p2.y);
        Self {
            x: x_min,
            y: y_min,
            width: x_max - x_min,
            height: y_max - y_min,
        }
    }

    pub fn from_center(center: PlotPoint<D>, width: D, height: D) -> Self {
        let two = D::one() + D::one();
        Self {
            x: center.x - width / two,
            y: center.y - height / two,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> D {
        self.x + self.width
    }

    pub fn max_y(&self) -> D {
        self.y + self.height
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: &PlotPoint<D>) -> bool {
        self.contains_x(&point.x) && self.contains_y(&point.y)
    }

    pub fn contains_x(&self, value: &D) -> bool {
        let (lo, hi) = sorted_pair(self.x, self.max_x());
        *value >= lo && *value <= hi
    }

    pub fn contains_y(&self, value: &D) -> bool {
        let (lo, hi) = sorted_pair(self.y, self.max_y());
        *value >= lo && *value <= hi
    }
}

/// Maps data points into a plot area through one scale per axis.
///
/// Scale output is read as a pixel offset from the area's top-left corner.
/// Scales whose output is optional (band and point scales) make the
/// corresponding conversions return `None` for unknown categories.
#[derive(Debug, Clone, Copy)]
pub struct Transform<'a, X, Y> {
    area: ScreenRect,
    x_scale: &'a X,
    y_scale: &'a Y,
}

impl<'a, X, Y> Transform<'a, X, Y>
where
    X: Scale,
    Y: Scale,
    X::Output: Into<Option<f64>>,
    Y::Output: Into<Option<f64>>,
{
    pub fn new(area: ScreenRect, x_scale: &'a X, y_scale: &'a Y) -> Self {
        Self {
            area,
            x_scale,
            y_scale,
        }
    }

    pub fn area(&self) -> ScreenRect {
        self.area
    }

    pub fn x_to_screen(&self, x: &X::Domain) -> Option<f64> {
        self.x_scale.apply(x).into().map(|px| self.area.x + px)
    }

    pub fn y_to_screen(&self, y: &Y::Domain) -> Option<f64> {
        self.y_scale.apply(y).into().map(|px| self.area.y + px)
    }

    pub fn to_screen(&self, point: &PlotPoint<X::Domain, Y::Domain>) -> Option<ScreenPoint> {
        Some(ScreenPoint::new(
            self.x_to_screen(&point.x)?,
            self.y_to_screen(&point.y)?,
        ))
    }
}

impl<X, Y> Transform<'_, X, Y>
where
    X: Invert<Output = f64>,
    Y: Invert<Output = f64>,
{
    pub fn x_from_screen(&self, px: f64) -> Result<X::Domain> {
        self.x_scale.invert(&(px - self.area.x))
    }

    pub fn y_from_screen(&self, py: f64) -> Result<Y::Domain> {
        self.y_scale.invert(&(py - self.area.y))
    }

    pub fn from_screen(&self, point: &ScreenPoint) -> Result<PlotPoint<X::Domain, Y::Domain>> {
        Ok(PlotPoint::new(
            self.x_from_screen(point.x)?,
            self.y_from_screen(point.y)?,
        ))
    }

    /// Domain interval selected by a horizontal brush from `a` to `b`,
    /// returned in pixel order (left edge first).
    pub fn brush_x(&self, a: f64, b: f64) -> Result<(X::Domain, X::Domain)> {
        let (left, right) = sorted_pair(a, b);
        Ok((self.x_from_screen(left)?, self.x_from_screen(right)?))
    }

    /// Domain interval selected by a vertical brush, top edge first.
    pub fn brush_y(&self, a: f64, b: f64) -> Result<(Y::Domain, Y::Domain)> {
        let (top, bottom) = sorted_pair(a, b);
        Ok((self.y_from_screen(top)?, self.y_from_screen(bottom)?))
    }
}

impl<X, Y> Transform<'_, X, Y>
where
    X: Invert<Domain = f64, Output = f64>,
    Y: Invert<Domain = f64, Output = f64>,
{
    /// Data rectangle selected by a two-dimensional brush.
    pub fn brush(&self, selection: ScreenRect) -> Result<PlotRect> {
        let a = self.from_screen(&ScreenPoint::new(selection.x, selection.y))?;
        let b = self.from_screen(&ScreenPoint::new(selection.max_x(), selection.max_y()))?;
        Ok(PlotRect::from_points(a, b))
    }

    /// Data rectangle currently visible in the plot area.
    pub fn visible(&self) -> Result<PlotRect> {
        self.brush(self.area)
    }
}
