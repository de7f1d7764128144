use super::{Continuous, Invert, Linear, Scale, TickIter};
use crate::error::{Error, Result};

/// Radial scale: linear in *squared* radius, so that ring area (not radius)
/// grows proportionally with the value.
///
/// For a domain value `v` normalized to `t`, the output radius `r` satisfies
/// `r² = r0² + t (r1² - r0²)`, hence `r² - r0² ∝ v - d0`. Radial bar charts
/// use this so long bars are not visually inflated.
///
/// ```rust
/// use tegn::scale::{RadialSqrt, Scale};
///
/// let r = RadialSqrt::new([0.0, 100.0], [0.0, 10.0]);
/// assert_eq!(r.apply(&100.0), 10.0);
/// assert!((r.apply(&25.0) - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct RadialSqrt {
    linear: Linear<f64, f64>,
    range: (f64, f64),
    clamp: bool,
}

fn signed_square(x: f64) -> f64 {
    x.signum() * x * x
}

fn signed_sqrt(x: f64) -> f64 {
    x.signum() * x.abs().sqrt()
}

impl RadialSqrt {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self {
            linear: Linear::new(domain, [0.0, 1.0]),
            range: (range[0], range[1]),
            clamp: false,
        }
    }

    /// Like [`RadialSqrt::new`] but rejects zero-width domains.
    pub fn try_new(domain: [f64; 2], range: [f64; 2]) -> Result<Self> {
        Linear::try_new(domain, [0.0, 1.0])?;
        Ok(Self::new(domain, range))
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Inner radius, the output for the first domain endpoint.
    pub fn inner_radius(&self) -> f64 {
        self.range.0
    }

    pub fn nice(&mut self, count: usize) {
        self.linear.nice(count);
    }

    fn squared_range(&self) -> (f64, f64) {
        (signed_square(self.range.0), signed_square(self.range.1))
    }
}

impl Scale for RadialSqrt {
    type Domain = f64;
    type Output = f64;

    fn apply(&self, value: &f64) -> f64 {
        let mut t = self.linear.apply(value);
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        let (s0, s1) = self.squared_range();
        signed_sqrt(s0 + t * (s1 - s0))
    }
}

impl Invert for RadialSqrt {
    fn invert(&self, output: &f64) -> Result<f64> {
        let (s0, s1) = self.squared_range();
        if s0 == s1 {
            return Err(Error::DomainDegenerate {
                min: self.range.0,
                max: self.range.1,
            });
        }
        let mut t = (signed_square(*output) - s0) / (s1 - s0);
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        self.linear.invert(&t)
    }
}

impl Continuous for RadialSqrt {
    type Normalized = f64;

    fn domain(&self) -> (&f64, &f64) {
        self.linear.domain()
    }

    fn set_domain(&mut self, min: f64, max: f64) {
        self.linear.set_domain(min, max);
    }

    fn normalize_opt(&self, value: &f64) -> Option<f64> {
        self.linear.normalize_opt(value)
    }

    fn denormalize_opt(&self, t: f64) -> Option<f64> {
        self.linear.denormalize_opt(t)
    }

    fn pan_opt(&mut self, delta_norm: f64) -> Option<()> {
        self.linear.pan_opt(delta_norm)
    }

    fn zoom_opt(&mut self, factor: f64, anchor_norm: Option<f64>) -> Option<()> {
        self.linear.zoom_opt(factor, anchor_norm)
    }

    fn extend_domain(&mut self, other_min: &f64, other_max: &f64) {
        self.linear.extend_domain(other_min, other_max);
    }

    fn tick_iter(&self, count: usize) -> TickIter<f64> {
        self.linear.tick_iter(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radial_area_is_proportional_to_value() {
        let inner = 40.0;
        let scale = RadialSqrt::new([0.0, 1000.0], [inner, 200.0]);

        let area = |v: f64| scale.apply(&v).powi(2) - inner * inner;
        let ratio = area(500.0) / area(250.0);
        assert!((ratio - 2.0).abs() < 1e-9);
        assert!((scale.apply(&0.0) - inner).abs() < 1e-12);
        assert!((scale.apply(&1000.0) - 200.0).abs() < 1e-12);
    }

    #[test]
    fn test_radial_round_trip() {
        let scale = RadialSqrt::new([0.0, 50.0], [10.0, 90.0]);
        for v in [0.0, 3.0, 12.5, 33.3, 50.0] {
            let back = scale.invert(&scale.apply(&v)).unwrap();
            assert!((back - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_radial_clamp() {
        let scale = RadialSqrt::new([0.0, 100.0], [0.0, 10.0]).with_clamp(true);
        assert_eq!(scale.apply(&400.0), 10.0);
        assert_eq!(scale.apply(&-1.0), 0.0);
    }

    #[test]
    fn test_radial_try_new_rejects_degenerate() {
        assert!(RadialSqrt::try_new([1.0, 1.0], [0.0, 10.0]).is_err());
    }
}
