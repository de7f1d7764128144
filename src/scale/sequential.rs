use std::fmt;
use std::marker::PhantomData;

use super::{Scale, util};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transform {
    Identity,
    Sqrt,
}

impl Transform {
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::Sqrt => x.signum() * x.abs().sqrt(),
        }
    }
}

/// Sequential scale: normalizes a numeric domain to `[0, 1]` and feeds the
/// result to an interpolator, typically a color ramp.
///
/// The normalized value is clamped to `[0, 1]` unless clamping is disabled,
/// since most interpolators are only meaningful on the unit interval.
///
/// ```rust
/// use tegn::color::{Rgb, interpolate_rgb};
/// use tegn::scale::{Scale, Sequential};
///
/// let heat = Sequential::new([0.0, 10.0], interpolate_rgb(Rgb::WHITE, Rgb::new(255, 0, 0)));
///
/// assert_eq!(heat.apply(&0.0), Rgb::WHITE);
/// assert_eq!(heat.apply(&10.0), Rgb::new(255, 0, 0));
/// assert_eq!(heat.apply(&99.0), Rgb::new(255, 0, 0));
/// ```
#[derive(Clone)]
pub struct Sequential<T, F> {
    domain: (f64, f64),
    interpolator: F,
    clamp: bool,
    transform: Transform,
    _output: PhantomData<fn() -> T>,
}

impl<T, F> Sequential<T, F>
where
    F: Fn(f64) -> T,
{
    pub fn new(domain: [f64; 2], interpolator: F) -> Self {
        Self {
            domain: (domain[0], domain[1]),
            interpolator,
            clamp: true,
            transform: Transform::Identity,
            _output: PhantomData,
        }
    }

    /// Normalizes in square-root space, spreading out small values.
    pub fn sqrt(domain: [f64; 2], interpolator: F) -> Self {
        Self {
            transform: Transform::Sqrt,
            ..Self::new(domain, interpolator)
        }
    }

    /// Rejects zero-width or non-finite domains.
    pub fn try_new(domain: [f64; 2], interpolator: F) -> Result<Self> {
        if domain[0] == domain[1] || !domain[0].is_finite() || !domain[1].is_finite() {
            return Err(Error::DomainDegenerate {
                min: domain[0],
                max: domain[1],
            });
        }
        Ok(Self::new(domain, interpolator))
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The `[0, 1]` parameter handed to the interpolator for `value`.
    pub fn normalize(&self, value: f64) -> f64 {
        let t0 = self.transform.apply(self.domain.0);
        let t1 = self.transform.apply(self.domain.1);
        if t0 == t1 {
            return 0.5;
        }
        let t = (self.transform.apply(value) - t0) / (t1 - t0);
        if self.clamp { util::clamp_to(t, 0.0, 1.0) } else { t }
    }
}

impl<T, F> Scale for Sequential<T, F>
where
    F: Fn(f64) -> T,
{
    type Domain = f64;
    type Output = T;

    fn apply(&self, value: &f64) -> T {
        (self.interpolator)(self.normalize(*value))
    }
}

impl<T, F> fmt::Debug for Sequential<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequential")
            .field("domain", &self.domain)
            .field("clamp", &self.clamp)
            .field("transform", &self.transform)
            .finish_non_exhaustive()
    }
}
