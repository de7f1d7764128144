//! Scales map data values (the domain) to visual values (the range).
//!
//! Every scale implements [`Scale`]. Scales with a mathematically defined
//! inverse implement [`Invert`], which is what brushing and hit testing use.
//! Continuous numeric scales additionally implement [`Continuous`], the
//! normalized `[0, 1]` view that supports pan, zoom and tick generation.
//!
//! | Scale | Domain | Output | Invertible |
//! | --- | --- | --- | --- |
//! | [`Linear`] | number | number | yes |
//! | [`RadialSqrt`] | number | radius | yes |
//! | [`Time`] | [`Timestamp`] | number | yes |
//! | [`Band`] | category | slot start | slot lookup |
//! | [`Point`] | category | position | nearest point |
//! | [`Sequential`] | number | color | no |
//! | [`Ordinal`] | category | any | no |
//! | [`Quantize`] | number | any | extent only |

mod band;
mod linear;
mod ordinal;
mod radial;
mod sequential;
mod tick_iter;
mod time;
pub mod util;

pub use band::{Band, Point};
pub use linear::Linear;
pub use ordinal::{Ordinal, Quantize};
pub use radial::RadialSqrt;
pub use sequential::Sequential;
pub use tick_iter::TickIter;
pub use time::{Time, TimeInterval, TimeUnit, Timestamp, tick_interval};

use tracing::trace;

use crate::error::Result;

/// A tick mark produced by a scale.
///
/// `level` 0 is a major (labelled) tick, level 1 a minor tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick<D> {
    pub value: D,
    pub level: u8,
}

/// A mapping from domain values to output values.
pub trait Scale {
    type Domain;
    type Output;

    /// Maps a domain value to its output value.
    fn apply(&self, value: &Self::Domain) -> Self::Output;
}

/// Scales whose mapping can be reversed.
pub trait Invert: Scale {
    /// Maps an output value back into the domain.
    ///
    /// Discrete scales fail with [`Error::OutOfRangeLookup`](crate::Error::OutOfRangeLookup)
    /// when `output` hits no slot. Clamped continuous scales clamp `output`
    /// first, so every value beyond the range inverts to a domain endpoint.
    fn invert(&self, output: &Self::Output) -> Result<Self::Domain>;
}

/// Continuous scales expose a normalized `[0, 1]` parameterisation of their
/// domain. `0` corresponds to the first domain endpoint and `1` to the second.
pub trait Continuous: Scale {
    type Normalized;

    /// Returns the domain endpoints as set (not sorted).
    fn domain(&self) -> (&Self::Domain, &Self::Domain);

    fn set_domain(&mut self, min: Self::Domain, max: Self::Domain);

    /// Normalizes a domain value; out-of-domain values map beyond `[0, 1]`.
    fn normalize_opt(&self, value: &Self::Domain) -> Option<Self::Normalized>;

    fn denormalize_opt(&self, t: Self::Normalized) -> Option<Self::Domain>;

    /// Shifts the domain by `delta_norm` times its span.
    fn pan_opt(&mut self, delta_norm: Self::Normalized) -> Option<()>;

    /// Divides the domain span by `factor` around `anchor_norm` (default: centre).
    fn zoom_opt(&mut self, factor: Self::Normalized, anchor_norm: Option<Self::Normalized>)
    -> Option<()>;

    /// Grows the domain so it covers `[other_min, other_max]`.
    fn extend_domain(&mut self, other_min: &Self::Domain, other_max: &Self::Domain);

    /// Ticks aiming for roughly `count` major intervals.
    fn tick_iter(&self, count: usize) -> TickIter<Self::Domain>;

    fn ticks(&self, count: usize) -> Vec<Tick<Self::Domain>> {
        self.tick_iter(count).collect()
    }

    /// Only the level-0 ticks, the ones axes label.
    fn major_ticks(&self, count: usize) -> Vec<Self::Domain> {
        self.tick_iter(count).majors().collect()
    }

    /// Like [`Continuous::pan_opt`]; a failure leaves the domain untouched.
    fn pan(&mut self, delta_norm: Self::Normalized) {
        if self.pan_opt(delta_norm).is_none() {
            trace!("pan skipped, domain unchanged");
        }
    }

    /// Like [`Continuous::zoom_opt`]; a non-positive factor or failed
    /// conversion leaves the domain untouched.
    fn zoom(&mut self, factor: Self::Normalized, anchor_norm: Option<Self::Normalized>) {
        if self.zoom_opt(factor, anchor_norm).is_none() {
            trace!("zoom skipped, domain unchanged");
        }
    }
}
