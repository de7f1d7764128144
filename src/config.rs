//! Per-chart configuration.
//!
//! A [`ChartConfig`] gathers the knobs one chart instance needs: the data
//! domain and pixel range of its value axis, band padding, clamping, the
//! binning and stacking strategies, and transition timing. Build it with
//! [`ChartConfig::builder`]; validation happens once in
//! [`ChartConfigBuilder::build`].

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::layout::{Bin, StackOffset, StackOrder, StackedSeries, Thresholds, bin, stack};
use crate::reconcile::Reconciler;
use crate::scale::{Band, Linear, Point, RadialSqrt};
use crate::transition::{Easing, TransitionConfig};

pub use crate::layout::SimulationConfig;

/// Validated configuration of one chart.
///
/// ```rust
/// use std::time::Duration;
/// use tegn::config::ChartConfig;
/// use tegn::scale::Scale;
///
/// let config = ChartConfig::builder()
///     .domain([0.0, 100.0])
///     .range([0.0, 500.0])
///     .duration(Duration::from_millis(400))
///     .build()
///     .unwrap();
///
/// let y = config.linear_scale().unwrap();
/// assert_eq!(y.apply(&50.0), 250.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub domain: [f64; 2],
    pub range: [f64; 2],
    pub padding: f64,
    pub clamp: bool,
    pub thresholds: Thresholds,
    pub offset: StackOffset,
    pub order: StackOrder,
    pub transition: TransitionConfig,
}

impl ChartConfig {
    pub fn builder() -> ChartConfigBuilder {
        ChartConfigBuilder::default()
    }

    /// Linear scale over the configured domain and range.
    pub fn linear_scale(&self) -> Result<Linear> {
        Ok(Linear::try_new(self.domain, self.range)?.with_clamp(self.clamp))
    }

    /// Square-root radial scale over the configured domain and range.
    pub fn radial_scale(&self) -> Result<RadialSqrt> {
        Ok(RadialSqrt::try_new(self.domain, self.range)?.with_clamp(self.clamp))
    }

    /// Band scale over `keys` with the configured range and padding.
    pub fn band_scale<K, I>(&self, keys: I) -> Band<K>
    where
        K: Eq + Hash + Clone,
        I: IntoIterator<Item = K>,
    {
        Band::new(keys, self.range).padding(self.padding)
    }

    pub fn point_scale<K, I>(&self, keys: I) -> Point<K>
    where
        K: Eq + Hash + Clone,
        I: IntoIterator<Item = K>,
    {
        Point::new(keys, self.range).padding(self.padding)
    }

    /// Bins `items` over the configured domain and thresholds.
    pub fn bin<'a, T>(&self, items: &'a [T], value: impl Fn(&T) -> f64) -> Result<Vec<Bin<'a, T>>> {
        bin(items, value, self.domain, &self.thresholds)
    }

    /// Stacks `keys` over `rows` with the configured offset and order.
    pub fn stack<R, K>(
        &self,
        rows: &[R],
        keys: &[K],
        value: impl Fn(&R, &K) -> f64,
    ) -> Result<Vec<StackedSeries<K>>>
    where
        K: Clone + Eq + Hash + Debug,
    {
        stack(rows, keys, value, self.offset, self.order)
    }

    /// An empty reconciler using the configured transition.
    pub fn reconciler<K>(&self) -> Reconciler<K> {
        Reconciler::new(self.transition)
    }
}

/// Builder for [`ChartConfig`].
///
/// `domain` and `range` are required; everything else has a default.
#[derive(Debug, Clone, Default)]
pub struct ChartConfigBuilder {
    domain: Option<[f64; 2]>,
    range: Option<[f64; 2]>,
    padding: Option<f64>,
    clamp: bool,
    thresholds: Thresholds,
    offset: StackOffset,
    order: StackOrder,
    transition: TransitionConfig,
}

impl ChartConfigBuilder {
    #[inline]
    pub fn domain(mut self, domain: [f64; 2]) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Takes the domain from a data extent such as [`stats::extent`](crate::stats::extent).
    #[inline]
    pub fn domain_from(mut self, extent: (f64, f64)) -> Self {
        self.domain = Some([extent.0, extent.1]);
        self
    }

    #[inline]
    pub fn range(mut self, range: [f64; 2]) -> Self {
        self.range = Some(range);
        self
    }

    /// Band padding as a fraction of the step, in `[0, 1)`. Defaults to 0.1.
    #[inline]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    #[inline]
    pub fn clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    #[inline]
    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[inline]
    pub fn offset(mut self, offset: StackOffset) -> Self {
        self.offset = offset;
        self
    }

    #[inline]
    pub fn order(mut self, order: StackOrder) -> Self {
        self.order = order;
        self
    }

    #[inline]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.transition.duration = duration;
        self
    }

    #[inline]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.transition.easing = easing;
        self
    }

    /// Parses the easing by name, e.g. `"cubic-in-out"`.
    pub fn easing_name(mut self, name: &str) -> Result<Self, ConfigError> {
        self.transition.easing = name.parse()?;
        Ok(self)
    }

    pub fn build(self) -> Result<ChartConfig, ConfigError> {
        let domain = self.domain.ok_or(ConfigError::MissingField("domain"))?;
        let range = self.range.ok_or(ConfigError::MissingField("range"))?;

        if !distinct_finite(domain) {
            return Err(ConfigError::InvalidDomain {
                low: domain[0],
                high: domain[1],
            });
        }
        if !distinct_finite(range) {
            return Err(ConfigError::InvalidRange {
                low: range[0],
                high: range[1],
            });
        }

        let padding = self.padding.unwrap_or(0.1);
        if !(0.0..1.0).contains(&padding) {
            return Err(ConfigError::InvalidPadding(padding));
        }
        if self.thresholds == Thresholds::Count(0) {
            return Err(ConfigError::ZeroThresholds);
        }

        Ok(ChartConfig {
            domain,
            range,
            padding,
            clamp: self.clamp,
            thresholds: self.thresholds,
            offset: self.offset,
            order: self.order,
            transition: self.transition,
        })
    }
}

impl From<ChartConfigBuilder> for Result<ChartConfig, ConfigError> {
    fn from(builder: ChartConfigBuilder) -> Self {
        builder.build()
    }
}

fn distinct_finite(pair: [f64; 2]) -> bool {
    pair[0].is_finite() && pair[1].is_finite() && pair[0] != pair[1]
}
