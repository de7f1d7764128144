use std::fmt;
use std::sync::Arc;

use super::{Continuous, Invert, Scale, Tick, TickIter, util};
use crate::error::{Error, Result};
use num_traits::Float;

type TickGenerator<D, R> = Arc<dyn Fn(&Linear<D, R>, usize) -> TickIter<D> + Send + Sync>;

/// Linear scale: affine mapping between a numeric domain and a numeric range.
///
/// `Linear` maps `v` to `range[0] + (v - domain[0]) / (domain[1] - domain[0]) * (range[1] - range[0])`.
/// This is the workhorse for bar heights, axis positions and anything else
/// where equal data differences should look like equal pixel differences.
///
/// # Type Parameters
///
/// - `D`: Domain type (the data values, typically `f64`)
/// - `R`: Range type (typically `f64` pixels, also used for the normalized `[0, 1]` view)
///
/// # Features
///
/// - **Bidirectional mapping**: [`Scale::apply`] and [`Invert::invert`]
/// - **Clamping**: optional restriction of the output to the range bounds
/// - **Nice domains**: [`Linear::nice`] rounds the domain out to tick boundaries
/// - **Pan and zoom**: through the [`Continuous`] trait
/// - **Reversed axes**: endpoints are kept exactly as given, so `range = [height, 0]`
///   gives the usual upward y axis
///
/// # Examples
///
/// ## Basic Usage
///
/// ```rust
/// use tegn::scale::{Invert, Linear, Scale};
///
/// let x = Linear::new([0.0, 100.0], [0.0, 500.0]);
///
/// assert_eq!(x.apply(&50.0), 250.0);
/// assert_eq!(x.invert(&250.0).unwrap(), 50.0);
///
/// // Values outside the domain extrapolate
/// assert_eq!(x.apply(&120.0), 600.0);
/// ```
///
/// ## Clamping
///
/// ```rust
/// use tegn::scale::{Linear, Scale};
///
/// let y = Linear::new([0.0, 10.0], [300.0, 0.0]).with_clamp(true);
///
/// assert_eq!(y.apply(&5.0), 150.0);
/// assert_eq!(y.apply(&20.0), 0.0);
/// assert_eq!(y.apply(&-5.0), 300.0);
/// ```
///
/// ## Degenerate Domains
///
/// ```rust
/// use tegn::{Error, scale::Linear};
///
/// let err = Linear::try_new([3.0, 3.0], [0.0, 100.0]).unwrap_err();
/// assert!(matches!(err, Error::DomainDegenerate { .. }));
/// ```
///
/// ## Ticks and Nice Domains
///
/// ```rust
/// use tegn::scale::{Continuous, Linear};
///
/// let mut y = Linear::new([0.0, 97.3], [400.0, 0.0]);
/// y.nice(10);
/// assert_eq!(y.domain(), (&0.0, &100.0));
///
/// let labels = y.major_ticks(5);
/// assert_eq!(labels, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
/// ```
#[derive(Clone)]
pub struct Linear<D = f64, R = f64>
where
    D: Float,
    R: Float,
{
    min: D,
    max: D,
    range: (R, R),
    clamp: bool,
    tick_generator: TickGenerator<D, R>,
}

const MAX_MINOR_TICKS: usize = 100_000;

pub struct LinearTickIter<D: Float> {
    state: LinearTickState<D>,
    remaining: usize,
}

enum LinearTickState<D: Float> {
    Single(Option<D>),
    Sweep(LinearSweepState<D>),
    Done,
}

struct LinearSweepState<D: Float> {
    start: D,
    end_tol: D,
    minor_step: D,
    inverse: Option<D>,
    current_index: usize,
    clamp_min: D,
    clamp_max: D,
    epsilon: D,
    last_value: Option<D>,
}

impl<D: Float> LinearTickIter<D> {
    pub(crate) fn from_scale<R: Float>(scale: &Linear<D, R>, count: usize) -> Self {
        Self::new(scale.min, scale.max, count)
    }

    pub(crate) fn new(min: D, max: D, count: usize) -> Self {
        if min == max {
            return Self {
                state: LinearTickState::Single(Some(min)),
                remaining: 1,
            };
        }

        let (mut lo, mut hi) = util::sorted_pair(min, max);
        let clamp_min = lo;
        let clamp_max = hi;

        let major_step = util::tick_step(lo, hi, count);
        let ten = D::from(10.0).unwrap_or_else(D::one);

        lo = util::floor_to_step(lo, major_step);
        hi = util::ceil_to_step(hi, major_step);

        let minor_step = major_step / ten;
        if minor_step == D::zero() {
            return Self {
                state: LinearTickState::Single(Some(lo)),
                remaining: 1,
            };
        }
        let epsilon = util::epsilon_from_step(&minor_step);
        let end_tol = hi + epsilon;
        let inverse = (minor_step < D::one()).then(|| (D::one() / minor_step).round());

        Self {
            state: LinearTickState::Sweep(LinearSweepState {
                start: lo,
                end_tol,
                minor_step,
                inverse,
                current_index: 0,
                clamp_min,
                clamp_max,
                epsilon,
                last_value: None,
            }),
            remaining: MAX_MINOR_TICKS,
        }
    }
}

impl<D: Float> Iterator for LinearTickIter<D> {
    type Item = Tick<D>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            LinearTickState::Single(slot) => slot.take().map(|value| Tick { value, level: 0 }),
            LinearTickState::Sweep(state) => {
                while self.remaining > 0 {
                    // Calculate value based on index to avoid accumulation errors
                    let Some(index_d) = D::from(state.current_index) else {
                        break;
                    };
                    let mut value = match state.inverse {
                        Some(inverse) => ((state.start * inverse).round() + index_d) / inverse,
                        None => state.start + state.minor_step * index_d,
                    };

                    if value > state.end_tol {
                        self.state = LinearTickState::Done;
                        return None;
                    }

                    self.remaining -= 1;

                    let index = state.current_index;
                    state.current_index += 1;

                    if value < state.clamp_min {
                        let diff = state.clamp_min - value;
                        if diff <= state.epsilon {
                            value = state.clamp_min;
                        } else {
                            continue;
                        }
                    } else if value > state.clamp_max {
                        let diff = value - state.clamp_max;
                        if diff <= state.epsilon {
                            value = state.clamp_max;
                        } else {
                            self.state = LinearTickState::Done;
                            return None;
                        }
                    }

                    let level = if index % 10 == 0 { 0 } else { 1 };

                    if state.last_value.is_some_and(|last| last == value) {
                        continue;
                    }
                    state.last_value = Some(value);

                    return Some(Tick { value, level });
                }

                self.state = LinearTickState::Done;
                None
            }
            LinearTickState::Done => None,
        }
    }
}

fn default_tick_generator<D: Float + 'static, R: Float>(
    scale: &Linear<D, R>,
    count: usize,
) -> TickIter<D> {
    LinearTickIter::from_scale(scale, count).into()
}

impl<D, R> Linear<D, R>
where
    D: Float + 'static,
    R: Float + 'static,
{
    /// Creates a linear scale without validating the domain.
    ///
    /// A zero-width domain maps every value to `range[0]`; use
    /// [`Linear::try_new`] to reject it instead.
    pub fn new(domain: [D; 2], range: [R; 2]) -> Self {
        Self {
            min: domain[0],
            max: domain[1],
            range: (range[0], range[1]),
            clamp: false,
            tick_generator: Arc::new(default_tick_generator),
        }
    }

    /// Creates a linear scale, failing with [`Error::DomainDegenerate`] when
    /// the domain endpoints are equal or not finite.
    pub fn try_new(domain: [D; 2], range: [R; 2]) -> Result<Self> {
        if domain[0] == domain[1] || !domain[0].is_finite() || !domain[1].is_finite() {
            return Err(Error::DomainDegenerate {
                min: domain[0].to_f64().unwrap_or(f64::NAN),
                max: domain[1].to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(Self::new(domain, range))
    }

    /// Creates a linear scale with a custom tick generator.
    ///
    /// The generator receives the scale and the requested tick count.
    ///
    /// # Examples
    ///
    /// ```
    /// use tegn::scale::{Continuous, Linear, TickIter};
    ///
    /// let scale = Linear::new_with_tick_generator([0.0, 100.0], [0.0, 1.0], |_scale, _count| {
    ///     TickIter::empty()
    /// });
    /// assert!(scale.ticks(10).is_empty());
    /// ```
    pub fn new_with_tick_generator<F>(domain: [D; 2], range: [R; 2], tick_generator: F) -> Self
    where
        F: Fn(&Self, usize) -> TickIter<D> + Send + Sync + 'static,
    {
        Self {
            tick_generator: Arc::new(tick_generator),
            ..Self::new(domain, range)
        }
    }

    /// Creates a linear scale whose ticks come from a function returning a list.
    ///
    /// # Examples
    ///
    /// ```
    /// use tegn::scale::{Continuous, Linear, Tick};
    ///
    /// let scale = Linear::new_with_tick_fn([0.0, 100.0], [0.0, 1.0], |_scale, _count| {
    ///     vec![
    ///         Tick { value: 0.0, level: 0 },
    ///         Tick { value: 50.0, level: 0 },
    ///         Tick { value: 100.0, level: 0 },
    ///     ]
    /// });
    /// assert_eq!(scale.ticks(10).len(), 3);
    /// ```
    pub fn new_with_tick_fn<F>(domain: [D; 2], range: [R; 2], tick_fn: F) -> Self
    where
        F: Fn(&Self, usize) -> Vec<Tick<D>> + Send + Sync + 'static,
    {
        Self::new_with_tick_generator(domain, range, move |scale, count| {
            tick_fn(scale, count).into_iter().collect()
        })
    }

    /// Enables or disables output clamping.
    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn is_clamped(&self) -> bool {
        self.clamp
    }

    pub fn range(&self) -> (R, R) {
        self.range
    }

    pub fn set_range(&mut self, range: [R; 2]) {
        self.range = (range[0], range[1]);
    }

    /// Extends the domain outward to multiples of the tick step for `count`
    /// ticks, so the first and last ticks sit on the domain endpoints.
    pub fn nice(&mut self, count: usize) {
        if self.min == self.max || !self.min.is_finite() || !self.max.is_finite() {
            return;
        }
        let reversed = self.max < self.min;
        let (mut lo, mut hi) = util::sorted_pair(self.min, self.max);
        let mut previous = None;
        // the step depends on the span being niced, so iterate until stable
        for _ in 0..10 {
            let step = util::tick_step(lo, hi, count);
            if previous == Some(step) {
                break;
            }
            previous = Some(step);
            lo = util::floor_to_step(lo, step);
            hi = util::ceil_to_step(hi, step);
        }
        if reversed {
            self.min = hi;
            self.max = lo;
        } else {
            self.min = lo;
            self.max = hi;
        }
    }

    /// Convenience for [`Linear::nice`] on an owned scale.
    #[must_use]
    pub fn niced(mut self, count: usize) -> Self {
        self.nice(count);
        self
    }

    fn output_opt(&self, value: &D) -> Option<R> {
        let mut t = self.normalize_opt(value)?;
        if self.clamp {
            t = t.max(R::zero()).min(R::one());
        }
        Some(util::lerp(self.range.0, self.range.1, t))
    }
}

impl<D: Float, R: Float> fmt::Debug for Linear<D, R>
where
    D: fmt::Debug,
    R: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Linear")
            .field("domain", &(self.min, self.max))
            .field("range", &self.range)
            .field("clamp", &self.clamp)
            .finish_non_exhaustive()
    }
}

impl<D, R> Scale for Linear<D, R>
where
    D: Float + 'static,
    R: Float + 'static,
{
    type Domain = D;
    type Output = R;

    /// Unconvertible values (for mixed numeric types) map to NaN.
    fn apply(&self, value: &D) -> R {
        self.output_opt(value).unwrap_or_else(R::nan)
    }
}

impl<D, R> Invert for Linear<D, R>
where
    D: Float + 'static,
    R: Float + 'static,
{
    fn invert(&self, output: &R) -> Result<D> {
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span == R::zero() {
            // inverting maps the range back to the domain, so the range is what degenerated
            return Err(Error::DomainDegenerate {
                min: r0.to_f64().unwrap_or(f64::NAN),
                max: r1.to_f64().unwrap_or(f64::NAN),
            });
        }
        let mut t = (*output - r0) / span;
        if self.clamp {
            t = t.max(R::zero()).min(R::one());
        }
        self.denormalize_opt(t).ok_or(Error::DomainDegenerate {
            min: self.min.to_f64().unwrap_or(f64::NAN),
            max: self.max.to_f64().unwrap_or(f64::NAN),
        })
    }
}

impl<D, R> Continuous for Linear<D, R>
where
    D: Float + 'static,
    R: Float + 'static,
{
    type Normalized = R;

    fn domain(&self) -> (&D, &D) {
        (&self.min, &self.max)
    }

    fn set_domain(&mut self, min: D, max: D) {
        self.min = min;
        self.max = max;
    }

    fn normalize_opt(&self, value: &D) -> Option<R> {
        let span = self.max - self.min;
        if span == D::zero() {
            return Some(R::zero());
        }

        let offset = *value - self.min;
        let offset_n: R = R::from(offset)?;
        let span_n: R = R::from(span)?;

        // No clamping here: out-of-domain values map beyond [0, 1].
        Some(offset_n / span_n)
    }

    fn denormalize_opt(&self, t: R) -> Option<D> {
        let span = self.max - self.min;
        let span_n: R = R::from(span)?;
        let scaled = t * span_n;
        let scaled_d: D = D::from(scaled)?;
        Some(self.min + scaled_d)
    }

    fn pan_opt(&mut self, delta_norm: R) -> Option<()> {
        let span = self.max - self.min;
        let span_n: R = R::from(span)?;
        let shift: D = D::from(span_n * delta_norm)?;

        self.min = self.min + shift;
        self.max = self.max + shift;
        Some(())
    }

    fn zoom_opt(&mut self, factor: R, anchor_norm: Option<R>) -> Option<()> {
        if factor <= R::zero() {
            return None;
        }

        let one = R::one();
        let half = one / (one + one);
        let anchor_norm = anchor_norm.unwrap_or(half);

        let span = self.max - self.min;
        let anchor_val = self.denormalize_opt(anchor_norm)?;

        let span_n: R = R::from(span)?;
        let new_span_n = span_n / factor;

        let left_shift: D = D::from(new_span_n * anchor_norm)?;
        let right_shift: D = D::from(new_span_n * (one - anchor_norm))?;

        self.min = anchor_val - left_shift;
        self.max = anchor_val + right_shift;
        Some(())
    }

    fn extend_domain(&mut self, other_min: &D, other_max: &D) {
        if other_min < &self.min {
            self.min = *other_min;
        }
        if other_max > &self.max {
            self.max = *other_max;
        }
    }

    fn tick_iter(&self, count: usize) -> TickIter<D> {
        (self.tick_generator)(self, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_apply_maps_domain_to_range() {
        let scale = Linear::new([0.0, 100.0], [0.0, 500.0]);

        assert_eq!(scale.apply(&0.0), 0.0);
        assert_eq!(scale.apply(&50.0), 250.0);
        assert_eq!(scale.apply(&100.0), 500.0);
    }

    #[test]
    fn test_linear_round_trip() {
        let scale = Linear::new([-3.5, 17.25], [420.0, 12.0]);

        for i in 0..=40 {
            let v = -3.5 + f64::from(i) * (20.75 / 40.0);
            let back = scale.invert(&scale.apply(&v)).unwrap();
            assert!((back - v).abs() < 1e-9, "{v} round-tripped to {back}");
        }
    }

    #[test]
    fn test_linear_f32_range() {
        let scale = Linear::<f64, f32>::new([0.0, 100.0], [0.0, 1.0]);

        let t: f32 = scale.apply(&50.0);
        assert_eq!(t, 0.5f32);
        assert_eq!(scale.invert(&0.5f32).unwrap(), 50.0);
    }

    #[test]
    fn test_linear_reversed_range() {
        let scale = Linear::new([0.0, 10.0], [300.0, 0.0]);

        assert_eq!(scale.apply(&0.0), 300.0);
        assert_eq!(scale.apply(&10.0), 0.0);
        assert_eq!(scale.invert(&75.0).unwrap(), 7.5);
    }

    #[test]
    fn test_linear_extrapolates_without_clamp() {
        let scale = Linear::new([0.0, 100.0], [0.0, 1.0]);

        assert_eq!(scale.apply(&150.0), 1.5);
        assert_eq!(scale.apply(&-50.0), -0.5);
    }

    #[test]
    fn test_linear_clamp_restricts_output_and_inverse() {
        let scale = Linear::new([0.0, 100.0], [0.0, 500.0]).with_clamp(true);

        assert_eq!(scale.apply(&150.0), 500.0);
        assert_eq!(scale.apply(&-10.0), 0.0);
        // beyond the range, every pixel inverts to the boundary
        assert_eq!(scale.invert(&900.0).unwrap(), 100.0);
    }

    #[test]
    fn test_linear_try_new_rejects_degenerate_domain() {
        let err = Linear::try_new([5.0, 5.0], [0.0, 1.0]).unwrap_err();
        assert_eq!(err, Error::DomainDegenerate { min: 5.0, max: 5.0 });

        assert!(Linear::try_new([0.0, f64::NAN], [0.0, 1.0]).is_err());
    }

    #[test]
    fn test_linear_invert_degenerate_range() {
        let scale = Linear::new([0.0, 10.0], [4.0, 4.0]);
        assert!(scale.invert(&4.0).is_err());
    }

    #[test]
    fn test_linear_pan() {
        let mut scale = Linear::new([0.0, 100.0], [0.0, 1.0]);

        scale.pan(0.1);

        assert_eq!(scale.domain(), (&10.0, &110.0));
    }

    #[test]
    fn test_linear_zoom_in() {
        let mut scale = Linear::new([0.0, 100.0], [0.0, 1.0]);

        scale.zoom(2.0, Some(0.5));

        assert_eq!(scale.domain(), (&25.0, &75.0));
    }

    #[test]
    fn test_linear_zoom_out() {
        let mut scale = Linear::new([0.0, 100.0], [0.0, 1.0]);

        scale.zoom(0.5, Some(0.5));

        assert_eq!(scale.domain(), (&-50.0, &150.0));
    }

    #[test]
    fn test_linear_zoom_rejects_non_positive_factor() {
        let mut scale = Linear::new([0.0, 100.0], [0.0, 1.0]);

        assert_eq!(scale.zoom_opt(0.0, None), None);
        scale.zoom(0.0, None);
        scale.zoom(-2.0, Some(0.25));

        assert_eq!(scale.domain(), (&0.0, &100.0));
    }

    #[test]
    fn test_linear_nice_extends_domain() {
        let mut scale = Linear::new([3.2, 97.1], [0.0, 1.0]);
        scale.nice(10);
        assert_eq!(scale.domain(), (&0.0, &100.0));

        let mut reversed = Linear::new([97.1, 3.2], [0.0, 1.0]);
        reversed.nice(10);
        assert_eq!(reversed.domain(), (&100.0, &0.0));
    }

    #[test]
    fn test_linear_ticks_basic() {
        let scale = Linear::new([0.0, 100.0], [0.0, 1.0]);
        let ticks = scale.ticks(10);

        let majors: Vec<_> = ticks.iter().filter(|t| t.level == 0).map(|t| t.value).collect();
        assert_eq!(majors.first(), Some(&0.0));
        assert_eq!(majors.last(), Some(&100.0));
        assert_eq!(majors.len(), 11);
        assert!(ticks.iter().any(|t| t.level == 1));
    }

    #[test]
    fn test_linear_ticks_fractional_domain() {
        let scale = Linear::new([0.0, 1.0], [0.0, 1.0]);
        let majors = scale.major_ticks(10);

        assert_eq!(majors.len(), 11);
        assert_eq!(majors[3], 0.3);
        assert_eq!(majors[7], 0.7);
        assert_eq!(majors[10], 1.0);
    }

    #[test]
    fn test_linear_ticks_sorted() {
        let scale = Linear::<f32, f32>::new([0.0, 100.0], [0.0, 1.0]);
        let ticks = scale.ticks(10);

        assert!(!ticks.is_empty());
        for pair in ticks.windows(2) {
            assert!(pair[1].value >= pair[0].value);
        }
    }

    #[test]
    fn test_linear_ticks_remain_within_domain() {
        let scale = Linear::new([13.2, 47.8], [0.0, 1.0]);

        for tick in scale.ticks(10) {
            assert!(
                tick.value >= 13.2 && tick.value <= 47.8,
                "tick {} outside domain",
                tick.value
            );
        }
    }

    #[test]
    fn test_linear_ticks_do_not_overlap_levels() {
        let scale = Linear::new([13.2, 47.8], [0.0, 1.0]);
        let mut seen: Vec<(f64, u8)> = Vec::new();

        for tick in scale.ticks(10) {
            if let Some((_, prev_level)) = seen.iter().find(|(v, _)| *v == tick.value) {
                assert_eq!(*prev_level, tick.level, "tick value {} emitted twice", tick.value);
            } else {
                seen.push((tick.value, tick.level));
            }
        }
    }

    #[test]
    fn test_linear_single_tick_for_point_domain() {
        let scale = Linear::new([4.0, 4.0], [0.0, 1.0]);
        assert_eq!(scale.major_ticks(5), vec![4.0]);
    }

    #[test]
    fn test_linear_extend_domain() {
        let mut scale = Linear::new([10.0, 20.0], [0.0, 1.0]);

        scale.extend_domain(&0.0, &30.0);

        assert_eq!(scale.domain(), (&0.0, &30.0));
    }
}
