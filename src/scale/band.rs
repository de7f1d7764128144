use std::collections::HashMap;
use std::hash::Hash;

use super::{Scale, util};
use crate::error::{Error, Result};

/// Band scale: divides a continuous range into one equal-width slot per category.
///
/// The range is split into `n` bands of width [`Band::bandwidth`], separated
/// by `padding_inner * step` and framed by `padding_outer * step` on both
/// sides, where [`Band::step`] is the distance between consecutive band starts.
/// [`Band::align`] distributes any outer space (0 = all after, 1 = all before).
///
/// Duplicate domain values are ignored after their first occurrence.
///
/// ```rust
/// use tegn::scale::Band;
///
/// let x = Band::new(["a", "b", "c", "d"], [0.0, 100.0]).padding(0.2);
///
/// assert!((x.step() - 100.0 / 4.2).abs() < 1e-12);
/// assert!((x.bandwidth() - x.step() * 0.8).abs() < 1e-12);
/// assert_eq!(x.position(&"z"), None);
/// assert_eq!(x.invert(x.position(&"c").unwrap() + 1.0).unwrap(), &"c");
/// ```
#[derive(Debug, Clone)]
pub struct Band<K> {
    domain: Vec<K>,
    index: HashMap<K, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    step: f64,
    bandwidth: f64,
    start: f64,
}

impl<K> Band<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new<I>(domain: I, range: [f64; 2]) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut values = Vec::new();
        let mut index = HashMap::new();
        for key in domain {
            if !index.contains_key(&key) {
                index.insert(key.clone(), values.len());
                values.push(key);
            }
        }
        let mut band = Self {
            domain: values,
            index,
            range: (range[0], range[1]),
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            step: 0.0,
            bandwidth: 0.0,
            start: 0.0,
        };
        band.rescale();
        band
    }

    /// Sets inner and outer padding to the same fraction of the step.
    #[must_use]
    pub fn padding(self, padding: f64) -> Self {
        self.padding_inner(padding).padding_outer(padding)
    }

    /// Fraction of the step reserved between bands, clamped to `[0, 1]`.
    #[must_use]
    pub fn padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    /// Space before the first and after the last band, in steps.
    #[must_use]
    pub fn padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = padding.max(0.0);
        self.rescale();
        self
    }

    #[must_use]
    pub fn align(mut self, align: f64) -> Self {
        self.align = align.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (lo, hi) = util::sorted_pair(self.range.0, self.range.1);
        let step = (hi - lo) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        self.start = lo + (hi - lo - step * (n - self.padding_inner)) * self.align;
        self.step = step;
        self.bandwidth = step * (1.0 - self.padding_inner);
    }

    fn reversed(&self) -> bool {
        self.range.1 < self.range.0
    }

    fn slot_start(&self, i: usize) -> f64 {
        let slot = if self.reversed() {
            self.domain.len() - 1 - i
        } else {
            i
        };
        self.start + self.step * slot as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &[K] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Start of the band for `key`, or `None` for an unknown category.
    pub fn position(&self, key: &K) -> Option<f64> {
        self.index.get(key).map(|&i| self.slot_start(i))
    }

    /// Category whose band contains `pixel` (band edges inclusive).
    ///
    /// Pixels in the padding between or around bands fail with
    /// [`Error::OutOfRangeLookup`].
    pub fn invert(&self, pixel: f64) -> Result<&K> {
        let (lo, hi) = util::sorted_pair(self.range.0, self.range.1);
        let miss = Error::OutOfRangeLookup {
            value: pixel,
            low: lo,
            high: hi,
        };
        if self.domain.is_empty() || !(self.step > 0.0) || !pixel.is_finite() {
            return Err(miss);
        }
        let slot = ((pixel - self.start) / self.step).floor();
        // a pixel exactly on the far edge of a band belongs to that band
        let candidates = [slot, slot - 1.0];
        for slot in candidates {
            if slot < 0.0 || slot >= self.domain.len() as f64 {
                continue;
            }
            let band_start = self.start + self.step * slot;
            if pixel >= band_start && pixel <= band_start + self.bandwidth {
                let slot = slot as usize;
                let i = if self.reversed() {
                    self.domain.len() - 1 - slot
                } else {
                    slot
                };
                return Ok(&self.domain[i]);
            }
        }
        Err(miss)
    }

    /// Categories whose bands intersect the pixel interval `[a, b]`.
    ///
    /// Used to turn a brush selection on a band axis into a category filter.
    pub fn select(&self, a: f64, b: f64) -> Vec<&K> {
        let (lo, hi) = util::sorted_pair(a, b);
        self.domain
            .iter()
            .enumerate()
            .filter(|&(i, _)| {
                let start = self.slot_start(i);
                start <= hi && start + self.bandwidth >= lo
            })
            .map(|(_, key)| key)
            .collect()
    }
}

impl<K> Scale for Band<K>
where
    K: Eq + Hash + Clone,
{
    type Domain = K;
    type Output = Option<f64>;

    fn apply(&self, value: &K) -> Option<f64> {
        self.position(value)
    }
}

/// Point scale: a band scale with zero bandwidth, placing categories at
/// evenly spaced points.
///
/// Point scales have no exact inverse; [`Point::invert`] returns the nearest
/// category instead.
///
/// ```rust
/// use tegn::scale::Point;
///
/// let x = Point::new(["jan", "feb", "mar"], [0.0, 200.0]);
/// assert_eq!(x.position(&"feb"), Some(100.0));
/// assert_eq!(x.invert(140.0).unwrap(), &"feb");
/// assert_eq!(x.invert(190.0).unwrap(), &"mar");
/// ```
#[derive(Debug, Clone)]
pub struct Point<K> {
    band: Band<K>,
}

impl<K> Point<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new<I>(domain: I, range: [f64; 2]) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        Self {
            band: Band::new(domain, range).padding_inner(1.0),
        }
    }

    /// Space before the first and after the last point, in steps.
    #[must_use]
    pub fn padding(self, padding: f64) -> Self {
        Self {
            band: self.band.padding_outer(padding),
        }
    }

    #[must_use]
    pub fn align(self, align: f64) -> Self {
        Self {
            band: self.band.align(align),
        }
    }

    pub fn step(&self) -> f64 {
        self.band.step()
    }

    pub fn domain(&self) -> &[K] {
        self.band.domain()
    }

    pub fn position(&self, key: &K) -> Option<f64> {
        self.band.position(key)
    }

    /// Nearest category to `pixel`; fails outside the range.
    pub fn invert(&self, pixel: f64) -> Result<&K> {
        let (lo, hi) = util::sorted_pair(self.band.range.0, self.band.range.1);
        if self.band.domain.is_empty() || !(pixel >= lo && pixel <= hi) {
            return Err(Error::OutOfRangeLookup {
                value: pixel,
                low: lo,
                high: hi,
            });
        }
        let n = self.band.domain.len();
        let slot = if self.band.step > 0.0 {
            ((pixel - self.band.start) / self.band.step)
                .round()
                .clamp(0.0, (n - 1) as f64) as usize
        } else {
            0
        };
        let i = if self.band.reversed() { n - 1 - slot } else { slot };
        Ok(&self.band.domain[i])
    }
}

impl<K> Scale for Point<K>
where
    K: Eq + Hash + Clone,
{
    type Domain = K;
    type Output = Option<f64>;

    fn apply(&self, value: &K) -> Option<f64> {
        self.position(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_without_padding_tiles_range() {
        let x = Band::new(["a", "b", "c", "d"], [0.0, 400.0]);

        assert_eq!(x.bandwidth(), 100.0);
        assert_eq!(x.position(&"a"), Some(0.0));
        assert_eq!(x.position(&"d"), Some(300.0));
    }

    #[test]
    fn test_band_coverage_reconstructs_range() {
        for n in 1..8 {
            for padding in [0.0, 0.1, 0.35, 0.5, 0.9] {
                let keys: Vec<usize> = (0..n).collect();
                let x = Band::new(keys.clone(), [20.0, 620.0]).padding(padding);

                let bands = n as f64 * x.bandwidth();
                let inner = (n as f64 - 1.0) * x.step() * padding;
                let outer = 2.0 * x.step() * padding;
                assert!(
                    (bands + inner + outer - 600.0).abs() < 1e-9,
                    "n={n} padding={padding}"
                );

                let first = x.position(&0).unwrap();
                let last = x.position(&(n - 1)).unwrap();
                assert!((first - (20.0 + x.step() * padding)).abs() < 1e-9);
                assert!((last + x.bandwidth() + x.step() * padding - 620.0).abs() < 1e-9);
                for pair in keys.windows(2) {
                    let a = x.position(&pair[0]).unwrap();
                    let b = x.position(&pair[1]).unwrap();
                    assert!(a + x.bandwidth() <= b + 1e-9, "bands overlap");
                }
            }
        }
    }

    #[test]
    fn test_band_reversed_range() {
        let x = Band::new(["a", "b"], [100.0, 0.0]);
        assert_eq!(x.position(&"a"), Some(50.0));
        assert_eq!(x.position(&"b"), Some(0.0));
        assert_eq!(x.invert(75.0).unwrap(), &"a");
    }

    #[test]
    fn test_band_invert_in_padding_fails() {
        let x = Band::new(["a", "b"], [0.0, 100.0]).padding_inner(0.5);
        let gap = x.position(&"a").unwrap() + x.bandwidth() + 1.0;
        assert!(matches!(x.invert(gap), Err(Error::OutOfRangeLookup { .. })));
        assert!(x.invert(-5.0).is_err());
    }

    #[test]
    fn test_band_ignores_duplicates() {
        let x = Band::new(["a", "b", "a"], [0.0, 100.0]);
        assert_eq!(x.domain(), &["a", "b"]);
        assert_eq!(x.bandwidth(), 50.0);
    }

    #[test]
    fn test_band_select_intersecting() {
        let x = Band::new(["a", "b", "c", "d"], [0.0, 400.0]);
        assert_eq!(x.select(150.0, 250.0), vec![&"b", &"c"]);
    }

    #[test]
    fn test_point_spacing_and_padding() {
        let x = Point::new(["a", "b", "c"], [0.0, 100.0]);
        assert_eq!(x.position(&"a"), Some(0.0));
        assert_eq!(x.position(&"c"), Some(100.0));

        let padded = Point::new(["a", "b", "c"], [0.0, 100.0]).padding(0.5);
        assert_eq!(padded.step(), 100.0 / 3.0);
        assert!((padded.position(&"a").unwrap() - 100.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_single_value_is_centred() {
        let x = Point::new(["only"], [0.0, 80.0]);
        assert_eq!(x.position(&"only"), Some(40.0));
        assert_eq!(x.invert(3.0).unwrap(), &"only");
    }

    #[test]
    fn test_point_invert_outside_range_fails() {
        let x = Point::new(["a", "b"], [0.0, 10.0]);
        assert!(matches!(x.invert(11.0), Err(Error::OutOfRangeLookup { .. })));
    }
}
