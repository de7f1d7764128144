use std::collections::HashMap;
use std::hash::Hash;

use super::{Scale, util};
use crate::error::{Error, Result};

/// Ordinal scale: maps each category to a value from a list, cycling through
/// the list when there are more categories than values.
///
/// Categories outside the domain map to the `unknown` value (`None` by default).
///
/// ```rust
/// use tegn::scale::{Ordinal, Scale};
///
/// let color = Ordinal::new(["apples", "pears", "plums"], ["red", "green"]);
///
/// assert_eq!(color.apply(&"apples"), Some("red"));
/// assert_eq!(color.apply(&"plums"), Some("red"));
/// assert_eq!(color.apply(&"kiwis"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Ordinal<K, V> {
    domain: Vec<K>,
    index: HashMap<K, usize>,
    range: Vec<V>,
    unknown: Option<V>,
}

impl<K, V> Ordinal<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new<I, J>(domain: I, range: J) -> Self
    where
        I: IntoIterator<Item = K>,
        J: IntoIterator<Item = V>,
    {
        let mut values = Vec::new();
        let mut index = HashMap::new();
        for key in domain {
            if !index.contains_key(&key) {
                index.insert(key.clone(), values.len());
                values.push(key);
            }
        }
        Self {
            domain: values,
            index,
            range: range.into_iter().collect(),
            unknown: None,
        }
    }

    /// Value returned for categories outside the domain.
    #[must_use]
    pub fn with_unknown(mut self, unknown: V) -> Self {
        self.unknown = Some(unknown);
        self
    }

    pub fn domain(&self) -> &[K] {
        &self.domain
    }

    pub fn range(&self) -> &[V] {
        &self.range
    }
}

impl<K, V> Scale for Ordinal<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    type Domain = K;
    type Output = Option<V>;

    fn apply(&self, value: &K) -> Option<V> {
        match self.index.get(value) {
            Some(&i) if !self.range.is_empty() => Some(self.range[i % self.range.len()].clone()),
            _ => self.unknown.clone(),
        }
    }
}

/// Quantize scale: splits a continuous domain into equal segments, one per
/// output value.
///
/// ```rust
/// use tegn::scale::{Quantize, Scale};
///
/// let size = Quantize::new([0.0, 90.0], ["small", "medium", "large"]).unwrap();
///
/// assert_eq!(size.apply(&10.0), "small");
/// assert_eq!(size.apply(&45.0), "medium");
/// assert_eq!(size.apply(&500.0), "large");
/// assert_eq!(size.invert_extent(&"medium"), Some((30.0, 60.0)));
/// ```
#[derive(Debug, Clone)]
pub struct Quantize<V> {
    domain: (f64, f64),
    range: Vec<V>,
}

impl<V: Clone> Quantize<V> {
    /// Fails with [`Error::EmptyDataset`] when `range` is empty and
    /// [`Error::DomainDegenerate`] when the domain is not a proper interval.
    pub fn new<J>(domain: [f64; 2], range: J) -> Result<Self>
    where
        J: IntoIterator<Item = V>,
    {
        let range: Vec<V> = range.into_iter().collect();
        if range.is_empty() {
            return Err(Error::EmptyDataset { layout: "quantize" });
        }
        if !(domain[0] < domain[1]) || !domain[1].is_finite() || !domain[0].is_finite() {
            return Err(Error::DomainDegenerate {
                min: domain[0],
                max: domain[1],
            });
        }
        Ok(Self {
            domain: (domain[0], domain[1]),
            range,
        })
    }

    /// Inner segment boundaries, one fewer than the number of outputs.
    pub fn thresholds(&self) -> Vec<f64> {
        let n = self.range.len();
        (1..n)
            .map(|i| util::lerp(self.domain.0, self.domain.1, i as f64 / n as f64))
            .collect()
    }

    /// Domain interval mapped to `value`, or `None` if it is not an output.
    pub fn invert_extent(&self, value: &V) -> Option<(f64, f64)>
    where
        V: PartialEq,
    {
        let i = self.range.iter().position(|v| v == value)?;
        let n = self.range.len() as f64;
        let at = |k: f64| util::lerp(self.domain.0, self.domain.1, k / n);
        Some((at(i as f64), at(i as f64 + 1.0)))
    }
}

impl<V: Clone> Scale for Quantize<V> {
    type Domain = f64;
    type Output = V;

    fn apply(&self, value: &f64) -> V {
        let n = self.range.len();
        let t = (value - self.domain.0) / (self.domain.1 - self.domain.0);
        let i = if t.is_nan() {
            0
        } else {
            ((t * n as f64).floor().max(0.0) as usize).min(n - 1)
        };
        self.range[i].clone()
    }
}
