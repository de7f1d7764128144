use num_traits::Float;

use super::{Tick, linear, time};

/// Type-erased tick sequence returned by [`Continuous::tick_iter`](super::Continuous::tick_iter).
///
/// Axes usually want the labelled subset:
///
/// ```
/// use tegn::scale::{Tick, TickIter};
///
/// let ticks: TickIter<f64> = [
///     Tick { value: 0.0, level: 0 },
///     Tick { value: 25.0, level: 1 },
///     Tick { value: 50.0, level: 0 },
/// ]
/// .into_iter()
/// .collect();
///
/// let labels: Vec<String> = ticks.labels(|v| format!("{v}%")).collect();
/// assert_eq!(labels, vec!["0%", "50%"]);
/// ```
pub struct TickIter<D> {
    inner: Box<dyn Iterator<Item = Tick<D>>>,
}

impl<D: 'static> TickIter<D> {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Tick<D>> + 'static,
    {
        Self { inner: Box::new(iter) }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }
}

impl<D> TickIter<D> {
    /// Values of the level-0 ticks.
    pub fn majors(self) -> impl Iterator<Item = D> {
        self.filter(|tick| tick.level == 0).map(|tick| tick.value)
    }

    /// Formatted level-0 tick values.
    pub fn labels<F>(self, format: F) -> impl Iterator<Item = String>
    where
        F: Fn(&D) -> String,
    {
        self.majors().map(move |value| format(&value))
    }
}

impl<D: 'static> FromIterator<Tick<D>> for TickIter<D> {
    fn from_iter<I: IntoIterator<Item = Tick<D>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>().into_iter())
    }
}

impl<D: Float + 'static> From<linear::LinearTickIter<D>> for TickIter<D> {
    fn from(iter: linear::LinearTickIter<D>) -> Self {
        Self::new(iter)
    }
}

impl From<time::TimeTickIter> for TickIter<time::Timestamp> {
    fn from(iter: time::TimeTickIter) -> Self {
        Self::new(iter)
    }
}

impl<D> Iterator for TickIter<D> {
    type Item = Tick<D>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
