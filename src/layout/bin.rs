use tracing::warn;

use crate::error::{ConfigError, Error, Result};
use crate::scale::util::{multiples_within, sorted_pair, tick_step};

/// How bin boundaries are chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum Thresholds {
    /// Roughly this many equal-width bins, with boundaries at multiples of a
    /// nice step. The step is rounded up, so there are never more bins than
    /// requested apart from partial bins at the domain ends.
    Count(usize),
    /// Explicit boundaries. Values outside the domain are ignored; the domain
    /// endpoints close the first and last bins.
    Explicit(Vec<f64>),
    /// Count derived from the number of values: `ceil(log2(n)) + 1`.
    Sturges,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::Sturges
    }
}

/// One histogram bucket.
///
/// Bins cover `[lower_bound, upper_bound)`, except the last one which is
/// closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin<'a, T> {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub members: Vec<&'a T>,
}

impl<T> Bin<'_, T> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// Buckets `items` by `value` over `domain`.
///
/// Items whose value is non-finite or falls outside the domain are dropped.
/// A zero-width domain yields a single bin.
///
/// ```rust
/// use tegn::layout::{Thresholds, bin_values};
///
/// let values = [0.0, 2.0, 4.0, 6.0, 8.0, 10.0];
/// let bins = bin_values(&values, [0.0, 10.0], &Thresholds::Count(5)).unwrap();
///
/// assert_eq!(bins.len(), 5);
/// assert_eq!((bins[0].lower_bound, bins[0].upper_bound), (0.0, 2.0));
/// assert_eq!(bins[0].members, vec![&0.0]);
/// assert_eq!(bins[4].members, vec![&8.0, &10.0]);
/// ```
pub fn bin<'a, T>(
    items: &'a [T],
    value: impl Fn(&T) -> f64,
    domain: [f64; 2],
    thresholds: &Thresholds,
) -> Result<Vec<Bin<'a, T>>> {
    if !domain[0].is_finite() || !domain[1].is_finite() {
        return Err(Error::DomainDegenerate {
            min: domain[0],
            max: domain[1],
        });
    }
    let (x0, x1) = sorted_pair(domain[0], domain[1]);

    let values: Vec<f64> = items.iter().map(&value).collect();
    let bounds = boundaries(x0, x1, thresholds, &values)?;

    let mut bins: Vec<Bin<'a, T>> = bounds
        .windows(2)
        .map(|w| Bin {
            lower_bound: w[0],
            upper_bound: w[1],
            members: Vec::new(),
        })
        .collect();

    let mut dropped = 0usize;
    for (item, v) in items.iter().zip(values) {
        if !(x0..=x1).contains(&v) {
            dropped += 1;
            continue;
        }
        // number of inner boundaries at or below v
        let slot = bounds[1..bounds.len() - 1].partition_point(|&b| b <= v);
        bins[slot].members.push(item);
    }
    if dropped > 0 {
        warn!(dropped, domain = ?(x0, x1), "values outside the bin domain were dropped");
    }

    Ok(bins)
}

/// [`bin`] over plain numbers.
pub fn bin_values<'a>(
    values: &'a [f64],
    domain: [f64; 2],
    thresholds: &Thresholds,
) -> Result<Vec<Bin<'a, f64>>> {
    bin(values, |v| *v, domain, thresholds)
}

/// Sorted bin edges including both domain endpoints.
fn boundaries(x0: f64, x1: f64, thresholds: &Thresholds, values: &[f64]) -> Result<Vec<f64>> {
    if x0 == x1 {
        return Ok(vec![x0, x1]);
    }

    let inner: Vec<f64> = match thresholds {
        Thresholds::Count(0) => return Err(ConfigError::ZeroThresholds.into()),
        Thresholds::Count(count) => equal_width(x0, x1, *count),
        Thresholds::Sturges => {
            let n = values.iter().filter(|v| v.is_finite()).count().max(1);
            let count = (n as f64).log2().ceil() as usize + 1;
            equal_width(x0, x1, count)
        }
        Thresholds::Explicit(explicit) => {
            let mut inner: Vec<f64> = explicit
                .iter()
                .copied()
                .filter(|&t| t > x0 && t < x1)
                .collect();
            inner.sort_by(f64::total_cmp);
            inner.dedup();
            inner
        }
    };

    let mut bounds = Vec::with_capacity(inner.len() + 2);
    bounds.push(x0);
    bounds.extend(inner);
    bounds.push(x1);
    Ok(bounds)
}

fn equal_width(x0: f64, x1: f64, count: usize) -> Vec<f64> {
    let step = tick_step(x0, x1, count);
    multiples_within(x0, x1, step)
        .into_iter()
        .filter(|&t| t > x0 && t < x1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn edges<T>(bins: &[Bin<'_, T>]) -> Vec<(f64, f64)> {
        bins.iter().map(|b| (b.lower_bound, b.upper_bound)).collect()
    }

    #[test]
    fn test_count_thresholds_use_nice_steps() {
        let bins = bin_values(&[], [0.0, 10.0], &Thresholds::Count(5)).unwrap();
        assert_eq!(
            edges(&bins),
            vec![(0.0, 2.0), (2.0, 4.0), (4.0, 6.0), (6.0, 8.0), (8.0, 10.0)]
        );
    }

    #[test]
    fn test_count_thresholds_on_unit_domain() {
        let bins = bin_values(&[0.3, 0.6, 0.7], [0.0, 1.0], &Thresholds::Count(10)).unwrap();
        assert_eq!(bins.len(), 10);
        assert_eq!((bins[3].lower_bound, bins[3].upper_bound), (0.3, 0.4));
        assert_eq!(bins[3].members, vec![&0.3]);
        assert_eq!(bins[6].members, vec![&0.6]);
        assert_eq!(bins[7].members, vec![&0.7]);
        assert!(bins[2].members.is_empty());
    }

    #[test]
    fn test_count_allows_partial_end_bins() {
        let bins = bin_values(&[], [0.5, 9.5], &Thresholds::Count(3)).unwrap();
        assert_eq!(edges(&bins), vec![(0.5, 5.0), (5.0, 9.5)]);
    }

    #[test]
    fn test_boundary_values_go_up_except_at_the_end() {
        let values = [0.0, 1.999, 2.0, 10.0];
        let bins = bin_values(&values, [0.0, 10.0], &Thresholds::Count(5)).unwrap();
        assert_eq!(bins[0].members, vec![&0.0, &1.999]);
        assert_eq!(bins[1].members, vec![&2.0]);
        assert_eq!(bins[4].members, vec![&10.0]);
    }

    #[test]
    fn test_out_of_domain_and_nan_dropped() {
        let values = [-1.0, 5.0, f64::NAN, 11.0];
        let bins = bin_values(&values, [0.0, 10.0], &Thresholds::Count(2)).unwrap();
        let total: usize = bins.iter().map(Bin::len).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_explicit_thresholds() {
        let thresholds = Thresholds::Explicit(vec![7.0, 3.0, -2.0, 3.0, 20.0]);
        let bins = bin_values(&[3.0, 6.9, 9.0], [0.0, 10.0], &thresholds).unwrap();
        assert_eq!(edges(&bins), vec![(0.0, 3.0), (3.0, 7.0), (7.0, 10.0)]);
        assert!(bins[0].is_empty());
        assert_eq!(bins[1].len(), 2);
    }

    #[test]
    fn test_sturges() {
        let values: Vec<f64> = (0..16).map(f64::from).collect();
        let bins = bin_values(&values, [0.0, 16.0], &Thresholds::Sturges).unwrap();
        // ceil(log2 16) + 1 = 5 bins requested, step 5
        assert_eq!(edges(&bins), vec![(0.0, 5.0), (5.0, 10.0), (10.0, 15.0), (15.0, 16.0)]);
    }

    #[test]
    fn test_single_bin_for_zero_width_domain() {
        let bins = bin_values(&[3.0, 3.0, 4.0], [3.0, 3.0], &Thresholds::Count(10)).unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].len(), 2);
        assert_eq!(bins[0].width(), 0.0);
    }

    #[test]
    fn test_records_are_borrowed() {
        struct Movie {
            title: &'static str,
            rating: f64,
        }
        let movies = [
            Movie { title: "a", rating: 7.1 },
            Movie { title: "b", rating: 2.4 },
        ];
        let bins = bin(&movies, |m| m.rating, [0.0, 10.0], &Thresholds::Count(2)).unwrap();
        assert_eq!(bins[1].members[0].title, "a");
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            bin_values(&[], [0.0, 1.0], &Thresholds::Count(0)).unwrap_err(),
            Error::Config(ConfigError::ZeroThresholds)
        );
        assert!(matches!(
            bin_values(&[], [0.0, f64::NAN], &Thresholds::Count(3)),
            Err(Error::DomainDegenerate { .. })
        ));
    }
}
