use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::trace;

use crate::error::{Error, Result};

/// Baseline policy for stacked series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StackOffset {
    /// Zero baseline; each series starts where the previous one ends.
    #[default]
    None,
    /// Each row is rescaled so its total spans exactly `[0, 1]`.
    Normalize,
    /// The stack is centered on zero.
    Silhouette,
    /// Baseline shifted to minimize the weighted change in slope, the
    /// streamgraph layout.
    Wiggle,
    /// Positive values stack upward from zero and negative values downward.
    Diverging,
}

/// Stacking order of the series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StackOrder {
    /// Key order.
    #[default]
    None,
    /// Smallest total at the bottom.
    Ascending,
    /// Largest total at the bottom.
    Descending,
    /// Largest totals in the middle, smaller ones alternating outward.
    InsideOut,
    /// Reverse key order.
    Reverse,
    /// Ordered by the row at which each series peaks.
    Appearance,
}

/// One series of a stack: a `[start, end]` pair per input row.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedSeries<K> {
    pub key: K,
    /// Stacking position, 0 being the bottom-most series.
    pub index: usize,
    pub points: Vec<[f64; 2]>,
}

impl<K> StackedSeries<K> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Upper edge of the series for every row.
    pub fn ends(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p[1])
    }
}

/// Stacks `keys` over `rows`, reading each cell with `value`.
///
/// Series come back in key order; [`StackedSeries::index`] records where the
/// order placed them. Non-finite cell values count as zero. Fails with
/// [`Error::DuplicateKey`] if a key is listed twice.
///
/// ```rust
/// use tegn::layout::{StackOffset, StackOrder, stack};
///
/// let rows = [[1.0, 2.0], [3.0, 1.0]];
/// let series = stack(&rows, &[0usize, 1], |row, &k| row[k], StackOffset::None, StackOrder::None).unwrap();
///
/// assert_eq!(series[0].points, vec![[0.0, 1.0], [0.0, 3.0]]);
/// assert_eq!(series[1].points, vec![[1.0, 3.0], [3.0, 4.0]]);
/// ```
pub fn stack<R, K>(
    rows: &[R],
    keys: &[K],
    value: impl Fn(&R, &K) -> f64,
    offset: StackOffset,
    order: StackOrder,
) -> Result<Vec<StackedSeries<K>>>
where
    K: Clone + Eq + Hash + Debug,
{
    let mut seen = HashSet::with_capacity(keys.len());
    for key in keys {
        if !seen.insert(key) {
            return Err(Error::DuplicateKey {
                key: format!("{key:?}"),
            });
        }
    }

    let mut points: Vec<Vec<[f64; 2]>> = keys
        .iter()
        .map(|key| {
            rows.iter()
                .map(|row| {
                    let v = value(row, key);
                    [0.0, if v.is_finite() { v } else { 0.0 }]
                })
                .collect()
        })
        .collect();

    let order = stacking_order(&points, order);
    apply_offset(&mut points, &order, offset);
    trace!(series = keys.len(), rows = rows.len(), ?offset, "stacked");

    let mut index = vec![0; keys.len()];
    for (position, &series) in order.iter().enumerate() {
        index[series] = position;
    }

    Ok(keys
        .iter()
        .cloned()
        .zip(points)
        .zip(index)
        .map(|((key, points), index)| StackedSeries { key, index, points })
        .collect())
}

fn total(series: &[[f64; 2]]) -> f64 {
    series.iter().map(|p| p[1]).sum()
}

fn peak(series: &[[f64; 2]]) -> usize {
    let mut best = 0;
    for (j, p) in series.iter().enumerate() {
        if p[1] > series[best][1] {
            best = j;
        }
    }
    best
}

/// Series indices from bottom to top.
fn stacking_order(points: &[Vec<[f64; 2]>], order: StackOrder) -> Vec<usize> {
    let natural: Vec<usize> = (0..points.len()).collect();
    let sums: Vec<f64> = points.iter().map(|s| total(s)).collect();
    let by_sum = |mut ids: Vec<usize>| {
        ids.sort_by(|&a, &b| sums[a].total_cmp(&sums[b]));
        ids
    };

    match order {
        StackOrder::None => natural,
        StackOrder::Reverse => natural.into_iter().rev().collect(),
        StackOrder::Ascending => by_sum(natural),
        StackOrder::Descending => by_sum(natural).into_iter().rev().collect(),
        StackOrder::Appearance => {
            let peaks: Vec<usize> = points.iter().map(|s| peak(s)).collect();
            let mut ids = natural;
            ids.sort_by_key(|&i| peaks[i]);
            ids
        }
        StackOrder::InsideOut => {
            let mut ids = natural;
            ids.sort_by(|&a, &b| sums[b].total_cmp(&sums[a]));
            let (mut top, mut bottom) = (0.0, 0.0);
            let (mut tops, mut bottoms) = (Vec::new(), Vec::new());
            for i in ids {
                if top < bottom {
                    top += sums[i];
                    tops.push(i);
                } else {
                    bottom += sums[i];
                    bottoms.push(i);
                }
            }
            bottoms.reverse();
            bottoms.extend(tops);
            bottoms
        }
    }
}

fn apply_offset(points: &mut [Vec<[f64; 2]>], order: &[usize], offset: StackOffset) {
    let Some(&first) = order.first() else {
        return;
    };
    let m = points[first].len();

    match offset {
        StackOffset::None => {}
        StackOffset::Normalize => {
            for j in 0..m {
                let sum: f64 = points.iter().map(|s| s[j][1]).sum();
                if sum != 0.0 {
                    for s in points.iter_mut() {
                        s[j][1] /= sum;
                    }
                }
            }
        }
        StackOffset::Silhouette => {
            for j in 0..m {
                let sum: f64 = points.iter().map(|s| s[j][1]).sum();
                let base = -sum / 2.0;
                points[first][j][0] = base;
                points[first][j][1] += base;
            }
        }
        StackOffset::Wiggle => wiggle(points, order),
        StackOffset::Diverging => {
            for j in 0..m {
                let (mut positive, mut negative) = (0.0, 0.0);
                for &i in order {
                    let p = &mut points[i][j];
                    let dy = p[1] - p[0];
                    if dy > 0.0 {
                        *p = [positive, positive + dy];
                        positive += dy;
                    } else if dy < 0.0 {
                        *p = [negative + dy, negative];
                        negative += dy;
                    } else {
                        *p = [0.0, dy];
                    }
                }
            }
            return;
        }
    }

    accumulate(points, order);
}

/// Sets each series' start to the previous series' end.
fn accumulate(points: &mut [Vec<[f64; 2]>], order: &[usize]) {
    for w in 1..order.len() {
        let (below, above) = (order[w - 1], order[w]);
        for j in 0..points[above].len() {
            let base = points[below][j][1];
            let p = &mut points[above][j];
            p[0] = base;
            p[1] += base;
        }
    }
}

fn wiggle(points: &mut [Vec<[f64; 2]>], order: &[usize]) {
    let first = order[0];
    let m = points[first].len();
    if m == 0 {
        return;
    }

    let mut baselines = vec![0.0; m];
    let mut y = 0.0;
    for j in 1..m {
        let (mut weight, mut slope) = (0.0, 0.0);
        for (i, &si) in order.iter().enumerate() {
            let now = points[si][j][1];
            let before = points[si][j - 1][1];
            let mut change = (now - before) / 2.0;
            for &sk in &order[..i] {
                change += points[sk][j][1] - points[sk][j - 1][1];
            }
            weight += now;
            slope += change * now;
        }
        baselines[j - 1] = y;
        if weight != 0.0 {
            y -= slope / weight;
        }
    }
    baselines[m - 1] = y;

    for (j, base) in baselines.into_iter().enumerate() {
        let p = &mut points[first][j];
        p[0] = base;
        p[1] += base;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ROWS: [[f64; 3]; 3] = [[1.0, 2.0, 3.0], [2.0, 2.0, 2.0], [4.0, 0.0, 1.0]];

    fn run(offset: StackOffset, order: StackOrder) -> Vec<StackedSeries<usize>> {
        stack(&ROWS, &[0, 1, 2], |row, &k| row[k], offset, order).unwrap()
    }

    fn top(series: &[StackedSeries<usize>], row: usize) -> f64 {
        series.iter().map(|s| s.points[row][1]).fold(f64::MIN, f64::max)
    }

    #[test]
    fn test_none_offset_series_touch() {
        let series = run(StackOffset::None, StackOrder::None);
        for row in 0..ROWS.len() {
            assert_eq!(series[0].points[row][1], series[1].points[row][0]);
            assert_eq!(series[1].points[row][1], series[2].points[row][0]);
        }
        assert_eq!(series[2].points[0], [3.0, 6.0]);
    }

    #[test]
    fn test_normalize_tops_out_at_one() {
        let series = run(StackOffset::Normalize, StackOrder::None);
        for row in 0..ROWS.len() {
            assert!((top(&series, row) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_normalize_zero_row_stays_zero() {
        let rows = [[0.0, 0.0], [1.0, 1.0]];
        let series = stack(&rows, &[0usize, 1], |r, &k| r[k], StackOffset::Normalize, StackOrder::None).unwrap();
        assert_eq!(series[1].points[0], [0.0, 0.0]);
        assert_eq!(series[1].points[1], [0.5, 1.0]);
    }

    #[test]
    fn test_silhouette_is_centered() {
        let series = run(StackOffset::Silhouette, StackOrder::None);
        for row in 0..ROWS.len() {
            let bottom = series[0].points[row][0];
            assert!((bottom + top(&series, row)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_wiggle_keeps_thickness() {
        let series = run(StackOffset::Wiggle, StackOrder::None);
        assert_eq!(series[0].points[0][0], 0.0);
        for (k, s) in series.iter().enumerate() {
            for (row, p) in s.points.iter().enumerate() {
                assert!((p[1] - p[0] - ROWS[row][k]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_diverging_splits_signs() {
        let rows = [[2.0, -1.0, 3.0, -4.0]];
        let series = stack(&rows, &[0usize, 1, 2, 3], |r, &k| r[k], StackOffset::Diverging, StackOrder::None).unwrap();
        let points: Vec<[f64; 2]> = series.iter().map(|s| s.points[0]).collect();
        assert_eq!(points, vec![[0.0, 2.0], [-1.0, 0.0], [2.0, 5.0], [-5.0, -1.0]]);
    }

    #[test]
    fn test_orders() {
        // totals: 7, 4, 6
        let index = |order| run(StackOffset::None, order).iter().map(|s| s.index).collect::<Vec<_>>();
        assert_eq!(index(StackOrder::None), vec![0, 1, 2]);
        assert_eq!(index(StackOrder::Reverse), vec![2, 1, 0]);
        assert_eq!(index(StackOrder::Ascending), vec![2, 0, 1]);
        assert_eq!(index(StackOrder::Descending), vec![0, 2, 1]);
        // peaks at rows 2, 0, 0
        assert_eq!(index(StackOrder::Appearance), vec![2, 0, 1]);
        // bottoms = [0], tops = [2, 1]
        assert_eq!(index(StackOrder::InsideOut), vec![0, 2, 1]);
    }

    #[test]
    fn test_order_keeps_key_order_in_output() {
        let series = run(StackOffset::None, StackOrder::Reverse);
        assert_eq!(series.iter().map(|s| s.key).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(series[2].points[0], [0.0, 3.0]);
        assert_eq!(series[0].points[0], [5.0, 6.0]);
    }

    #[test]
    fn test_non_finite_counts_as_zero() {
        let rows = [[f64::NAN, 1.0]];
        let series = stack(&rows, &[0usize, 1], |r, &k| r[k], StackOffset::None, StackOrder::None).unwrap();
        assert_eq!(series[0].points[0], [0.0, 0.0]);
        assert_eq!(series[1].points[0], [0.0, 1.0]);
    }

    #[test]
    fn test_duplicate_series_key() {
        let err = stack(&ROWS, &[0usize, 0], |r, &k| r[k], StackOffset::None, StackOrder::None).unwrap_err();
        assert_eq!(err, Error::DuplicateKey { key: "0".to_string() });
    }

    #[test]
    fn test_empty_inputs() {
        let rows: [[f64; 1]; 0] = [];
        let series = stack(&rows, &[0usize], |r, &k| r[k], StackOffset::Wiggle, StackOrder::InsideOut).unwrap();
        assert_eq!(series.len(), 1);
        assert!(series[0].is_empty());
        assert!(run_empty_keys().is_empty());
    }

    fn run_empty_keys() -> Vec<StackedSeries<usize>> {
        stack(&ROWS, &[], |r, &k: &usize| r[k], StackOffset::Silhouette, StackOrder::None).unwrap()
    }
}
