use num_traits::Float;

/// Return `(min, max)` for two owned values.
pub fn sorted_pair<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Compute a small epsilon relative to the provided step.
/// Returns step / 10, which is used as a tolerance for floating-point comparisons.
pub fn epsilon_from_step<T: Float>(step: &T) -> T {
    *step / ten::<T>()
}

/// Linear interpolation between `a` and `b` at `t`.
#[inline]
pub fn lerp<T: Float>(a: T, b: T, t: T) -> T {
    a + (b - a) * t
}

/// Restrict `value` to the closed interval spanned by `a` and `b` (in any order).
#[inline]
pub fn clamp_to<T: Float>(value: T, a: T, b: T) -> T {
    let (lo, hi) = sorted_pair(a, b);
    value.max(lo).min(hi)
}

fn ten<T: Float>() -> T {
    let two = T::one() + T::one();
    let five = two + two + T::one();
    five + five
}

/// Find a "nice" step size (1, 2 or 5 times a power of ten) that is at least
/// `raw_step`. Works directly with the generic type without logarithms.
pub fn nice_step<D: Float>(raw_step: D) -> D {
    let one = D::one();
    let two = one + one;
    let five = two + two + one;
    let ten = five + five;

    let abs_step = raw_step.abs();
    if abs_step == D::zero() || !abs_step.is_finite() {
        return one;
    }

    let mut candidate = one;

    while candidate * ten < abs_step {
        candidate = candidate * ten;
    }

    while candidate > abs_step {
        candidate = candidate / ten;
    }

    // candidate <= abs_step < candidate * ten
    let candidates = [candidate, candidate * two, candidate * five, candidate * ten];

    for c in candidates {
        if c >= abs_step {
            return c;
        }
    }

    candidate * ten
}

/// Nice step for splitting `[start, stop]` into roughly `count` intervals.
///
/// Rounding is always upward so the interval count never exceeds `count`
/// by more than the partial intervals at either end.
pub fn tick_step<D: Float>(start: D, stop: D, count: usize) -> D {
    let count = D::from(count.max(1)).unwrap_or_else(D::one);
    nice_step((stop - start).abs() / count)
}

/// Largest multiple of `step` not above `value`.
pub fn floor_to_step<D: Float>(value: D, step: D) -> D {
    if step < D::one() {
        let inverse = (D::one() / step).round();
        (value * inverse).floor() / inverse
    } else {
        (value / step).floor() * step
    }
}

/// Smallest multiple of `step` not below `value`.
pub fn ceil_to_step<D: Float>(value: D, step: D) -> D {
    if step < D::one() {
        let inverse = (D::one() / step).round();
        (value * inverse).ceil() / inverse
    } else {
        (value / step).ceil() * step
    }
}

/// Values at multiples of `step` lying inside `[lo, hi]` (inclusive, with tolerance).
///
/// Fractional steps divide by the integer inverse instead of multiplying, so
/// `0.1 * 3` comes out as `0.3` rather than `0.30000000000000004`.
pub fn multiples_within(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    let (lo, hi) = sorted_pair(lo, hi);
    // tolerance in units of `step`
    let eps = 1e-9;
    if step < 1.0 {
        let inverse = (1.0 / step).round();
        let first = (lo * inverse - eps).ceil() as i64;
        let last = (hi * inverse + eps).floor() as i64;
        return (first..=last).map(|i| i as f64 / inverse).collect();
    }
    let first = (lo / step - eps).ceil() as i64;
    let last = (hi / step + eps).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}
