use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::{Continuous, Invert, Linear, Scale, Tick, TickIter, util};
use crate::error::{Error, Result};

const SECOND: i64 = 1_000;
const MINUTE: i64 = SECOND * 60;
const HOUR: i64 = MINUTE * 60;
const DAY: i64 = HOUR * 24;
const WEEK: i64 = DAY * 7;
const MONTH: i64 = DAY * 30;
const YEAR: i64 = DAY * 365;

/// Milliseconds since the Unix epoch, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Midnight UTC of the given civil date. `month` and `day` are 1-based.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        Self::from_ymd_hms(year, month, day, 0, 0, 0)
    }

    pub fn from_ymd_hms(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        let days = days_from_civil(i64::from(year), i64::from(month), i64::from(day));
        Self(
            days * DAY
                + i64::from(hour) * HOUR
                + i64::from(minute) * MINUTE
                + i64::from(second) * SECOND,
        )
    }

    /// `(year, month, day)` of this instant in UTC.
    pub fn ymd(self) -> (i32, u32, u32) {
        let (y, m, d) = civil_from_days(self.0.div_euclid(DAY));
        (y as i32, m as u32, d as u32)
    }

    /// `(hour, minute, second, millisecond)` of this instant in UTC.
    pub fn hms(self) -> (u32, u32, u32, u32) {
        let ms = self.0.rem_euclid(DAY);
        (
            (ms / HOUR) as u32,
            (ms % HOUR / MINUTE) as u32,
            (ms % MINUTE / SECOND) as u32,
            (ms % SECOND) as u32,
        )
    }

    /// Day of the week, 0 = Sunday.
    pub fn weekday(self) -> u32 {
        // 1970-01-01 was a Thursday
        (self.0.div_euclid(DAY) + 4).rem_euclid(7) as u32
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self(after.as_millis() as i64),
            Err(before) => Self(-(before.duration().as_millis() as i64)),
        }
    }
}

impl From<Timestamp> for SystemTime {
    fn from(ts: Timestamp) -> Self {
        let magnitude = Duration::from_millis(ts.0.unsigned_abs());
        if ts.0 >= 0 {
            UNIX_EPOCH + magnitude
        } else {
            UNIX_EPOCH - magnitude
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (y, mo, d) = self.ymd();
        let (h, mi, s, ms) = self.hms();
        write!(f, "{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}.{ms:03}Z")
    }
}

// Howard Hinnant's proleptic Gregorian day-count algorithms.
fn days_from_civil(y: i64, m: i64, d: i64) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (m + 9) % 12;
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(z: i64) -> (i64, i64, i64) {
    let z = z + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    (if m <= 2 { y + 1 } else { y }, m, d)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    /// Weeks start on Sunday.
    Week,
    Month,
    Year,
}

/// A calendar interval such as "every 15 minutes" or "every 3 months".
///
/// Intervals are aligned to UTC calendar boundaries: 3-month steps fall on
/// January, April, July and October; 5-year steps on years divisible by 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeInterval {
    pub unit: TimeUnit,
    pub step: u32,
}

impl TimeInterval {
    pub const fn new(unit: TimeUnit, step: u32) -> Self {
        Self { unit, step }
    }

    pub const fn years(step: u32) -> Self {
        Self::new(TimeUnit::Year, step)
    }

    pub const fn months(step: u32) -> Self {
        Self::new(TimeUnit::Month, step)
    }

    pub const fn days(step: u32) -> Self {
        Self::new(TimeUnit::Day, step)
    }

    fn step(self) -> i64 {
        i64::from(self.step.max(1))
    }

    /// Approximate length in milliseconds, used to pick tick intervals.
    pub fn approx_millis(self) -> i64 {
        let unit = match self.unit {
            TimeUnit::Millisecond => 1,
            TimeUnit::Second => SECOND,
            TimeUnit::Minute => MINUTE,
            TimeUnit::Hour => HOUR,
            TimeUnit::Day => DAY,
            TimeUnit::Week => WEEK,
            TimeUnit::Month => MONTH,
            TimeUnit::Year => YEAR,
        };
        unit * self.step()
    }

    /// Latest interval boundary at or before `ts`.
    pub fn floor(self, ts: Timestamp) -> Timestamp {
        let step = self.step();
        let fixed = |unit: i64| Timestamp(ts.0 - ts.0.rem_euclid(unit * step));
        match self.unit {
            TimeUnit::Millisecond => fixed(1),
            TimeUnit::Second => fixed(SECOND),
            TimeUnit::Minute => fixed(MINUTE),
            TimeUnit::Hour => fixed(HOUR),
            TimeUnit::Day => {
                let (y, m, d) = ts.ymd();
                let d = i64::from(d);
                let d = d - (d - 1) % step;
                Timestamp(days_from_civil(i64::from(y), i64::from(m), d) * DAY)
            }
            TimeUnit::Week => {
                let day_start = ts.0 - ts.0.rem_euclid(DAY);
                let sunday = Timestamp(day_start - i64::from(ts.weekday()) * DAY);
                if step == 1 {
                    sunday
                } else {
                    // align multi-week steps to weeks counted from the first Sunday after the epoch
                    let weeks = (sunday.0 - 3 * DAY).div_euclid(WEEK);
                    Timestamp(sunday.0 - weeks.rem_euclid(step) * WEEK)
                }
            }
            TimeUnit::Month => {
                let (y, m, _) = ts.ymd();
                let m = i64::from(m);
                let m = m - (m - 1) % step;
                Timestamp(days_from_civil(i64::from(y), m, 1) * DAY)
            }
            TimeUnit::Year => {
                let y = i64::from(ts.ymd().0);
                let y = y - y.rem_euclid(step);
                Timestamp(days_from_civil(y, 1, 1) * DAY)
            }
        }
    }

    /// Earliest interval boundary at or after `ts`.
    pub fn ceil(self, ts: Timestamp) -> Timestamp {
        let floored = self.floor(ts);
        if floored == ts {
            ts
        } else {
            self.offset(floored, 1)
        }
    }

    /// Moves `ts` by `count` steps of this interval.
    pub fn offset(self, ts: Timestamp, count: i64) -> Timestamp {
        let n = count * self.step();
        match self.unit {
            TimeUnit::Millisecond => Timestamp(ts.0 + n),
            TimeUnit::Second => Timestamp(ts.0 + n * SECOND),
            TimeUnit::Minute => Timestamp(ts.0 + n * MINUTE),
            TimeUnit::Hour => Timestamp(ts.0 + n * HOUR),
            TimeUnit::Day => Timestamp(ts.0 + n * DAY),
            TimeUnit::Week => Timestamp(ts.0 + n * WEEK),
            TimeUnit::Month | TimeUnit::Year => {
                let months = if self.unit == TimeUnit::Year { n * 12 } else { n };
                let (y, m, d) = ts.ymd();
                let time_of_day = ts.0.rem_euclid(DAY);
                let total = i64::from(y) * 12 + i64::from(m) - 1 + months;
                let (y, m) = (total.div_euclid(12), total.rem_euclid(12) + 1);
                let d = i64::from(d).min(days_in_month(y, m));
                Timestamp(days_from_civil(y, m, d) * DAY + time_of_day)
            }
        }
    }

    /// Every boundary in `[start, stop)`.
    pub fn range(self, start: Timestamp, stop: Timestamp) -> Vec<Timestamp> {
        let mut out = Vec::new();
        let mut current = self.ceil(start);
        while current < stop {
            out.push(current);
            let next = self.offset(current, 1);
            if next <= current {
                break;
            }
            current = next;
        }
        out
    }
}

fn days_in_month(y: i64, m: i64) -> i64 {
    let (ny, nm) = if m == 12 { (y + 1, 1) } else { (y, m + 1) };
    days_from_civil(ny, nm, 1) - days_from_civil(y, m, 1)
}

const TICK_INTERVALS: [TimeInterval; 17] = [
    TimeInterval::new(TimeUnit::Second, 1),
    TimeInterval::new(TimeUnit::Second, 5),
    TimeInterval::new(TimeUnit::Second, 15),
    TimeInterval::new(TimeUnit::Second, 30),
    TimeInterval::new(TimeUnit::Minute, 1),
    TimeInterval::new(TimeUnit::Minute, 5),
    TimeInterval::new(TimeUnit::Minute, 15),
    TimeInterval::new(TimeUnit::Minute, 30),
    TimeInterval::new(TimeUnit::Hour, 1),
    TimeInterval::new(TimeUnit::Hour, 3),
    TimeInterval::new(TimeUnit::Hour, 6),
    TimeInterval::new(TimeUnit::Hour, 12),
    TimeInterval::new(TimeUnit::Day, 1),
    TimeInterval::new(TimeUnit::Day, 2),
    TimeInterval::new(TimeUnit::Week, 1),
    TimeInterval::new(TimeUnit::Month, 1),
    TimeInterval::new(TimeUnit::Month, 3),
];

/// Picks the calendar interval whose length best matches `span / count`.
pub fn tick_interval(start: Timestamp, stop: Timestamp, count: usize) -> TimeInterval {
    let (lo, hi) = util::sorted_pair(start.0, stop.0);
    let target = (hi - lo) as f64 / count.max(1) as f64;

    let i = TICK_INTERVALS.partition_point(|interval| (interval.approx_millis() as f64) <= target);
    if i == TICK_INTERVALS.len() {
        let (y0, y1) = (Timestamp(lo).ymd().0, Timestamp(hi).ymd().0);
        let years = util::tick_step(f64::from(y0), f64::from(y1), count);
        return TimeInterval::years(years.max(1.0) as u32);
    }
    if i == 0 {
        let ms = util::tick_step(lo as f64, hi as f64, count).max(1.0);
        return TimeInterval::new(TimeUnit::Millisecond, ms as u32);
    }
    let below = TICK_INTERVALS[i - 1];
    let above = TICK_INTERVALS[i];
    if target / (below.approx_millis() as f64) < (above.approx_millis() as f64) / target {
        below
    } else {
        above
    }
}

pub struct TimeTickIter {
    inner: std::vec::IntoIter<Timestamp>,
}

impl TimeTickIter {
    pub(crate) fn new(start: Timestamp, stop: Timestamp, count: usize) -> Self {
        let (lo, hi) = util::sorted_pair(start, stop);
        let interval = tick_interval(lo, hi, count);
        // range() excludes its end, so step one millisecond past it
        let ticks = interval.range(lo, Timestamp(hi.0 + 1));
        Self {
            inner: ticks.into_iter(),
        }
    }
}

impl Iterator for TimeTickIter {
    type Item = Tick<Timestamp>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|value| Tick { value, level: 0 })
    }
}

/// Time scale: a linear scale over millisecond timestamps with calendar-aware ticks.
///
/// ```rust
/// use tegn::scale::{Continuous, Scale, Time, Timestamp};
///
/// let x = Time::new(
///     [Timestamp::from_ymd(2000, 1, 1), Timestamp::from_ymd(2010, 1, 1)],
///     [0.0, 1000.0],
/// );
///
/// let mid = x.apply(&Timestamp::from_ymd(2005, 1, 1));
/// assert!((mid - 500.0).abs() < 1.0);
///
/// let years: Vec<_> = x.major_ticks(5).iter().map(|t| t.ymd().0).collect();
/// assert_eq!(years, vec![2000, 2002, 2004, 2006, 2008, 2010]);
/// ```
#[derive(Debug, Clone)]
pub struct Time {
    start: Timestamp,
    stop: Timestamp,
    linear: Linear<f64, f64>,
}

impl Time {
    pub fn new(domain: [Timestamp; 2], range: [f64; 2]) -> Self {
        Self {
            start: domain[0],
            stop: domain[1],
            linear: Linear::new([domain[0].0 as f64, domain[1].0 as f64], range),
        }
    }

    /// Rejects empty time domains.
    pub fn try_new(domain: [Timestamp; 2], range: [f64; 2]) -> Result<Self> {
        if domain[0] == domain[1] {
            return Err(Error::DomainDegenerate {
                min: domain[0].0 as f64,
                max: domain[1].0 as f64,
            });
        }
        Ok(Self::new(domain, range))
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.linear = self.linear.with_clamp(clamp);
        self
    }

    pub fn range(&self) -> (f64, f64) {
        self.linear.range()
    }

    /// Extends the domain to boundaries of the tick interval for `count` ticks.
    pub fn nice(&mut self, count: usize) {
        let reversed = self.stop < self.start;
        let (lo, hi) = util::sorted_pair(self.start, self.stop);
        let interval = tick_interval(lo, hi, count);
        let (lo, hi) = (interval.floor(lo), interval.ceil(hi));
        if reversed {
            self.set_domain(hi, lo);
        } else {
            self.set_domain(lo, hi);
        }
    }

    /// Every boundary of `interval` within the domain, e.g. yearly bin thresholds.
    pub fn interval_range(&self, interval: TimeInterval) -> Vec<Timestamp> {
        let (lo, hi) = util::sorted_pair(self.start, self.stop);
        interval.range(lo, hi)
    }
}

impl Scale for Time {
    type Domain = Timestamp;
    type Output = f64;

    fn apply(&self, value: &Timestamp) -> f64 {
        self.linear.apply(&(value.0 as f64))
    }
}

impl Invert for Time {
    fn invert(&self, output: &f64) -> Result<Timestamp> {
        Ok(Timestamp(self.linear.invert(output)?.round() as i64))
    }
}

impl Continuous for Time {
    type Normalized = f64;

    fn domain(&self) -> (&Timestamp, &Timestamp) {
        (&self.start, &self.stop)
    }

    fn set_domain(&mut self, min: Timestamp, max: Timestamp) {
        self.start = min;
        self.stop = max;
        self.linear.set_domain(min.0 as f64, max.0 as f64);
    }

    fn normalize_opt(&self, value: &Timestamp) -> Option<f64> {
        self.linear.normalize_opt(&(value.0 as f64))
    }

    fn denormalize_opt(&self, t: f64) -> Option<Timestamp> {
        self.linear
            .denormalize_opt(t)
            .map(|ms| Timestamp(ms.round() as i64))
    }

    fn pan_opt(&mut self, delta_norm: f64) -> Option<()> {
        self.linear.pan_opt(delta_norm)?;
        self.sync_from_linear();
        Some(())
    }

    fn zoom_opt(&mut self, factor: f64, anchor_norm: Option<f64>) -> Option<()> {
        self.linear.zoom_opt(factor, anchor_norm)?;
        self.sync_from_linear();
        Some(())
    }

    fn extend_domain(&mut self, other_min: &Timestamp, other_max: &Timestamp) {
        let start = if *other_min < self.start { *other_min } else { self.start };
        let stop = if *other_max > self.stop { *other_max } else { self.stop };
        self.set_domain(start, stop);
    }

    fn tick_iter(&self, count: usize) -> TickIter<Timestamp> {
        TimeTickIter::new(self.start, self.stop, count).into()
    }
}

impl Time {
    fn sync_from_linear(&mut self) {
        let (min, max) = self.linear.domain();
        self.start = Timestamp(min.round() as i64);
        self.stop = Timestamp(max.round() as i64);
    }
}
