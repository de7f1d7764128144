//! Attribute interpolation over time.
//!
//! A [`Tween`] blends one [`Attributes`] snapshot into another as an external
//! clock advances it; [`TransitionConfig`] fixes how long that takes and the
//! easing curve applied to progress. Nothing here owns a timer: callers pass
//! elapsed time in, typically from an animation-frame callback.

mod easing;
mod interpolate;

pub use easing::Easing;
pub use interpolate::{AttrValue, Attributes};

use std::time::Duration;

/// Duration and easing shared by every tween of one reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionConfig {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(250),
            easing: Easing::CubicInOut,
        }
    }
}

impl TransitionConfig {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// Changes take effect on the first frame.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Easing::Linear)
    }

    /// Linear progress in `[0, 1]` after `elapsed`; always 1 for a zero duration.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_nanos() as f64 / self.duration.as_nanos() as f64).min(1.0)
    }

    /// Eased progress after `elapsed`.
    pub fn eased(&self, elapsed: Duration) -> f64 {
        self.easing.apply(self.progress(elapsed))
    }
}

/// One in-flight interpolation between two attribute snapshots.
///
/// ```rust
/// use std::time::Duration;
/// use tegn::transition::{Attributes, Easing, TransitionConfig, Tween};
///
/// let config = TransitionConfig::new(Duration::from_millis(100), Easing::Linear);
/// let mut tween = Tween::new(
///     Attributes::new().with("height", 0.0),
///     Attributes::new().with("height", 80.0),
/// );
///
/// tween.advance(Duration::from_millis(25));
/// assert_eq!(tween.current(&config).number("height"), Some(20.0));
///
/// tween.advance(Duration::from_millis(200));
/// assert!(tween.is_done(&config));
/// assert_eq!(tween.current(&config).number("height"), Some(80.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: Attributes,
    to: Attributes,
    elapsed: Duration,
}

impl Tween {
    pub fn new(from: Attributes, to: Attributes) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
        }
    }

    /// Tween that has already reached `value`.
    pub fn settled(value: Attributes, config: &TransitionConfig) -> Self {
        Self {
            from: value.clone(),
            to: value,
            elapsed: config.duration,
        }
    }

    pub fn from(&self) -> &Attributes {
        &self.from
    }

    pub fn to(&self) -> &Attributes {
        &self.to
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    pub fn is_done(&self, config: &TransitionConfig) -> bool {
        config.progress(self.elapsed) >= 1.0
    }

    /// Interpolated attributes at the current elapsed time.
    pub fn current(&self, config: &TransitionConfig) -> Attributes {
        if self.is_done(config) {
            return self.from.interpolate(&self.to, 1.0);
        }
        self.from.interpolate(&self.to, config.eased(self.elapsed))
    }

    /// Restarts from wherever the tween is now toward a new target.
    pub fn retarget(&mut self, to: Attributes, config: &TransitionConfig) {
        self.from = self.current(config);
        self.to = to;
        self.elapsed = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_default_config() {
        let config = TransitionConfig::default();
        assert_eq!(config.duration, ms(250));
        assert_eq!(config.easing, Easing::CubicInOut);
    }

    #[test]
    fn test_progress_saturates() {
        let config = TransitionConfig::new(ms(200), Easing::Linear);
        assert_eq!(config.progress(ms(50)), 0.25);
        assert_eq!(config.progress(ms(900)), 1.0);
        assert_eq!(TransitionConfig::instant().progress(Duration::ZERO), 1.0);
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let config = TransitionConfig::new(ms(100), Easing::Linear);
        let mut tween = Tween::new(
            Attributes::new().with("x", 0.0),
            Attributes::new().with("x", 100.0),
        );
        tween.advance(ms(40));
        tween.retarget(Attributes::new().with("x", 0.0), &config);
        assert_eq!(tween.from().number("x"), Some(40.0));
        assert_eq!(tween.elapsed(), Duration::ZERO);

        tween.advance(ms(50));
        assert_eq!(tween.current(&config).number("x"), Some(20.0));
    }

    #[test]
    fn test_settled_tween_is_done() {
        let config = TransitionConfig::default();
        let tween = Tween::settled(Attributes::new().with("r", 3.0), &config);
        assert!(tween.is_done(&config));
        assert_eq!(tween.current(&config).number("r"), Some(3.0));
    }
}
