use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Timing curves mapping linear progress to eased progress.
///
/// Every curve maps `0` to `0` and `1` to `1`; input outside `[0, 1]` is
/// clamped first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    #[default]
    CubicInOut,
    SinIn,
    SinOut,
    SinInOut,
    ExpIn,
    ExpOut,
    ExpInOut,
    BounceOut,
}

impl Easing {
    pub const ALL: [Easing; 14] = [
        Self::Linear,
        Self::QuadIn,
        Self::QuadOut,
        Self::QuadInOut,
        Self::CubicIn,
        Self::CubicOut,
        Self::CubicInOut,
        Self::SinIn,
        Self::SinOut,
        Self::SinInOut,
        Self::ExpIn,
        Self::ExpOut,
        Self::ExpInOut,
        Self::BounceOut,
    ];

    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => t * (2.0 - t),
            Self::QuadInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t / 2.0
                } else {
                    let t = t - 1.0;
                    (t * (2.0 - t) + 1.0) / 2.0
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Self::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
            Self::SinIn => {
                if t == 1.0 { 1.0 } else { 1.0 - (t * FRAC_PI_2).cos() }
            }
            Self::SinOut => (t * FRAC_PI_2).sin(),
            Self::SinInOut => (1.0 - (PI * t).cos()) / 2.0,
            Self::ExpIn => exp_tail(1.0 - t),
            Self::ExpOut => 1.0 - exp_tail(t),
            Self::ExpInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    exp_tail(1.0 - t) / 2.0
                } else {
                    (2.0 - exp_tail(t - 1.0)) / 2.0
                }
            }
            Self::BounceOut => bounce_out(t),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::QuadIn => "quad-in",
            Self::QuadOut => "quad-out",
            Self::QuadInOut => "quad-in-out",
            Self::CubicIn => "cubic-in",
            Self::CubicOut => "cubic-out",
            Self::CubicInOut => "cubic-in-out",
            Self::SinIn => "sin-in",
            Self::SinOut => "sin-out",
            Self::SinInOut => "sin-in-out",
            Self::ExpIn => "exp-in",
            Self::ExpOut => "exp-out",
            Self::ExpInOut => "exp-in-out",
            Self::BounceOut => "bounce-out",
        }
    }
}

/// `2^(-10x)` rescaled so that it is exactly 1 at 0 and 0 at 1.
fn exp_tail(x: f64) -> f64 {
    (2f64.powf(-10.0 * x) - 0.0009765625) * 1.0009775171065494
}

fn bounce_out(t: f64) -> f64 {
    const B1: f64 = 4.0 / 11.0;
    const B2: f64 = 6.0 / 11.0;
    const B3: f64 = 8.0 / 11.0;
    const B4: f64 = 3.0 / 4.0;
    const B5: f64 = 9.0 / 11.0;
    const B6: f64 = 10.0 / 11.0;
    const B7: f64 = 15.0 / 16.0;
    const B8: f64 = 21.0 / 22.0;
    const B9: f64 = 63.0 / 64.0;
    const B0: f64 = 1.0 / B1 / B1;

    if t < B1 {
        B0 * t * t
    } else if t < B3 {
        let t = t - B2;
        B0 * t * t + B4
    } else if t < B6 {
        let t = t - B5;
        B0 * t * t + B7
    } else {
        let t = t - B8;
        B0 * t * t + B9
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = ConfigError;

    /// Accepts the kebab-case names printed by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|easing| easing.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownEasing(s.to_string()))
    }
}
