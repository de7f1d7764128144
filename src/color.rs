//! sRGB colors, interpolators and a few named schemes.
//!
//! Interpolation is a straight per-channel blend in sRGB space, which is what
//! the sequential color scale and attribute transitions use.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Per-channel blend: `t = 0` gives `self`, `t = 1` gives `other`.
    /// `t` is clamped to `[0, 1]`.
    pub fn mix(self, other: Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let channel = |a: u8, b: u8| {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Parses `#rgb` or `#rrggbb` (the `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidColor(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let digit = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let expand = |v: u8| v * 17;
                Ok(Self::new(expand(digit(0, 1)?), expand(digit(1, 1)?), expand(digit(2, 1)?)))
            }
            6 => Ok(Self::new(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?)),
            _ => Err(invalid()),
        }
    }
}

/// Interpolator from `a` to `b`.
pub fn interpolate_rgb(a: Rgb, b: Rgb) -> impl Fn(f64) -> Rgb + Clone + Send + Sync {
    move |t| a.mix(b, t)
}

/// Interpolator through evenly spaced color stops.
///
/// An empty stop list yields black; a single stop yields that color.
pub fn piecewise(stops: &[Rgb]) -> impl Fn(f64) -> Rgb + Clone + Send + Sync + use<> {
    let stops = stops.to_vec();
    move |t| {
        match stops.len() {
            0 => return Rgb::BLACK,
            1 => return stops[0],
            _ => {}
        }
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = (stops.len() - 1) as f64;
        let position = t * segments;
        let i = (position.floor() as usize).min(stops.len() - 2);
        stops[i].mix(stops[i + 1], position - i as f64)
    }
}

/// Samples `n` evenly spaced values from `interpolator` over `[0, 1]`.
pub fn quantize<T>(interpolator: impl Fn(f64) -> T, n: usize) -> Vec<T> {
    match n {
        0 => Vec::new(),
        1 => vec![interpolator(0.0)],
        _ => (0..n)
            .map(|i| interpolator(i as f64 / (n - 1) as f64))
            .collect(),
    }
}

/// Ten categorical colors for ordinal scales.
pub const CATEGORY10: [Rgb; 10] = [
    Rgb::from_hex(0x1f77b4),
    Rgb::from_hex(0xff7f0e),
    Rgb::from_hex(0x2ca02c),
    Rgb::from_hex(0xd62728),
    Rgb::from_hex(0x9467bd),
    Rgb::from_hex(0x8c564b),
    Rgb::from_hex(0xe377c2),
    Rgb::from_hex(0x7f7f7f),
    Rgb::from_hex(0xbcbd22),
    Rgb::from_hex(0x17becf),
];

/// Diverging red-yellow-blue scheme, red at `t = 0`.
pub const SPECTRAL: [Rgb; 11] = [
    Rgb::from_hex(0x9e0142),
    Rgb::from_hex(0xd53e4f),
    Rgb::from_hex(0xf46d43),
    Rgb::from_hex(0xfdae61),
    Rgb::from_hex(0xfee08b),
    Rgb::from_hex(0xffffbf),
    Rgb::from_hex(0xe6f598),
    Rgb::from_hex(0xabdda4),
    Rgb::from_hex(0x66c2a5),
    Rgb::from_hex(0x3288bd),
    Rgb::from_hex(0x5e4fa2),
];

/// Sequential white-to-purple-red scheme.
pub const PURD: [Rgb; 9] = [
    Rgb::from_hex(0xf7f4f9),
    Rgb::from_hex(0xe7e1ef),
    Rgb::from_hex(0xd4b9da),
    Rgb::from_hex(0xc994c7),
    Rgb::from_hex(0xdf65b0),
    Rgb::from_hex(0xe7298a),
    Rgb::from_hex(0xce1256),
    Rgb::from_hex(0x980043),
    Rgb::from_hex(0x67001f),
];

pub fn interpolate_spectral(t: f64) -> Rgb {
    piecewise(&SPECTRAL)(t)
}

pub fn interpolate_purd(t: f64) -> Rgb {
    piecewise(&PURD)(t)
}
