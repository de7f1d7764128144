use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use crate::color::Rgb;

/// A single visual property value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Number(f64),
    Color(Rgb),
    Text(String),
}

impl AttrValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgb> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Value at `t` between `self` (t = 0) and `to` (t = 1).
    ///
    /// Numbers interpolate linearly and colors per channel. Text, and any
    /// pair of mismatched kinds, cannot be blended and jumps to `to` as soon
    /// as `t > 0`.
    pub fn interpolate(&self, to: &Self, t: f64) -> Self {
        match (self, to) {
            (Self::Number(a), Self::Number(b)) => Self::Number(a * (1.0 - t) + b * t),
            (Self::Color(a), Self::Color(b)) => Self::Color(a.mix(*b, t)),
            _ if t > 0.0 => to.clone(),
            _ => self.clone(),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<Rgb> for AttrValue {
    fn from(c: Rgb) -> Self {
        Self::Color(c)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Color(c) => write!(f, "{c}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Named visual properties of one element, e.g. `x`, `height`, `fill`.
///
/// ```rust
/// use tegn::color::Rgb;
/// use tegn::transition::Attributes;
///
/// let bar = Attributes::new()
///     .with("x", 10.0)
///     .with("height", 0.0)
///     .with("fill", Rgb::new(0x69, 0xb3, 0xa2));
///
/// assert_eq!(bar.number("x"), Some(10.0));
/// assert_eq!(bar.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(AttrValue::as_number)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AttrValue> {
        self.0.iter()
    }

    /// Attributes at `t` on the way from `self` to `to`.
    ///
    /// Properties only in `to` take their target value immediately;
    /// properties only in `self` are carried over unchanged.
    pub fn interpolate(&self, to: &Self, t: f64) -> Self {
        let mut out = self.clone();
        for (name, target) in &to.0 {
            let value = match self.0.get(name) {
                Some(current) => current.interpolate(target, t),
                None => target.clone(),
            };
            out.0.insert(name.clone(), value);
        }
        out
    }

    /// Copies every property of `other` over `self`.
    pub fn merge(&mut self, other: &Self) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }
}

impl<N: Into<String>, V: Into<AttrValue>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a AttrValue);
    type IntoIter = btree_map::Iter<'a, String, AttrValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
