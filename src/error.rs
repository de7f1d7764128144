//! Error types shared by scales, layouts and the reconciler.

use thiserror::Error;

/// Faults detected while validating a [`ChartConfig`](crate::config::ChartConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("configuration missing field `{0}`")]
    MissingField(&'static str),

    #[error("padding {0} must lie in [0, 1)")]
    InvalidPadding(f64),

    #[error("range [{low}, {high}] must have two distinct finite endpoints")]
    InvalidRange { low: f64, high: f64 },

    #[error("domain [{low}, {high}] must have two distinct finite endpoints")]
    InvalidDomain { low: f64, high: f64 },

    #[error("threshold count must be at least 1")]
    ZeroThresholds,

    #[error("unknown easing `{0}`")]
    UnknownEasing(String),
}

/// Errors produced by the crate's public operations.
///
/// Every variant is local and recoverable: the caller decides whether to skip
/// the render pass, substitute defaults or show a "no data" state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A continuous scale was given a zero-width (or non-finite) domain.
    #[error("degenerate domain [{min}, {max}]: endpoints must be distinct and finite")]
    DomainDegenerate { min: f64, max: f64 },

    /// The key function returned the same key for two items of one dataset.
    #[error("duplicate key {key} in dataset")]
    DuplicateKey { key: String },

    /// A layout was requested on an empty dataset where the result is undefined.
    #[error("{layout} layout requires at least one row")]
    EmptyDataset { layout: &'static str },

    /// An inverse lookup on a discrete scale hit no slot.
    #[error("no slot at {value} (range [{low}, {high}])")]
    OutOfRangeLookup { value: f64, low: f64, high: f64 },

    #[error("invalid color `{0}`: expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
