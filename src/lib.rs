//! Scales, layouts and keyed reconciliation for data-driven charts.
//!
//! `tegn` is the engine underneath a chart sketch. It turns a dataset into
//! positioned, animated marks without owning a drawing surface:
//!
//! 1. configure a [`scale`] from the data extent ([`stats`]),
//! 2. run a [`layout`] (stack, bin, pie, force) when the chart needs one,
//! 3. build attributes per datum and hand them to a [`reconcile::Reconciler`]
//!    (or a [`chart::Chart`]) which diffs them by key into enter, update and
//!    exit sets and interpolates each item over time,
//! 4. receive keyed create, apply and remove calls through a
//!    [`render::RenderAdapter`].
//!
//! Nothing here spawns threads or keeps global state. Time is passed in by
//! the caller, usually from an animation-frame callback.
//!
//! # Scales
//!
//! ```rust
//! use tegn::scale::{Band, Invert, Linear, Scale};
//!
//! let y = Linear::new([0.0, 100.0], [0.0, 500.0]);
//! assert_eq!(y.apply(&50.0), 250.0);
//! assert_eq!(y.invert(&250.0).unwrap(), 50.0);
//!
//! let x = Band::new(["a", "b", "c", "d"], [0.0, 400.0]);
//! assert_eq!(x.bandwidth(), 100.0);
//! assert_eq!(x.position(&"c"), Some(200.0));
//! ```
//!
//! # Reconciliation
//!
//! ```rust
//! use std::time::Duration;
//! use tegn::chart::Chart;
//! use tegn::reconcile::Join;
//! use tegn::render::{CommandLog, RenderCommand};
//! use tegn::transition::{Attributes, TransitionConfig};
//!
//! let mut chart = Chart::new(CommandLog::new(), TransitionConfig::instant());
//! let join = Join::new(|s: &&str| s.to_string(), |_| Attributes::new().with("opacity", 1.0));
//!
//! chart.update(&["A", "B", "C"], &join).unwrap();
//! chart.frame(Duration::ZERO);
//!
//! let split = chart.update(&["B", "C", "D"], &join).unwrap();
//! assert_eq!(split.entering, vec!["D"]);
//! assert_eq!(split.updating, vec!["B", "C"]);
//! assert_eq!(split.exiting, vec!["A"]);
//!
//! chart.frame(Duration::ZERO);
//! let log = chart.adapter().commands();
//! assert_eq!(log.last(), Some(&RenderCommand::Remove { key: "A".to_string() }));
//! ```

pub mod chart;
pub mod color;
pub mod config;
pub mod error;
pub mod layout;
pub mod path;
pub mod reconcile;
pub mod render;
pub mod scale;
pub mod stats;
pub mod transform;
pub mod transition;

pub use num_traits::Float;

pub use chart::Chart;
pub use config::{ChartConfig, ChartConfigBuilder};
pub use error::{ConfigError, Error, Result};
pub use reconcile::{Join, Partition, Phase, PhaseSet, Reconciler};
pub use render::RenderAdapter;
pub use scale::{Continuous, Invert, Scale, Tick};
pub use transition::{Attributes, Easing, TransitionConfig};
