//! Keyed enter/update/exit reconciliation.
//!
//! A [`Reconciler`] owns the authoritative map from key to [`RenderItem`] for
//! one chart. Each call to [`Reconciler::reconcile`] diffs a new dataset
//! against that map by key, retargets the per-item tweens, and reports the
//! [`Partition`]. [`Reconciler::drive`] then advances the tweens from an
//! external clock and reports interpolated attributes through callbacks.
//!
//! Item lifecycle:
//!
//! ```text
//! Entering ──done──▶ Updating ◀──reappears── Exiting ──done──▶ removed
//!     └───────────────────┴──────absent──────────▲
//! ```

mod join;
mod partition;

pub use join::Join;
pub use partition::{Partition, partition};

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use bitflags::bitflags;
use tracing::{debug, trace};

use crate::error::Result;
use crate::transition::{Attributes, TransitionConfig, Tween};

/// Transition phase of a rendered item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Entering,
    Updating,
    Exiting,
}

bitflags! {
    /// Selection of phases for [`Reconciler::drive`].
    ///
    /// Combine with bitwise OR: `PhaseSet::ENTERING | PhaseSet::EXITING`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PhaseSet: u8 {
        const ENTERING = 1 << 0;
        const UPDATING = 1 << 1;
        const EXITING = 1 << 2;
    }
}

impl Default for PhaseSet {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Phase> for PhaseSet {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Entering => Self::ENTERING,
            Phase::Updating => Self::UPDATING,
            Phase::Exiting => Self::EXITING,
        }
    }
}

impl PhaseSet {
    pub fn includes(self, phase: Phase) -> bool {
        self.contains(phase.into())
    }
}

/// One rendered element bound to one key.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem<K> {
    key: K,
    phase: Phase,
    attributes: Attributes,
    tween: Tween,
    order: u64,
}

impl<K> RenderItem<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Attributes as of the last frame.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Attributes the item is transitioning toward.
    pub fn target(&self) -> &Attributes {
        self.tween.to()
    }
}

/// Keyed render state of one chart.
///
/// ```rust
/// use std::time::Duration;
/// use tegn::reconcile::{Join, PhaseSet, Reconciler};
/// use tegn::transition::{Attributes, Easing, TransitionConfig};
///
/// let config = TransitionConfig::new(Duration::from_millis(100), Easing::Linear);
/// let mut bars = Reconciler::new(config);
/// let join = Join::new(|v: &(char, f64)| v.0, |v: &(char, f64)| Attributes::new().with("h", v.1))
///     .enter_from(|_| Attributes::new().with("h", 0.0));
///
/// let split = bars.reconcile(&[('a', 10.0), ('b', 20.0)], &join).unwrap();
/// assert_eq!(split.entering, vec!['a', 'b']);
///
/// let mut frames = Vec::new();
/// bars.drive(Duration::from_millis(50), PhaseSet::all(), |key, attrs| {
///     frames.push((*key, attrs.number("h").unwrap()));
/// }, |_, _| {});
/// assert_eq!(frames, vec![('a', 5.0), ('b', 10.0)]);
/// ```
#[derive(Debug, Clone)]
pub struct Reconciler<K> {
    items: HashMap<K, RenderItem<K>>,
    config: TransitionConfig,
    next_order: u64,
}

impl<K> Default for Reconciler<K> {
    fn default() -> Self {
        Self::new(TransitionConfig::default())
    }
}

impl<K> Reconciler<K> {
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            items: HashMap::new(),
            config,
            next_order: 0,
        }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Applies to tweens started after the change.
    pub fn set_config(&mut self, config: TransitionConfig) {
        self.config = config;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in first-appearance order.
    pub fn items(&self) -> Vec<&RenderItem<K>> {
        let mut items: Vec<&RenderItem<K>> = self.items.values().collect();
        items.sort_by_key(|item| item.order);
        items
    }

    /// Whether any tween is still running.
    pub fn is_animating(&self) -> bool {
        self.items
            .values()
            .any(|item| item.phase != Phase::Updating || !item.tween.is_done(&self.config))
    }

    /// Drops all items without emitting callbacks.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<K> Reconciler<K>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn get(&self, key: &K) -> Option<&RenderItem<K>> {
        self.items.get(key)
    }

    /// Keys in first-appearance order.
    pub fn keys(&self) -> Vec<K> {
        self.items().into_iter().map(|item| item.key.clone()).collect()
    }

    /// Diffs `dataset` against the current items and retargets their tweens.
    ///
    /// - Entering items start at the join's enter attributes.
    /// - Updating items restart from their current interpolated attributes,
    ///   so a key reconciled mid-transition never jumps. Exiting items that
    ///   reappear are revived this way.
    /// - Items absent from `dataset` start exiting toward the join's exit
    ///   attributes; items already exiting keep their running tween.
    ///
    /// Fails with [`Error::DuplicateKey`](crate::Error::DuplicateKey) before
    /// any item is touched.
    pub fn reconcile<D>(&mut self, dataset: &[D], join: &Join<'_, D, K>) -> Result<Partition<K>> {
        let split = partition(&self.keys(), dataset, |item| join.key(item))?;
        let config = self.config;

        for item in dataset {
            let key = join.key(item);
            let target = join.target(item);
            match self.items.get_mut(&key) {
                Some(existing) => {
                    existing.phase = Phase::Updating;
                    existing.tween.retarget(target, &config);
                    existing.attributes = existing.tween.from().clone();
                }
                None => {
                    let start = join.enter(item, &target);
                    let order = self.next_order;
                    self.next_order += 1;
                    self.items.insert(
                        key.clone(),
                        RenderItem {
                            key,
                            phase: Phase::Entering,
                            attributes: start.clone(),
                            tween: Tween::new(start, target),
                            order,
                        },
                    );
                }
            }
        }

        for key in &split.exiting {
            if let Some(item) = self.items.get_mut(key) {
                if item.phase != Phase::Exiting {
                    item.phase = Phase::Exiting;
                    let target = join.exit(&item.attributes);
                    item.tween.retarget(target, &config);
                }
            }
        }

        debug!(
            entering = split.entering.len(),
            updating = split.updating.len(),
            exiting = split.exiting.len(),
            "reconciled dataset"
        );
        Ok(split)
    }

    /// Advances every running tween whose phase is in `phases` by `dt`.
    ///
    /// `on_frame` receives each advanced item's interpolated attributes.
    /// When a tween completes, `on_complete` receives the key and the phase
    /// that finished: entering items then become updating, and exiting items
    /// are removed. With a zero duration everything completes on the first
    /// call. Callbacks run in first-appearance order.
    ///
    /// Returns the number of tweens still running, in any phase.
    pub fn drive(
        &mut self,
        dt: Duration,
        phases: PhaseSet,
        mut on_frame: impl FnMut(&K, &Attributes),
        mut on_complete: impl FnMut(&K, Phase),
    ) -> usize {
        let config = self.config;
        let mut order: Vec<(u64, K)> = self
            .items
            .values()
            .filter(|item| phases.includes(item.phase))
            .filter(|item| item.phase != Phase::Updating || !item.tween.is_done(&config))
            .map(|item| (item.order, item.key.clone()))
            .collect();
        order.sort_by_key(|(o, _)| *o);

        let mut removed = HashSet::new();
        for (_, key) in &order {
            let Some(item) = self.items.get_mut(key) else {
                continue;
            };
            item.tween.advance(dt);
            item.attributes = item.tween.current(&config);
            on_frame(key, &item.attributes);

            if item.tween.is_done(&config) {
                let finished = item.phase;
                match finished {
                    Phase::Entering => item.phase = Phase::Updating,
                    Phase::Updating => {}
                    Phase::Exiting => {
                        removed.insert(key.clone());
                    }
                }
                on_complete(key, finished);
            }
        }
        self.items.retain(|key, _| !removed.contains(key));

        let running = self
            .items
            .values()
            .filter(|item| item.phase != Phase::Updating || !item.tween.is_done(&config))
            .count();
        trace!(advanced = order.len(), removed = removed.len(), running, "drove transitions");
        running
    }

    /// Current attributes of every item, in first-appearance order.
    pub fn snapshot(&self) -> Vec<(K, Attributes)> {
        self.items()
            .into_iter()
            .map(|item| (item.key.clone(), item.attributes.clone()))
            .collect()
    }
}
