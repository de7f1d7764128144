//! One chart instance: a reconciler bound to a drawing surface.

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use crate::config::ChartConfig;
use crate::error::Result;
use crate::reconcile::{Join, Partition, Phase, PhaseSet, Reconciler};
use crate::render::RenderAdapter;
use crate::transition::TransitionConfig;

/// Drives a [`RenderAdapter`] from keyed dataset updates.
///
/// [`Chart::update`] creates elements for entering keys right away;
/// [`Chart::frame`] pushes interpolated attributes to the adapter and
/// removes elements whose exit transition finished.
///
/// ```rust
/// use std::time::Duration;
/// use tegn::chart::Chart;
/// use tegn::reconcile::Join;
/// use tegn::render::Scene;
/// use tegn::transition::{Attributes, Easing, TransitionConfig};
///
/// let config = TransitionConfig::new(Duration::from_millis(200), Easing::Linear);
/// let mut chart = Chart::new(Scene::new(), config);
/// let join = Join::new(|d: &(u32, f64)| d.0, |d: &(u32, f64)| Attributes::new().with("r", d.1))
///     .enter_from(|_| Attributes::new().with("r", 0.0));
///
/// chart.update(&[(1, 10.0)], &join).unwrap();
/// chart.frame(Duration::from_millis(100));
/// assert_eq!(chart.adapter().get(&1).and_then(|a| a.number("r")), Some(5.0));
/// ```
#[derive(Debug)]
pub struct Chart<K, A> {
    reconciler: Reconciler<K>,
    adapter: A,
}

impl<K, A> Chart<K, A>
where
    K: Eq + Hash + Clone + Debug,
    A: RenderAdapter<K>,
{
    pub fn new(adapter: A, transition: TransitionConfig) -> Self {
        Self {
            reconciler: Reconciler::new(transition),
            adapter,
        }
    }

    pub fn from_config(adapter: A, config: &ChartConfig) -> Self {
        Self::new(adapter, config.transition)
    }

    /// Reconciles `dataset` and creates an element for every entering key
    /// at its start attributes.
    ///
    /// On [`Error::DuplicateKey`](crate::Error::DuplicateKey) neither the
    /// reconciler nor the adapter is touched.
    pub fn update<D>(&mut self, dataset: &[D], join: &Join<'_, D, K>) -> Result<Partition<K>> {
        let split = self.reconciler.reconcile(dataset, join)?;
        for key in &split.entering {
            if let Some(item) = self.reconciler.get(key) {
                self.adapter.create_element(key, item.attributes());
            }
        }
        Ok(split)
    }

    /// Advances all transitions by `dt`. Returns the number still running.
    pub fn frame(&mut self, dt: Duration) -> usize {
        let Self { reconciler, adapter } = self;
        let mut finished_exits = Vec::new();
        let running = reconciler.drive(
            dt,
            PhaseSet::all(),
            |key, attributes| adapter.apply_attributes(key, attributes),
            |key, phase| {
                if phase == Phase::Exiting {
                    finished_exits.push(key.clone());
                }
            },
        );
        for key in &finished_exits {
            adapter.remove_element(key);
        }
        running
    }

    /// Runs frames of `step` until nothing animates, at most `max_frames` times.
    pub fn settle(&mut self, step: Duration, max_frames: usize) -> usize {
        let mut running = self.frame(step);
        let mut frames = 1;
        while running > 0 && frames < max_frames {
            running = self.frame(step);
            frames += 1;
        }
        running
    }

    pub fn is_animating(&self) -> bool {
        self.reconciler.is_animating()
    }

    pub fn reconciler(&self) -> &Reconciler<K> {
        &self.reconciler
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn into_adapter(self) -> A {
        self.adapter
    }
}
