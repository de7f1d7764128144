//! The seam between the engine and a drawing surface.
//!
//! The engine never touches a surface directly. It emits keyed create,
//! apply and remove calls through [`RenderAdapter`]; an implementation maps
//! them onto SVG nodes, canvas draw lists, terminal cells or anything else.
//! Two in-memory adapters are provided: [`CommandLog`] records every call
//! and [`Scene`] retains the latest attributes per key.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::warn;

use crate::transition::Attributes;

/// Sink for keyed element changes.
pub trait RenderAdapter<K> {
    /// A new element bound to `key` appears with `initial` attributes.
    fn create_element(&mut self, key: &K, initial: &Attributes);

    /// The element bound to `key` takes on `attributes`.
    fn apply_attributes(&mut self, key: &K, attributes: &Attributes);

    /// The element bound to `key` is gone.
    fn remove_element(&mut self, key: &K);
}

impl<K, A: RenderAdapter<K> + ?Sized> RenderAdapter<K> for &mut A {
    fn create_element(&mut self, key: &K, initial: &Attributes) {
        (**self).create_element(key, initial);
    }

    fn apply_attributes(&mut self, key: &K, attributes: &Attributes) {
        (**self).apply_attributes(key, attributes);
    }

    fn remove_element(&mut self, key: &K) {
        (**self).remove_element(key);
    }
}

/// One recorded adapter call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand<K> {
    Create { key: K, attributes: Attributes },
    Apply { key: K, attributes: Attributes },
    Remove { key: K },
}

impl<K> RenderCommand<K> {
    pub fn key(&self) -> &K {
        match self {
            Self::Create { key, .. } | Self::Apply { key, .. } | Self::Remove { key } => key,
        }
    }
}

/// Adapter recording every call in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandLog<K> {
    commands: Vec<RenderCommand<K>>,
}

impl<K> Default for CommandLog<K> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

impl<K> CommandLog<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand<K>] {
        &self.commands
    }

    /// Takes the recorded commands, leaving the log empty.
    pub fn drain(&mut self) -> Vec<RenderCommand<K>> {
        std::mem::take(&mut self.commands)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<K: Clone> RenderAdapter<K> for CommandLog<K> {
    fn create_element(&mut self, key: &K, initial: &Attributes) {
        self.commands.push(RenderCommand::Create {
            key: key.clone(),
            attributes: initial.clone(),
        });
    }

    fn apply_attributes(&mut self, key: &K, attributes: &Attributes) {
        self.commands.push(RenderCommand::Apply {
            key: key.clone(),
            attributes: attributes.clone(),
        });
    }

    fn remove_element(&mut self, key: &K) {
        self.commands.push(RenderCommand::Remove { key: key.clone() });
    }
}

/// Adapter retaining the latest attributes of every live element, the way a
/// retained-mode surface would.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene<K: Eq + Hash> {
    elements: HashMap<K, Attributes>,
}

impl<K: Eq + Hash> Default for Scene<K> {
    fn default() -> Self {
        Self {
            elements: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> Scene<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&Attributes> {
        self.elements.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.elements.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Attributes)> {
        self.elements.iter()
    }
}

impl<K: Eq + Hash + Clone + Debug> RenderAdapter<K> for Scene<K> {
    fn create_element(&mut self, key: &K, initial: &Attributes) {
        if self.elements.insert(key.clone(), initial.clone()).is_some() {
            warn!(?key, "element created twice; replacing its attributes");
        }
    }

    fn apply_attributes(&mut self, key: &K, attributes: &Attributes) {
        match self.elements.get_mut(key) {
            Some(current) => current.merge(attributes),
            None => warn!(?key, "attributes applied to an element that does not exist"),
        }
    }

    fn remove_element(&mut self, key: &K) {
        if self.elements.remove(key).is_none() {
            warn!(?key, "removed an element that does not exist");
        }
    }
}
