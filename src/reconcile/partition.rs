use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{Error, Result};

/// Keys of a dataset classified against the previously rendered keys.
///
/// `entering` and `updating` follow dataset order; `exiting` follows the
/// order of the previous keys. The three lists are disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<K> {
    pub entering: Vec<K>,
    pub updating: Vec<K>,
    pub exiting: Vec<K>,
}

impl<K> Default for Partition<K> {
    fn default() -> Self {
        Self {
            entering: Vec::new(),
            updating: Vec::new(),
            exiting: Vec::new(),
        }
    }
}

impl<K> Partition<K> {
    /// True when nothing enters or exits.
    pub fn is_stable(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

/// Keys of `dataset` in order, failing on the first duplicate.
pub(crate) fn dataset_keys<D, K>(dataset: &[D], key_fn: impl Fn(&D) -> K) -> Result<Vec<K>>
where
    K: Eq + Hash + Clone + Debug,
{
    let mut seen = HashSet::with_capacity(dataset.len());
    let mut keys = Vec::with_capacity(dataset.len());
    for item in dataset {
        let key = key_fn(item);
        if !seen.insert(key.clone()) {
            return Err(Error::DuplicateKey {
                key: format!("{key:?}"),
            });
        }
        keys.push(key);
    }
    Ok(keys)
}

/// Classifies `dataset` against `previous` by key.
///
/// Fails with [`Error::DuplicateKey`] when `key_fn` maps two items of the
/// dataset to the same key.
///
/// ```rust
/// use tegn::reconcile::partition;
///
/// let split = partition(&["A", "B", "C"], &["B", "C", "D"], |s| *s).unwrap();
///
/// assert_eq!(split.entering, vec!["D"]);
/// assert_eq!(split.updating, vec!["B", "C"]);
/// assert_eq!(split.exiting, vec!["A"]);
/// ```
pub fn partition<D, K>(previous: &[K], dataset: &[D], key_fn: impl Fn(&D) -> K) -> Result<Partition<K>>
where
    K: Eq + Hash + Clone + Debug,
{
    let keys = dataset_keys(dataset, key_fn)?;
    let before: HashSet<&K> = previous.iter().collect();
    let after: HashSet<&K> = keys.iter().collect();

    let mut split = Partition::default();
    for key in &keys {
        if before.contains(key) {
            split.updating.push(key.clone());
        } else {
            split.entering.push(key.clone());
        }
    }
    split.exiting = previous
        .iter()
        .filter(|key| !after.contains(key))
        .cloned()
        .collect();
    Ok(split)
}
