use std::fmt;

use crate::transition::Attributes;

type KeyFn<'a, D, K> = Box<dyn Fn(&D) -> K + 'a>;
type AttrsFn<'a, D> = Box<dyn Fn(&D) -> Attributes + 'a>;

/// How a dataset binds to rendered items.
///
/// A join always has a key function and a target-attributes function.
/// Optionally it names where entering items start from and where exiting
/// items go before removal:
///
/// ```rust
/// use tegn::reconcile::Join;
/// use tegn::transition::Attributes;
///
/// struct Bar { name: &'static str, value: f64 }
///
/// let join = Join::new(
///     |bar: &Bar| bar.name,
///     |bar: &Bar| Attributes::new().with("y", 300.0 - bar.value).with("height", bar.value),
/// )
/// .enter_from(|_| Attributes::new().with("y", 300.0).with("height", 0.0))
/// .exit_to(Attributes::new().with("height", 0.0).with("opacity", 0.0));
///
/// let bar = Bar { name: "a", value: 20.0 };
/// assert_eq!(join.key(&bar), "a");
/// assert_eq!(join.target(&bar).number("y"), Some(280.0));
/// ```
pub struct Join<'a, D, K> {
    key_fn: KeyFn<'a, D, K>,
    attrs_fn: AttrsFn<'a, D>,
    enter_fn: Option<AttrsFn<'a, D>>,
    exit: Attributes,
}

impl<'a, D, K> Join<'a, D, K> {
    pub fn new(key_fn: impl Fn(&D) -> K + 'a, attrs_fn: impl Fn(&D) -> Attributes + 'a) -> Self {
        Self {
            key_fn: Box::new(key_fn),
            attrs_fn: Box::new(attrs_fn),
            enter_fn: None,
            exit: Attributes::new(),
        }
    }

    /// Start attributes for entering items. Without this they appear at
    /// their target immediately.
    #[must_use]
    pub fn enter_from(mut self, enter_fn: impl Fn(&D) -> Attributes + 'a) -> Self {
        self.enter_fn = Some(Box::new(enter_fn));
        self
    }

    /// Attributes exiting items transition to, layered over their current
    /// attributes.
    #[must_use]
    pub fn exit_to(mut self, exit: Attributes) -> Self {
        self.exit = exit;
        self
    }

    pub fn key(&self, item: &D) -> K {
        (self.key_fn)(item)
    }

    pub fn target(&self, item: &D) -> Attributes {
        (self.attrs_fn)(item)
    }

    /// Where an entering item starts, given its target.
    pub fn enter(&self, item: &D, target: &Attributes) -> Attributes {
        match &self.enter_fn {
            Some(enter) => enter(item),
            None => target.clone(),
        }
    }

    /// Where an exiting item ends, given its current attributes.
    pub fn exit(&self, current: &Attributes) -> Attributes {
        let mut out = current.clone();
        out.merge(&self.exit);
        out
    }
}

impl<D, K> fmt::Debug for Join<'_, D, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Join")
            .field("enter_from", &self.enter_fn.is_some())
            .field("exit_to", &self.exit)
            .finish_non_exhaustive()
    }
}
