//! Component patches attached to item stacks.
//!
//! A component patch is the auxiliary data blob that rides along with an
//! item stack (damage, custom name, enchantments, ...). Two stacks may only
//! merge when their patches compare equal, so the patch participates in
//! similarity but never in quantity arithmetic.

use std::collections::BTreeMap;
use std::sync::Arc;

/// A single component value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentValue {
    /// A boolean flag component.
    Bool(bool),
    /// An integer component (damage, charges, ...).
    Int(i64),
    /// A text component (custom name, lore line, ...).
    Text(String),
}

/// An immutable, structurally-compared set of components.
///
/// The empty patch allocates nothing and is the default for freshly created
/// stacks. Patches are shared behind an `Arc`, so cloning a stack never
/// copies component data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentPatch(Option<Arc<BTreeMap<&'static str, ComponentValue>>>);

impl ComponentPatch {
    /// The empty patch.
    #[must_use]
    pub const fn empty() -> Self {
        Self(None)
    }

    /// Returns true if no components are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Returns the number of components in the patch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |map| map.len())
    }

    /// Gets a component by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ComponentValue> {
        self.0.as_ref().and_then(|map| map.get(key))
    }

    /// Returns a patch with `key` set to `value`.
    ///
    /// Copy-on-write: the receiver is left untouched.
    #[must_use]
    pub fn with(&self, key: &'static str, value: ComponentValue) -> Self {
        let mut map = self
            .0
            .as_ref()
            .map(|map| BTreeMap::clone(map))
            .unwrap_or_default();
        map.insert(key, value);
        Self(Some(Arc::new(map)))
    }

    /// Returns a patch with `key` removed, normalizing to the empty patch.
    #[must_use]
    pub fn without(&self, key: &str) -> Self {
        let Some(existing) = self.0.as_ref() else {
            return Self::empty();
        };
        let mut map = BTreeMap::clone(existing);
        map.remove(key);
        if map.is_empty() {
            Self::empty()
        } else {
            Self(Some(Arc::new(map)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_default() {
        assert_eq!(ComponentPatch::default(), ComponentPatch::empty());
        assert!(ComponentPatch::default().is_empty());
    }

    #[test]
    fn with_is_copy_on_write() {
        let base = ComponentPatch::empty();
        let damaged = base.with("damage", ComponentValue::Int(10));
        assert!(base.is_empty());
        assert_eq!(damaged.get("damage"), Some(&ComponentValue::Int(10)));
        assert_ne!(base, damaged);
    }

    #[test]
    fn without_normalizes_to_empty() {
        let patch = ComponentPatch::empty().with("damage", ComponentValue::Int(3));
        let cleared = patch.without("damage");
        assert_eq!(cleared, ComponentPatch::empty());
    }

    #[test]
    fn structural_equality() {
        let a = ComponentPatch::empty().with("damage", ComponentValue::Int(5));
        let b = ComponentPatch::empty().with("damage", ComponentValue::Int(5));
        assert_eq!(a, b);
    }
}
