//! The item stack value type.

use std::mem;

use crate::component::ComponentPatch;
use crate::item::ItemTypeRef;

/// A stack of items: an item type, a count, and a component patch.
///
/// The empty stack is the canonical "no item" value; a stack whose count
/// reaches zero normalizes back to it. Container code never stores
/// `Option<ItemStack>` — emptiness is queried with [`ItemStack::is_empty`].
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStack {
    item: Option<ItemTypeRef>,
    count: i32,
    components: ComponentPatch,
}

impl Default for ItemStack {
    fn default() -> Self {
        Self::empty()
    }
}

impl ItemStack {
    /// The empty stack.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            item: None,
            count: 0,
            components: ComponentPatch::empty(),
        }
    }

    /// Creates a stack of `count` items with no components.
    #[must_use]
    pub fn new(item: ItemTypeRef, count: i32) -> Self {
        Self::with_components(item, count, ComponentPatch::empty())
    }

    /// Creates a stack of `count` items carrying a component patch.
    #[must_use]
    pub fn with_components(item: ItemTypeRef, count: i32, components: ComponentPatch) -> Self {
        if count <= 0 {
            return Self::empty();
        }
        Self {
            item: Some(item),
            count,
            components,
        }
    }

    /// Returns true if this stack holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item.is_none() || self.count <= 0
    }

    /// The item type, if the stack is non-empty.
    #[must_use]
    pub fn item(&self) -> Option<ItemTypeRef> {
        if self.is_empty() { None } else { self.item }
    }

    /// The component patch.
    #[must_use]
    pub fn components(&self) -> &ComponentPatch {
        &self.components
    }

    /// The number of items in the stack.
    #[must_use]
    pub fn count(&self) -> i32 {
        self.count
    }

    /// Sets the count, normalizing to the empty stack at zero.
    pub fn set_count(&mut self, count: i32) {
        if count <= 0 {
            *self = Self::empty();
        } else {
            self.count = count;
        }
    }

    /// Increases the count by `amount`.
    pub fn grow(&mut self, amount: i32) {
        self.set_count(self.count + amount);
    }

    /// Decreases the count by `amount`, clamping at empty.
    pub fn shrink(&mut self, amount: i32) {
        self.set_count(self.count - amount);
    }

    /// Splits off up to `amount` items into a new stack.
    ///
    /// The returned stack holds `min(amount, count)` items; the receiver
    /// keeps the rest (possibly becoming empty).
    #[must_use]
    pub fn split(&mut self, amount: i32) -> Self {
        let taken = amount.min(self.count);
        if taken <= 0 {
            return Self::empty();
        }
        let result = self.copy_with_count(taken);
        self.shrink(taken);
        result
    }

    /// Returns a copy of this stack with the given count.
    #[must_use]
    pub fn copy_with_count(&self, count: i32) -> Self {
        if self.is_empty() || count <= 0 {
            return Self::empty();
        }
        let mut copy = self.clone();
        copy.count = count;
        copy
    }

    /// Takes the whole stack, leaving the receiver empty.
    #[must_use]
    pub fn copy_and_clear(&mut self) -> Self {
        mem::take(self)
    }

    /// The native maximum stack size for this stack's item type.
    ///
    /// Empty stacks report the default limit of 64.
    #[must_use]
    pub fn max_stack_size(&self) -> i32 {
        self.item().map_or(64, |item| item.max_stack_size)
    }

    /// Returns true if more than one of this item can occupy a slot.
    #[must_use]
    pub fn is_stackable(&self) -> bool {
        !self.is_empty() && self.max_stack_size() > 1
    }

    /// Similarity: same item type and same components, count ignored.
    ///
    /// This, not equality, decides whether two stacks may merge. Empty
    /// stacks are never similar to anything.
    #[must_use]
    pub fn is_same_item_same_components(a: &Self, b: &Self) -> bool {
        match (a.item(), b.item()) {
            (Some(item_a), Some(item_b)) => {
                std::ptr::eq(item_a, item_b) && a.components == b.components
            }
            _ => false,
        }
    }
}
