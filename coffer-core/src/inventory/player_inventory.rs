//! Player inventory implementation.

use std::sync::Arc;

use coffer_registry::ItemStack;
use parking_lot::Mutex;

use super::builder::standard;
use super::transaction::ItemMatcher;
use super::tree::{InventoryTree, NodeId};

/// The number of hotbar slots.
pub const HOTBAR_SIZE: usize = 9;
/// The number of main storage slots.
pub const MAIN_SIZE: usize = 27;
/// The total number of player inventory slots.
pub const INVENTORY_SIZE: usize = HOTBAR_SIZE + MAIN_SIZE;

/// A player inventory shared between the session and its containers.
pub type SyncPlayerInv = Arc<Mutex<PlayerInventory>>;

/// The player's inventory: hotbar slots 0-8, main storage 9-35.
///
/// Built from the standard player archetype, so the same traversal and
/// transaction machinery that drives chests drives this tree.
#[derive(Debug)]
pub struct PlayerInventory {
    tree: InventoryTree,
    selected_slot: usize,
    times_changed: u32,
}

impl Default for PlayerInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerInventory {
    /// Creates a new empty player inventory.
    #[must_use]
    pub fn new() -> Self {
        let tree = standard::player_inventory()
            .instantiate()
            .unwrap_or_else(|error| unreachable!("player archetype is statically valid: {error}"));
        Self {
            tree,
            selected_slot: 0,
            times_changed: 0,
        }
    }

    /// Shared handle for use by containers and the click session.
    #[must_use]
    pub fn into_shared(self) -> SyncPlayerInv {
        Arc::new(Mutex::new(self))
    }

    /// The underlying inventory tree.
    #[must_use]
    pub fn tree(&self) -> &InventoryTree {
        &self.tree
    }

    /// Mutable access to the underlying tree.
    pub fn tree_mut(&mut self) -> &mut InventoryTree {
        &mut self.tree
    }

    /// Returns whether the given slot index is a hotbar slot.
    #[must_use]
    pub const fn is_hotbar_slot(slot: usize) -> bool {
        slot < HOTBAR_SIZE
    }

    /// The currently selected hotbar slot (0-8).
    #[must_use]
    pub fn selected_slot(&self) -> usize {
        self.selected_slot
    }

    /// Sets the selected hotbar slot.
    ///
    /// # Panics
    /// Panics if `slot` is not in the range 0-8.
    pub fn set_selected_slot(&mut self, slot: usize) {
        assert!(Self::is_hotbar_slot(slot), "Invalid hotbar slot: {slot}");
        self.selected_slot = slot;
    }

    fn node_at(&self, slot: usize) -> Option<NodeId> {
        self.tree.slot_at(slot)
    }

    /// The stack in the given inventory slot.
    #[must_use]
    pub fn stack(&self, slot: usize) -> ItemStack {
        self.node_at(slot)
            .and_then(|id| self.tree.slot(id))
            .map_or_else(ItemStack::empty, |slot| slot.stack().clone())
    }

    /// Replaces the stack in the given slot unconditionally.
    pub fn set_stack(&mut self, slot: usize, stack: ItemStack) {
        if let Some(id) = self.node_at(slot)
            && let Some(target) = self.tree.slot_mut(id)
        {
            target.set_stack_unchecked(stack);
            self.set_changed();
        }
    }

    /// The item currently held in the selected hotbar slot.
    #[must_use]
    pub fn selected_item(&self) -> ItemStack {
        self.stack(self.selected_slot)
    }

    /// Removes up to `count` items from the selected hotbar slot.
    pub fn remove_from_selected(&mut self, all: bool) -> ItemStack {
        let Some(id) = self.node_at(self.selected_slot) else {
            return ItemStack::empty();
        };
        let current = self.stack(self.selected_slot);
        if current.is_empty() {
            return ItemStack::empty();
        }
        let limit = if all { current.count() } else { 1 };
        let Some(slot) = self.tree.slot_mut(id) else {
            return ItemStack::empty();
        };
        let taken = slot.poll(limit, &ItemMatcher::Any);
        if !taken.is_empty() {
            self.set_changed();
        }
        taken
    }

    /// Tries to add an item, preferring existing piles over empty slots.
    ///
    /// Drains the caller's stack and returns true if anything was added.
    pub fn add(&mut self, item: &mut ItemStack) -> bool {
        if item.is_empty() {
            return false;
        }
        let before = item.count();
        let _ = self.tree.offer(item);
        let added = item.count() < before;
        if added {
            self.set_changed();
        }
        added
    }

    /// Drops all items from the inventory, returning them.
    pub fn drop_all(&mut self) -> Vec<ItemStack> {
        let mut dropped = Vec::new();
        for index in 0..INVENTORY_SIZE {
            let Some(id) = self.node_at(index) else { continue };
            if let Some(slot) = self.tree.slot_mut(id) {
                let taken = slot.clear();
                if !taken.is_empty() {
                    dropped.push(taken);
                }
            }
        }
        self.set_changed();
        dropped
    }

    /// The number of times the inventory has been modified.
    #[must_use]
    pub fn times_changed(&self) -> u32 {
        self.times_changed
    }

    /// Records a modification.
    pub fn set_changed(&mut self) {
        self.times_changed = self.times_changed.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_registry::vanilla_items;

    fn stone(count: i32) -> ItemStack {
        ItemStack::new(&vanilla_items::STONE, count)
    }

    #[test]
    fn layout_is_hotbar_then_main() {
        let inv = PlayerInventory::new();
        assert_eq!(inv.tree().slot_count(), INVENTORY_SIZE);
        assert!(PlayerInventory::is_hotbar_slot(8));
        assert!(!PlayerInventory::is_hotbar_slot(9));
    }

    #[test]
    fn add_prefers_existing_pile() {
        let mut inv = PlayerInventory::new();
        inv.set_stack(20, stone(10));

        let mut pickup = stone(5);
        assert!(inv.add(&mut pickup));
        assert!(pickup.is_empty());
        assert_eq!(inv.stack(20).count(), 15);
        assert!(inv.stack(0).is_empty());
    }

    #[test]
    fn add_falls_back_to_first_free_slot() {
        let mut inv = PlayerInventory::new();
        let mut pickup = stone(5);
        assert!(inv.add(&mut pickup));
        assert_eq!(inv.stack(0).count(), 5);
    }

    #[test]
    fn remove_from_selected_takes_one_or_all() {
        let mut inv = PlayerInventory::new();
        inv.set_selected_slot(2);
        inv.set_stack(2, stone(10));

        assert_eq!(inv.remove_from_selected(false).count(), 1);
        assert_eq!(inv.stack(2).count(), 9);
        assert_eq!(inv.remove_from_selected(true).count(), 9);
        assert!(inv.selected_item().is_empty());
    }

    #[test]
    fn drop_all_empties_everything() {
        let mut inv = PlayerInventory::new();
        inv.set_stack(0, stone(3));
        inv.set_stack(35, stone(4));

        let dropped = inv.drop_all();
        assert_eq!(dropped.len(), 2);
        assert_eq!(inv.tree().total_items(), 0);
    }
}
