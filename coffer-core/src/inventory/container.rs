//! Containers: an opened inventory paired with its viewer's own.
//!
//! A container presents one combined menu-slot index space to the client:
//! the top (opened) inventory's flattened slots first, then the viewer's
//! main storage, then the hotbar. Exactly one viewer may be bound at a
//! time; a second bind is a construction-time failure, not a policy
//! outcome.

use coffer_registry::ItemStack;
use thiserror::Error;
use uuid::Uuid;

use super::builder::InventoryBuilder;
use super::player_inventory::{HOTBAR_SIZE, MAIN_SIZE, SyncPlayerInv};
use super::slot::Slot;
use super::tree::{InventoryTree, NodeId};

/// Container-level invariant violations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContainerError {
    /// The container is already bound to a different viewer.
    #[error("container is already bound to viewer {0}")]
    ViewerAlreadyBound(Uuid),
}

/// Where a menu index lands: the opened tree or the viewer's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSlotRef {
    /// A slot in the top (opened) inventory.
    Top(NodeId),
    /// A slot in the bottom (player) inventory, by inventory slot index.
    Bottom {
        /// The player inventory slot (0-8 hotbar, 9-35 main).
        inventory_slot: usize,
        /// The node in the player inventory tree.
        node: NodeId,
    },
}

/// A proposed or applied change to one menu slot.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuTransaction {
    /// The menu-slot index the change applies to.
    pub index: usize,
    /// Contents before the change.
    pub original: ItemStack,
    /// Contents after the change.
    pub replacement: ItemStack,
}

/// A composite inventory exposed to exactly one viewer.
#[derive(Debug)]
pub struct Container {
    id: u8,
    top: InventoryTree,
    bottom: SyncPlayerInv,
    viewer: Option<Uuid>,
    state_id: i32,
}

impl Container {
    /// Creates a container over an opened top inventory.
    #[must_use]
    pub fn new(id: u8, top: InventoryTree, bottom: SyncPlayerInv) -> Self {
        Self {
            id,
            top,
            bottom,
            viewer: None,
            state_id: 0,
        }
    }

    /// The always-available window 0: no top inventory, player slots only.
    #[must_use]
    pub fn inventory_only(bottom: SyncPlayerInv) -> Self {
        let top = InventoryBuilder::ordered()
            .build()
            .unwrap_or_else(|error| unreachable!("empty ordered tree is valid: {error}"));
        Self::new(0, top, bottom)
    }

    /// The container id used for window validation.
    #[must_use]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// The bound viewer, if any.
    #[must_use]
    pub fn viewer(&self) -> Option<Uuid> {
        self.viewer
    }

    /// Binds the single viewer.
    ///
    /// Rebinding the same viewer is a no-op; binding a second viewer
    /// fails fast.
    pub fn bind_viewer(&mut self, viewer: Uuid) -> Result<(), ContainerError> {
        match self.viewer {
            None => {
                self.viewer = Some(viewer);
                Ok(())
            }
            Some(bound) if bound == viewer => Ok(()),
            Some(bound) => Err(ContainerError::ViewerAlreadyBound(bound)),
        }
    }

    /// Detaches the viewer.
    pub fn unbind_viewer(&mut self) {
        self.viewer = None;
    }

    /// The state id for optimistic client locking.
    #[must_use]
    pub fn state_id(&self) -> i32 {
        self.state_id
    }

    /// Increments and returns the state id.
    pub fn increment_state_id(&mut self) -> i32 {
        self.state_id = (self.state_id + 1) & 0x7FFF;
        self.state_id
    }

    /// The opened inventory.
    #[must_use]
    pub fn top(&self) -> &InventoryTree {
        &self.top
    }

    /// Mutable access to the opened inventory.
    pub fn top_mut(&mut self) -> &mut InventoryTree {
        &mut self.top
    }

    /// The viewer's inventory handle.
    #[must_use]
    pub fn bottom(&self) -> &SyncPlayerInv {
        &self.bottom
    }

    /// Number of slots in the top inventory.
    #[must_use]
    pub fn top_slot_count(&self) -> usize {
        self.top.slot_count()
    }

    /// Number of menu slots (top + player inventory).
    #[must_use]
    pub fn menu_slot_count(&self) -> usize {
        self.top_slot_count() + MAIN_SIZE + HOTBAR_SIZE
    }

    /// The menu index of a hotbar slot (0-8).
    #[must_use]
    pub fn hotbar_menu_index(&self, hotbar_slot: usize) -> usize {
        self.top_slot_count() + MAIN_SIZE + hotbar_slot
    }

    /// Resolves a menu index to its backing slot.
    ///
    /// Menu layout: top slots, then main storage (inventory 9-35), then
    /// hotbar (inventory 0-8).
    #[must_use]
    pub fn resolve(&self, index: usize) -> Option<MenuSlotRef> {
        let top_count = self.top_slot_count();
        if index < top_count {
            return self.top.slot_at(index).map(MenuSlotRef::Top);
        }
        let offset = index - top_count;
        let inventory_slot = if offset < MAIN_SIZE {
            HOTBAR_SIZE + offset
        } else if offset < MAIN_SIZE + HOTBAR_SIZE {
            offset - MAIN_SIZE
        } else {
            return None;
        };
        let bottom = self.bottom.lock();
        bottom
            .tree()
            .slot_at(inventory_slot)
            .map(|node| MenuSlotRef::Bottom {
                inventory_slot,
                node,
            })
    }

    /// The stack at a menu index.
    #[must_use]
    pub fn stack_at(&self, index: usize) -> Option<ItemStack> {
        match self.resolve(index)? {
            MenuSlotRef::Top(node) => self.top.slot(node).map(|slot| slot.stack().clone()),
            MenuSlotRef::Bottom { node, .. } => {
                let bottom = self.bottom.lock();
                bottom.tree().slot(node).map(|slot| slot.stack().clone())
            }
        }
    }

    /// Runs a closure against the slot behind a menu index.
    #[must_use]
    pub fn with_slot<R>(&self, index: usize, f: impl FnOnce(&Slot) -> R) -> Option<R> {
        match self.resolve(index)? {
            MenuSlotRef::Top(node) => self.top.slot(node).map(f),
            MenuSlotRef::Bottom { node, .. } => {
                let bottom = self.bottom.lock();
                bottom.tree().slot(node).map(f)
            }
        }
    }

    /// Replaces the stack behind a menu index. Returns false for unknown
    /// indices.
    pub fn set_stack_at(&mut self, index: usize, stack: ItemStack) -> bool {
        match self.resolve(index) {
            Some(MenuSlotRef::Top(node)) => {
                if let Some(slot) = self.top.slot_mut(node) {
                    slot.set_stack_unchecked(stack);
                    true
                } else {
                    false
                }
            }
            Some(MenuSlotRef::Bottom { inventory_slot, .. }) => {
                let mut bottom = self.bottom.lock();
                bottom.set_stack(inventory_slot, stack);
                true
            }
            None => false,
        }
    }

    /// Applies a menu transaction list.
    pub fn apply(&mut self, transactions: &[MenuTransaction]) {
        for transaction in transactions {
            let _ = self.set_stack_at(transaction.index, transaction.replacement.clone());
        }
    }

    /// Sum of item quantities across the whole menu.
    #[must_use]
    pub fn total_items(&self) -> i64 {
        let bottom = self.bottom.lock();
        self.top.total_items() + bottom.tree().total_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::PlayerInventory;
    use crate::inventory::builder::standard;
    use coffer_registry::vanilla_items;

    fn chest_container(rows: u32) -> Container {
        let top = standard::chest(rows).instantiate().unwrap();
        Container::new(1, top, PlayerInventory::new().into_shared())
    }

    #[test]
    fn menu_layout_spans_top_main_hotbar() {
        let container = chest_container(3);
        assert_eq!(container.menu_slot_count(), 27 + 36);

        // First bottom index maps to inventory slot 9 (main storage).
        match container.resolve(27) {
            Some(MenuSlotRef::Bottom { inventory_slot, .. }) => assert_eq!(inventory_slot, 9),
            other => panic!("unexpected mapping: {other:?}"),
        }
        // Last menu index maps to hotbar slot 8.
        match container.resolve(27 + 35) {
            Some(MenuSlotRef::Bottom { inventory_slot, .. }) => assert_eq!(inventory_slot, 8),
            other => panic!("unexpected mapping: {other:?}"),
        }
        assert!(container.resolve(27 + 36).is_none());
    }

    #[test]
    fn stack_round_trips_through_menu_indices() {
        let mut container = chest_container(1);
        let stack = ItemStack::new(&vanilla_items::ARROW, 12);

        assert!(container.set_stack_at(4, stack.clone()));
        assert_eq!(container.stack_at(4), Some(stack.clone()));

        let hotbar_index = container.hotbar_menu_index(0);
        assert!(container.set_stack_at(hotbar_index, stack.clone()));
        assert_eq!(container.bottom().lock().stack(0), stack);
    }

    #[test]
    fn second_viewer_is_rejected() {
        let mut container = chest_container(1);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        container.bind_viewer(first).unwrap();
        container.bind_viewer(first).unwrap();
        assert_eq!(
            container.bind_viewer(second),
            Err(ContainerError::ViewerAlreadyBound(first))
        );
    }

    #[test]
    fn state_id_wraps_at_15_bits() {
        let mut container = chest_container(1);
        for _ in 0..0x7FFF {
            let _ = container.increment_state_id();
        }
        assert_eq!(container.increment_state_id(), 0);
    }
}
