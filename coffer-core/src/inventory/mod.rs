//! This module contains the inventory system.

pub mod archetype;
pub mod builder;
mod container;
mod player_inventory;
mod query;
mod slot;
mod transaction;
mod tree;

pub use container::{Container, ContainerError, MenuSlotRef, MenuTransaction};
pub use player_inventory::{
    HOTBAR_SIZE, INVENTORY_SIZE, MAIN_SIZE, PlayerInventory, SyncPlayerInv,
};
pub use slot::{Slot, SlotFilter, SlotOffer, SlotPoll, SlotSet};
pub use transaction::{
    ItemMatcher, PeekedOffer, PeekedPoll, PeekedSet, SlotTransaction, TransactionList,
};
pub use tree::{Addressing, Composite, InventoryTree, Node, NodeId, NodeKind, PropertyValue};
