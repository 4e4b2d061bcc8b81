//! Item registry and stack value types.
//!
//! This crate holds the data-side of the inventory model: static item type
//! definitions and the [`ItemStack`] value type that every container
//! operation consumes and produces.

pub mod component;
pub mod item;
pub mod item_stack;

pub use component::{ComponentPatch, ComponentValue};
pub use item::{ItemType, ItemTypeRef, vanilla_items};
pub use item_stack::ItemStack;
