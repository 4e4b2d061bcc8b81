//! Decoded protocol messages consumed by the click session.
//!
//! Wire decoding happens on the I/O threads; these are the logical
//! payloads handed to the logic thread. Stale messages (old window ids,
//! out-of-range slots) are expected and ignored, never errors.

use coffer_registry::ItemStack;

use super::click_type::ClickType;

/// Slot value indicating a click outside the inventory window.
pub const SLOT_CLICKED_OUTSIDE: i16 = -999;

/// A click on a container window.
#[derive(Debug, Clone)]
pub struct ClickWindow {
    /// The window the client thinks it is clicking in.
    pub window_id: u8,
    /// The clicked menu slot, or [`SLOT_CLICKED_OUTSIDE`].
    pub slot: i16,
    /// The raw button field; meaning depends on `click_type`.
    pub button: i8,
    /// The decoded click mode.
    pub click_type: ClickType,
    /// The client's prediction of the carried stack after the click.
    pub carried_snapshot: ItemStack,
}

/// A creative-mode direct slot overwrite, bypassing filters.
#[derive(Debug, Clone)]
pub struct CreativeClick {
    /// The target menu slot; negative means "drop the stack".
    pub slot: i16,
    /// The stack to conjure into the slot.
    pub stack: ItemStack,
}

/// The client closed a window.
#[derive(Debug, Clone, Copy)]
pub struct CloseWindow {
    /// The window being closed.
    pub window_id: u8,
}

/// The player pressed the drop key outside any window.
#[derive(Debug, Clone, Copy)]
pub struct DropHeldItem {
    /// Drop the whole held stack instead of a single item.
    pub full_stack: bool,
}

/// Any decoded message this subsystem consumes.
#[derive(Debug, Clone)]
pub enum InboundMessage {
    /// A window click.
    Click(ClickWindow),
    /// A creative slot overwrite.
    Creative(CreativeClick),
    /// A window close.
    Close(CloseWindow),
    /// A held-item drop.
    DropHeld(DropHeldItem),
}
