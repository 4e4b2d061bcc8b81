//! The collaborator seam between the session and the outside world.
//!
//! Click handling is split in two: a pure layer computes a
//! [`ClickProposal`] from immutable state, then the driver posts it
//! through [`SessionHooks::on_click`]. A cancelled proposal is never
//! applied; the driver resynchronizes every referenced slot instead.

use coffer_registry::ItemStack;

use crate::inventory::MenuTransaction;

/// Verdict of a vetoable event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Apply the transaction set.
    Allow,
    /// Roll back; nothing is applied and affected slots are resent.
    Cancel,
}

/// The cursor half of a click outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorTransaction {
    /// Carried stack before the click.
    pub original: ItemStack,
    /// Carried stack after the click.
    pub replacement: ItemStack,
}

impl CursorTransaction {
    /// A cursor transaction that changes nothing.
    #[must_use]
    pub fn unchanged(current: &ItemStack) -> Self {
        Self {
            original: current.clone(),
            replacement: current.clone(),
        }
    }
}

/// The complete proposed outcome of one click: a cursor transaction, the
/// slot transactions, and any stacks leaving the inventory as drops.
#[derive(Debug, Clone)]
pub struct ClickProposal {
    /// The window the proposal applies to.
    pub window_id: u8,
    /// The cursor change.
    pub cursor: CursorTransaction,
    /// The slot changes, in application order.
    pub slots: Vec<MenuTransaction>,
    /// Stacks that leave the inventory into the world on commit.
    pub drops: Vec<ItemStack>,
}

impl ClickProposal {
    /// Returns true if committing would change nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.slots.is_empty()
            && self.drops.is_empty()
            && self.cursor.original == self.cursor.replacement
    }
}

/// External collaborators of a click session.
///
/// Default implementations allow every event and swallow every side
/// effect, so tests implement only what they observe.
pub trait SessionHooks {
    /// A container is about to open. Cancel keeps the session closed.
    fn on_open(&mut self, container_id: u8) -> EventDisposition {
        let _ = container_id;
        EventDisposition::Allow
    }

    /// A container is about to close. Cancel keeps it open.
    fn on_close(&mut self, container_id: u8) -> EventDisposition {
        let _ = container_id;
        EventDisposition::Allow
    }

    /// A click outcome is about to be committed.
    fn on_click(&mut self, proposal: &ClickProposal) -> EventDisposition {
        let _ = proposal;
        EventDisposition::Allow
    }

    /// Resend one slot's authoritative contents.
    fn send_slot(&mut self, container_id: u8, state_id: i32, index: usize, stack: &ItemStack) {
        let _ = (container_id, state_id, index, stack);
    }

    /// Resend the authoritative cursor contents.
    fn send_cursor(&mut self, stack: &ItemStack) {
        let _ = stack;
    }

    /// Confirm a window opened.
    fn send_open(&mut self, container_id: u8) {
        let _ = container_id;
    }

    /// Confirm a window closed.
    fn send_close(&mut self, container_id: u8) {
        let _ = container_id;
    }

    /// Spawn a dropped-item entity for a stack leaving the inventory.
    fn drop_stack(&mut self, stack: ItemStack) {
        let _ = stack;
    }
}

/// A hook set that allows everything and records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl SessionHooks for NoHooks {}
