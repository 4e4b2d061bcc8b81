//! The per-player click session: a state machine from decoded messages to
//! committed or rejected transactions.
//!
//! The session owns the currently open [`Container`] (window 0 — the bare
//! player inventory — when nothing else is open), the carried cursor
//! stack, and the drag state. Handlers never mutate inventory directly:
//! the pure proposal layer (see `proposals`) computes a [`ClickProposal`],
//! and [`ClickSession::commit`] posts it as a vetoable event, applies it
//! on allow, or resynchronizes the referenced slots on cancel.

use std::sync::Arc;

use coffer_registry::ItemStack;
use log::debug;
use uuid::Uuid;

use crate::inventory::{Container, ContainerError, InventoryTree, SyncPlayerInv};

use super::click_type::{ClickType, DragHeader, DragKind, DragPhase};
use super::hooks::{ClickProposal, EventDisposition, SessionHooks};
use super::messages::{
    ClickWindow, CloseWindow, CreativeClick, DropHeldItem, InboundMessage, SLOT_CLICKED_OUTSIDE,
};

/// An armed drag gesture.
#[derive(Debug)]
pub(super) struct ActiveDrag {
    pub(super) kind: DragKind,
    /// Accumulated menu slots in insertion order; re-adding is a no-op.
    pub(super) slots: Vec<usize>,
}

/// Per-player protocol state machine.
#[derive(Debug)]
pub struct ClickSession {
    player: Uuid,
    inventory: SyncPlayerInv,
    container: Container,
    carried: ItemStack,
    creative: bool,
    drag: Option<ActiveDrag>,
}

impl ClickSession {
    /// Creates a session with no container open (window 0 bound).
    #[must_use]
    pub fn new(player: Uuid, inventory: SyncPlayerInv) -> Self {
        let mut container = Container::inventory_only(Arc::clone(&inventory));
        let _ = container.bind_viewer(player);
        Self {
            player,
            inventory,
            container,
            carried: ItemStack::empty(),
            creative: false,
            drag: None,
        }
    }

    /// The session's player id.
    #[must_use]
    pub fn player(&self) -> Uuid {
        self.player
    }

    /// Grants or revokes infinite materials (creative mode).
    pub fn set_creative(&mut self, creative: bool) {
        self.creative = creative;
    }

    /// Whether the session has infinite materials.
    #[must_use]
    pub fn is_creative(&self) -> bool {
        self.creative
    }

    /// The carried cursor stack.
    #[must_use]
    pub fn carried(&self) -> &ItemStack {
        &self.carried
    }

    /// The currently bound container.
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Mutable access to the bound container, for authoritative writes
    /// (block-entity sync, world loads) outside the click path.
    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Opens a container over the given top inventory.
    ///
    /// Fires a vetoable open event; a veto keeps the session on its
    /// current window and preserves the cursor. Binding failures are
    /// invariant violations and propagate.
    pub fn open(
        &mut self,
        container_id: u8,
        top: InventoryTree,
        hooks: &mut impl SessionHooks,
    ) -> Result<bool, ContainerError> {
        if hooks.on_open(container_id) == EventDisposition::Cancel {
            return Ok(false);
        }
        let mut container = Container::new(container_id, top, Arc::clone(&self.inventory));
        container.bind_viewer(self.player)?;
        self.container = container;
        self.drag = None;
        hooks.send_open(container_id);
        self.resync_all(hooks);
        Ok(true)
    }

    /// Closes the current window.
    ///
    /// Fires a vetoable close event; on proceeding the cursor is
    /// force-dropped, the viewer detached, and window 0 rebound.
    pub fn close(&mut self, hooks: &mut impl SessionHooks) -> bool {
        let id = self.container.id();
        if hooks.on_close(id) == EventDisposition::Cancel {
            return false;
        }
        let carried = self.carried.copy_and_clear();
        if !carried.is_empty() {
            hooks.drop_stack(carried);
        }
        self.drag = None;
        self.container.unbind_viewer();
        hooks.send_close(id);
        self.container = Container::inventory_only(Arc::clone(&self.inventory));
        let _ = self.container.bind_viewer(self.player);
        true
    }

    /// Feeds one decoded message through the state machine.
    pub fn handle(&mut self, message: InboundMessage, hooks: &mut impl SessionHooks) {
        match message {
            InboundMessage::Click(click) => self.handle_click(&click, hooks),
            InboundMessage::Creative(click) => self.handle_creative(&click, hooks),
            InboundMessage::Close(close) => self.handle_close(close, hooks),
            InboundMessage::DropHeld(message) => self.handle_drop_held(message, hooks),
        }
    }

    fn handle_close(&mut self, message: CloseWindow, hooks: &mut impl SessionHooks) {
        if message.window_id != self.container.id() {
            debug!(
                "ignoring close for stale window {} (bound: {})",
                message.window_id,
                self.container.id()
            );
            return;
        }
        let _ = self.close(hooks);
    }

    fn handle_drop_held(&mut self, message: DropHeldItem, hooks: &mut impl SessionHooks) {
        let taken = self.inventory.lock().remove_from_selected(message.full_stack);
        if !taken.is_empty() {
            hooks.drop_stack(taken);
        }
    }

    fn is_valid_click_slot(&self, slot: i16) -> bool {
        slot == SLOT_CLICKED_OUTSIDE
            || usize::try_from(slot).is_ok_and(|index| index < self.container.menu_slot_count())
    }

    fn handle_click(&mut self, click: &ClickWindow, hooks: &mut impl SessionHooks) {
        if click.window_id != self.container.id() {
            debug!(
                "ignoring click for stale window {} (bound: {})",
                click.window_id,
                self.container.id()
            );
            return;
        }
        if !self.is_valid_click_slot(click.slot) {
            debug!("click on unknown slot {}; resyncing", click.slot);
            self.resync_all(hooks);
            return;
        }

        match click.click_type {
            ClickType::QuickCraft => self.handle_quick_craft(click, hooks),
            // Any other click mid-drag silently resets the gesture.
            _ if self.drag.is_some() => {
                self.drag = None;
            }
            ClickType::Pickup => {
                let proposal = self.propose_pickup(click.slot, click.button);
                self.commit_proposal(proposal, hooks);
            }
            ClickType::QuickMove => {
                if let Ok(index) = usize::try_from(click.slot) {
                    let proposal = self.propose_quick_move(index);
                    self.commit_proposal(proposal, hooks);
                }
            }
            ClickType::Swap => {
                if let Ok(index) = usize::try_from(click.slot) {
                    let proposal = self.propose_swap(index, click.button);
                    self.commit_proposal(proposal, hooks);
                }
            }
            ClickType::Clone => {
                if let Ok(index) = usize::try_from(click.slot) {
                    let proposal = self.propose_clone(index);
                    self.commit_proposal(proposal, hooks);
                }
            }
            ClickType::Throw => {
                if let Ok(index) = usize::try_from(click.slot) {
                    let proposal = self.propose_throw(index, click.button == 1);
                    self.commit_proposal(proposal, hooks);
                }
            }
            ClickType::PickupAll => {
                let proposal = self.propose_pickup_all(click.button);
                self.commit_proposal(proposal, hooks);
            }
        }

        // The client predicted a cursor; correct it if it guessed wrong.
        if click.click_type != ClickType::QuickCraft && click.carried_snapshot != self.carried {
            hooks.send_cursor(&self.carried);
        }
    }

    fn handle_quick_craft(&mut self, click: &ClickWindow, hooks: &mut impl SessionHooks) {
        let Some(header) = DragHeader::parse(click.button) else {
            self.drag = None;
            return;
        };

        match header.phase {
            DragPhase::Start => {
                self.drag = None;
                if self.carried.is_empty() || !header.kind.is_allowed(self.creative) {
                    return;
                }
                self.drag = Some(ActiveDrag {
                    kind: header.kind,
                    slots: Vec::new(),
                });
            }
            DragPhase::Add => {
                if self.drag.is_none() {
                    return;
                }
                let Ok(index) = usize::try_from(click.slot) else {
                    return;
                };
                if index >= self.container.menu_slot_count() || !self.is_drag_eligible(index) {
                    return;
                }
                if let Some(drag) = &mut self.drag
                    && !drag.slots.contains(&index)
                {
                    drag.slots.push(index);
                }
            }
            DragPhase::End => {
                let Some(drag) = self.drag.take() else {
                    return;
                };
                // A release with the wrong button resets silently.
                if drag.kind != header.kind {
                    return;
                }
                if drag.slots.is_empty() || self.carried.is_empty() {
                    return;
                }
                if drag.slots.len() == 1 {
                    // A one-slot drag degrades to a plain click.
                    let button = if drag.kind == DragKind::SingleItem { 1 } else { 0 };
                    let proposal = self.propose_pickup(drag.slots[0] as i16, button);
                    self.commit_proposal(proposal, hooks);
                    return;
                }
                let proposal = self.propose_drag_release(drag.kind, &drag.slots);
                self.commit_proposal(proposal, hooks);
            }
        }
    }

    fn is_drag_eligible(&self, index: usize) -> bool {
        let carried = &self.carried;
        let Some(current) = self.container.stack_at(index) else {
            return false;
        };
        let accepted = self
            .container
            .with_slot(index, |slot| slot.accepts(carried))
            .unwrap_or(false);
        if !accepted {
            return false;
        }
        current.is_empty()
            || (ItemStack::is_same_item_same_components(&current, carried)
                && current.count() <= carried.max_stack_size())
    }

    fn handle_creative(&mut self, click: &CreativeClick, hooks: &mut impl SessionHooks) {
        if !self.creative {
            debug!("ignoring creative click from non-creative session");
            return;
        }
        if click.slot < 0 {
            if click.stack.is_empty() {
                return;
            }
            let proposal = self.propose_creative_drop(click.stack.clone());
            self.commit(proposal, hooks);
            return;
        }

        let index = click.slot as usize;
        if index >= self.container.menu_slot_count() {
            debug!("creative click on unknown slot {index}; resyncing");
            self.resync_all(hooks);
            return;
        }
        let proposal = self.propose_creative_set(index, &click.stack);
        self.commit_proposal(proposal, hooks);
    }

    pub(super) fn commit_proposal(
        &mut self,
        proposal: Option<ClickProposal>,
        hooks: &mut impl SessionHooks,
    ) {
        if let Some(proposal) = proposal
            && !proposal.is_noop()
        {
            self.commit(proposal, hooks);
        }
    }

    /// Posts the proposal as a vetoable event and applies or rolls back.
    ///
    /// On cancel, nothing is applied and every slot the proposal named is
    /// resent with authoritative contents, along with the cursor.
    fn commit(&mut self, proposal: ClickProposal, hooks: &mut impl SessionHooks) {
        match hooks.on_click(&proposal) {
            EventDisposition::Cancel => {
                let state_id = self.container.increment_state_id();
                for transaction in &proposal.slots {
                    if let Some(stack) = self.container.stack_at(transaction.index) {
                        hooks.send_slot(self.container.id(), state_id, transaction.index, &stack);
                    }
                }
                hooks.send_cursor(&self.carried);
            }
            EventDisposition::Allow => {
                self.container.apply(&proposal.slots);
                self.carried = proposal.cursor.replacement.clone();
                for stack in proposal.drops {
                    hooks.drop_stack(stack);
                }
            }
        }
    }

    /// Resends every menu slot and the cursor.
    pub fn resync_all(&mut self, hooks: &mut impl SessionHooks) {
        let state_id = self.container.increment_state_id();
        for index in 0..self.container.menu_slot_count() {
            if let Some(stack) = self.container.stack_at(index) {
                hooks.send_slot(self.container.id(), state_id, index, &stack);
            }
        }
        hooks.send_cursor(&self.carried);
    }
}
