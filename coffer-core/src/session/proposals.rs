//! Pure proposal computation for click outcomes.
//!
//! Nothing in this module mutates state: every function reads the session
//! and its container, and produces the [`ClickProposal`] the driver would
//! commit. Keeping the arithmetic here testable without an event bus is
//! the point — the driver in `click_session` owns posting and rollback.

use coffer_registry::ItemStack;

use crate::inventory::{HOTBAR_SIZE, ItemMatcher, MAIN_SIZE, MenuTransaction};

use super::click_session::ClickSession;
use super::click_type::{DragKind, MouseButton};
use super::hooks::{ClickProposal, CursorTransaction};
use super::messages::SLOT_CLICKED_OUTSIDE;

impl ClickSession {
    fn proposal(
        &self,
        cursor: CursorTransaction,
        slots: Vec<MenuTransaction>,
        drops: Vec<ItemStack>,
    ) -> ClickProposal {
        ClickProposal {
            window_id: self.container().id(),
            cursor,
            slots,
            drops,
        }
    }

    /// A normal left/right click: place, take, merge, or swap.
    ///
    /// Exactly one of offer, set, or poll fires, chosen in that priority
    /// order; a click outside the window drops from the cursor instead.
    pub(super) fn propose_pickup(&self, slot: i16, button: i8) -> Option<ClickProposal> {
        let action = MouseButton::from_button(button);
        let carried = self.carried().clone();

        if slot == SLOT_CLICKED_OUTSIDE {
            if carried.is_empty() {
                return None;
            }
            let mut rest = carried.clone();
            let dropped = match action {
                MouseButton::Left => rest.copy_and_clear(),
                MouseButton::Right => rest.split(1),
            };
            return Some(self.proposal(
                CursorTransaction {
                    original: carried,
                    replacement: rest,
                },
                Vec::new(),
                vec![dropped],
            ));
        }

        let index = usize::try_from(slot).ok()?;
        let container = self.container();
        let current = container.stack_at(index)?;
        let (accepts_carried, may_pickup, max_for_carried) = container.with_slot(index, |s| {
            (
                s.accepts(&carried),
                s.may_pickup(),
                s.max_stack_size_for(&carried),
            )
        })?;

        if current.is_empty() {
            // Empty slot: place from the cursor.
            if carried.is_empty() || !accepts_carried {
                return None;
            }
            let amount = match action {
                MouseButton::Left => carried.count(),
                MouseButton::Right => 1,
            };
            let input = carried.copy_with_count(amount);
            let offer = container.with_slot(index, |s| s.peek_offer(&input))?;
            if offer.consumed <= 0 {
                return None;
            }
            let mut rest = carried.clone();
            rest.shrink(offer.consumed);
            return Some(self.proposal(
                CursorTransaction {
                    original: carried,
                    replacement: rest,
                },
                vec![MenuTransaction {
                    index,
                    original: current,
                    replacement: offer.replacement,
                }],
                Vec::new(),
            ));
        }

        if !may_pickup {
            return None;
        }

        if carried.is_empty() {
            // Take into the cursor: all, or the larger half.
            let amount = match action {
                MouseButton::Left => current.count(),
                MouseButton::Right => (current.count() + 1) / 2,
            };
            let poll = container.with_slot(index, |s| s.peek_poll(amount, &ItemMatcher::Any))?;
            if poll.taken.is_empty() {
                return None;
            }
            return Some(self.proposal(
                CursorTransaction {
                    original: carried,
                    replacement: poll.taken,
                },
                vec![MenuTransaction {
                    index,
                    original: current,
                    replacement: poll.replacement,
                }],
                Vec::new(),
            ));
        }

        if accepts_carried {
            if ItemStack::is_same_item_same_components(&current, &carried) {
                // Merge into the existing pile.
                let amount = match action {
                    MouseButton::Left => carried.count(),
                    MouseButton::Right => 1,
                };
                let input = carried.copy_with_count(amount);
                let offer = container.with_slot(index, |s| s.peek_offer(&input))?;
                if offer.consumed <= 0 {
                    return None;
                }
                let mut rest = carried.clone();
                rest.shrink(offer.consumed);
                return Some(self.proposal(
                    CursorTransaction {
                        original: carried,
                        replacement: rest,
                    },
                    vec![MenuTransaction {
                        index,
                        original: current,
                        replacement: offer.replacement,
                    }],
                    Vec::new(),
                ));
            }
            // Dissimilar: swap, if the carried stack fits the slot.
            if carried.count() <= max_for_carried {
                return Some(self.proposal(
                    CursorTransaction {
                        original: carried.clone(),
                        replacement: current.clone(),
                    },
                    vec![MenuTransaction {
                        index,
                        original: current,
                        replacement: carried,
                    }],
                    Vec::new(),
                ));
            }
            return None;
        }

        // Can't place here, but the pile matches: top the cursor up.
        if ItemStack::is_same_item_same_components(&current, &carried) {
            let space = carried.max_stack_size() - carried.count();
            if space <= 0 {
                return None;
            }
            let matcher = ItemMatcher::SimilarTo(carried.clone());
            let poll = container
                .with_slot(index, |s| s.peek_poll(space.min(current.count()), &matcher))?;
            if poll.taken.is_empty() {
                return None;
            }
            let mut grown = carried.clone();
            grown.grow(poll.taken.count());
            return Some(self.proposal(
                CursorTransaction {
                    original: carried,
                    replacement: grown,
                },
                vec![MenuTransaction {
                    index,
                    original: current,
                    replacement: poll.replacement,
                }],
                Vec::new(),
            ));
        }
        None
    }

    /// Shift-click: iteratively drain the source slot into the opposite
    /// side, merging into similar piles before filling empty slots.
    pub(super) fn propose_quick_move(&self, index: usize) -> Option<ClickProposal> {
        let container = self.container();
        let source = container.stack_at(index)?;
        if source.is_empty() {
            return None;
        }
        let (may_pickup, reverse_pref) = container.with_slot(index, |s| {
            (s.may_pickup(), s.prefers_reverse_quick_move())
        })?;
        if !may_pickup {
            return None;
        }

        let top_count = container.top_slot_count();
        let menu_count = container.menu_slot_count();
        let main_count = MAIN_SIZE;

        // Destination: the other side of the container. With no top
        // inventory, shift-click moves between main storage and hotbar.
        let (mut destinations, default_reverse): (Vec<usize>, bool) = if top_count == 0 {
            if index < main_count {
                ((main_count..menu_count).collect(), false)
            } else {
                ((0..main_count).collect(), false)
            }
        } else if index < top_count {
            ((top_count..menu_count).collect(), true)
        } else {
            ((0..top_count).collect(), false)
        };
        if default_reverse != reverse_pref {
            destinations.reverse();
        }

        let mut remaining = source.clone();
        let mut transactions: Vec<MenuTransaction> = Vec::new();

        // First pass: merge with existing similar stacks.
        if remaining.is_stackable() {
            for &dest in &destinations {
                if remaining.is_empty() {
                    break;
                }
                let Some(target) = container.stack_at(dest) else {
                    continue;
                };
                if target.is_empty()
                    || !ItemStack::is_same_item_same_components(&target, &remaining)
                {
                    continue;
                }
                let Some(max_for) =
                    container.with_slot(dest, |s| s.max_stack_size_for(&remaining))
                else {
                    continue;
                };
                let space = max_for - target.count();
                let moved = remaining.count().min(space);
                if moved <= 0 {
                    continue;
                }
                transactions.push(MenuTransaction {
                    index: dest,
                    original: target.clone(),
                    replacement: target.copy_with_count(target.count() + moved),
                });
                remaining.shrink(moved);
            }
        }

        // Second pass: place into empty slots.
        if !remaining.is_empty() {
            for &dest in &destinations {
                if remaining.is_empty() {
                    break;
                }
                let Some(target) = container.stack_at(dest) else {
                    continue;
                };
                if !target.is_empty() {
                    continue;
                }
                let Some((accepts, max_for)) = container
                    .with_slot(dest, |s| (s.accepts(&remaining), s.max_stack_size_for(&remaining)))
                else {
                    continue;
                };
                if !accepts {
                    continue;
                }
                let placed = remaining.count().min(max_for);
                if placed <= 0 {
                    continue;
                }
                transactions.push(MenuTransaction {
                    index: dest,
                    original: target,
                    replacement: remaining.copy_with_count(placed),
                });
                remaining.shrink(placed);
            }
        }

        if transactions.is_empty() {
            return None;
        }
        // Whatever did not fit stays in the source slot.
        transactions.push(MenuTransaction {
            index,
            original: source,
            replacement: remaining,
        });
        Some(self.proposal(
            CursorTransaction::unchanged(self.carried()),
            transactions,
            Vec::new(),
        ))
    }

    /// Number-key swap: wholesale exchange with a hotbar slot, aborted
    /// unless each stack is acceptable on the other side.
    pub(super) fn propose_swap(&self, index: usize, button: i8) -> Option<ClickProposal> {
        let container = self.container();
        let hotbar_slot = usize::try_from(button).ok()?;
        if hotbar_slot >= HOTBAR_SIZE {
            return None;
        }
        let hotbar_index = container.hotbar_menu_index(hotbar_slot);
        if hotbar_index == index {
            return None;
        }

        let clicked = container.stack_at(index)?;
        let held = container.stack_at(hotbar_index)?;
        if clicked.is_empty() && held.is_empty() {
            return None;
        }

        let clicked_side_ok = container.with_slot(index, |s| {
            (clicked.is_empty() || s.may_pickup())
                && (held.is_empty()
                    || (s.accepts(&held) && held.count() <= s.max_stack_size_for(&held)))
        })?;
        let hotbar_side_ok = container.with_slot(hotbar_index, |s| {
            (held.is_empty() || s.may_pickup())
                && (clicked.is_empty()
                    || (s.accepts(&clicked) && clicked.count() <= s.max_stack_size_for(&clicked)))
        })?;
        if !clicked_side_ok || !hotbar_side_ok {
            return None;
        }

        Some(self.proposal(
            CursorTransaction::unchanged(self.carried()),
            vec![
                MenuTransaction {
                    index,
                    original: clicked.clone(),
                    replacement: held.clone(),
                },
                MenuTransaction {
                    index: hotbar_index,
                    original: held,
                    replacement: clicked,
                },
            ],
            Vec::new(),
        ))
    }

    /// Middle-click clone: a full stack onto the empty cursor.
    pub(super) fn propose_clone(&self, index: usize) -> Option<ClickProposal> {
        if !self.is_creative() || !self.carried().is_empty() {
            return None;
        }
        let current = self.container().stack_at(index)?;
        if current.is_empty() {
            return None;
        }
        Some(self.proposal(
            CursorTransaction {
                original: ItemStack::empty(),
                replacement: current.copy_with_count(current.max_stack_size()),
            },
            Vec::new(),
            Vec::new(),
        ))
    }

    /// Q-key throw: drop one or all items from the clicked slot.
    pub(super) fn propose_throw(&self, index: usize, throw_all: bool) -> Option<ClickProposal> {
        if !self.carried().is_empty() {
            return None;
        }
        let container = self.container();
        let current = container.stack_at(index)?;
        if current.is_empty() {
            return None;
        }
        let amount = if throw_all { current.count() } else { 1 };
        let poll = container.with_slot(index, |s| s.peek_poll(amount, &ItemMatcher::Any))?;
        if poll.taken.is_empty() {
            return None;
        }
        Some(self.proposal(
            CursorTransaction::unchanged(self.carried()),
            vec![MenuTransaction {
                index,
                original: current,
                replacement: poll.replacement,
            }],
            vec![poll.taken],
        ))
    }

    /// Double-click: harvest matching items onto the cursor, draining
    /// partially-filled stacks before full ones.
    pub(super) fn propose_pickup_all(&self, button: i8) -> Option<ClickProposal> {
        let carried = self.carried().clone();
        if carried.is_empty() {
            return None;
        }
        let max = carried.max_stack_size();
        if carried.count() >= max {
            return None;
        }

        let container = self.container();
        let count = container.menu_slot_count();
        let order: Vec<usize> = if button == 0 {
            (0..count).collect()
        } else {
            (0..count).rev().collect()
        };

        let mut cursor_count = carried.count();
        let mut transactions: Vec<MenuTransaction> = Vec::new();

        for pass in 0..2 {
            for &index in &order {
                if cursor_count >= max {
                    break;
                }
                if transactions.iter().any(|tx| tx.index == index) {
                    continue;
                }
                let Some(stack) = container.stack_at(index) else {
                    continue;
                };
                if stack.is_empty()
                    || !ItemStack::is_same_item_same_components(&carried, &stack)
                {
                    continue;
                }
                if !container
                    .with_slot(index, |s| s.may_pickup())
                    .unwrap_or(false)
                {
                    continue;
                }
                let is_full = stack.count() >= stack.max_stack_size();
                if (pass == 0 && is_full) || (pass == 1 && !is_full) {
                    continue;
                }
                let space = max - cursor_count;
                let taken = stack.count().min(space);
                if taken <= 0 {
                    continue;
                }
                transactions.push(MenuTransaction {
                    index,
                    original: stack.clone(),
                    replacement: stack.copy_with_count(stack.count() - taken),
                });
                cursor_count += taken;
            }
        }

        if transactions.is_empty() {
            return None;
        }
        Some(self.proposal(
            CursorTransaction {
                original: carried.clone(),
                replacement: carried.copy_with_count(cursor_count),
            },
            transactions,
            Vec::new(),
        ))
    }

    /// Drag release: distribute the carried stack over the accumulated
    /// slots — an even split for a left drag, one item per slot for a
    /// right drag, a full stack per slot for a creative clone drag.
    pub(super) fn propose_drag_release(
        &self,
        kind: DragKind,
        slots: &[usize],
    ) -> Option<ClickProposal> {
        let carried = self.carried().clone();
        if carried.is_empty() || slots.is_empty() {
            return None;
        }
        let container = self.container();
        let slot_count = i32::try_from(slots.len()).ok()?;
        let per_slot = match kind {
            DragKind::EvenSplit => carried.count() / slot_count,
            DragKind::SingleItem => 1,
            DragKind::CloneStack => carried.max_stack_size(),
        };

        let mut remaining = carried.count();
        let mut transactions: Vec<MenuTransaction> = Vec::new();

        for &index in slots {
            if kind != DragKind::CloneStack && remaining <= 0 {
                break;
            }
            let Some(current) = container.stack_at(index) else {
                continue;
            };
            let Some((accepts, max_for)) = container
                .with_slot(index, |s| (s.accepts(&carried), s.max_stack_size_for(&carried)))
            else {
                continue;
            };
            if !accepts {
                continue;
            }
            if !current.is_empty()
                && !ItemStack::is_same_item_same_components(&current, &carried)
            {
                continue;
            }
            let space = max_for - current.count();
            let budget = if kind == DragKind::CloneStack {
                per_slot
            } else {
                per_slot.min(remaining)
            };
            let added = budget.min(space);
            if added <= 0 {
                continue;
            }
            let replacement = if current.is_empty() {
                carried.copy_with_count(added)
            } else {
                current.copy_with_count(current.count() + added)
            };
            transactions.push(MenuTransaction {
                index,
                original: current,
                replacement,
            });
            if kind != DragKind::CloneStack {
                remaining -= added;
            }
        }

        if transactions.is_empty() {
            return None;
        }
        let replacement = if kind == DragKind::CloneStack {
            carried.clone()
        } else {
            carried.copy_with_count(remaining)
        };
        Some(self.proposal(
            CursorTransaction {
                original: carried,
                replacement,
            },
            transactions,
            Vec::new(),
        ))
    }

    /// Creative overwrite: force-set past the filter, clamped to capacity.
    pub(super) fn propose_creative_set(
        &self,
        index: usize,
        stack: &ItemStack,
    ) -> Option<ClickProposal> {
        let container = self.container();
        let current = container.stack_at(index)?;
        let set = container.with_slot(index, |s| s.peek_set(stack, true))?;
        if !set.rejected.is_empty() {
            log::debug!(
                "creative set clamped {} items at slot {index}",
                set.rejected.count()
            );
        }
        Some(self.proposal(
            CursorTransaction::unchanged(self.carried()),
            vec![MenuTransaction {
                index,
                original: current,
                replacement: set.replacement,
            }],
            Vec::new(),
        ))
    }

    /// Creative drop: the conjured stack goes straight to the world.
    pub(super) fn propose_creative_drop(&self, stack: ItemStack) -> ClickProposal {
        self.proposal(
            CursorTransaction::unchanged(self.carried()),
            Vec::new(),
            vec![stack],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::builder::{InventoryBuilder, standard};
    use crate::inventory::{InventoryTree, PlayerInventory};
    use crate::session::click_type::ClickType;
    use crate::session::hooks::NoHooks;
    use crate::session::messages::{ClickWindow, InboundMessage};
    use coffer_registry::vanilla_items;
    use std::sync::Arc;
    use uuid::Uuid;

    fn stone(count: i32) -> ItemStack {
        ItemStack::new(&vanilla_items::STONE, count)
    }

    fn arrows(count: i32) -> ItemStack {
        ItemStack::new(&vanilla_items::ARROW, count)
    }

    fn open_session(top: InventoryTree) -> ClickSession {
        let inventory = PlayerInventory::new().into_shared();
        let mut session = ClickSession::new(Uuid::new_v4(), inventory);
        assert!(session.open(1, top, &mut NoHooks).unwrap());
        session
    }

    fn chest_session(rows: u32) -> ClickSession {
        open_session(standard::chest(rows).instantiate().unwrap())
    }

    fn send_click(session: &mut ClickSession, slot: i16, button: i8, click_type: ClickType) {
        session.handle(
            InboundMessage::Click(ClickWindow {
                window_id: 1,
                slot,
                button,
                click_type,
                carried_snapshot: session.carried().clone(),
            }),
            &mut NoHooks,
        );
    }

    #[test]
    fn empty_cursor_left_click_takes_whole_stack() {
        let mut session = chest_session(1);
        session.container_mut().set_stack_at(3, arrows(10));

        send_click(&mut session, 3, 0, ClickType::Pickup);

        assert_eq!(session.carried().count(), 10);
        assert!(session.container().stack_at(3).unwrap().is_empty());
    }

    #[test]
    fn empty_cursor_right_click_takes_larger_half() {
        let mut session = chest_session(1);
        session.container_mut().set_stack_at(3, stone(9));

        send_click(&mut session, 3, 1, ClickType::Pickup);

        assert_eq!(session.carried().count(), 5);
        assert_eq!(session.container().stack_at(3).unwrap().count(), 4);
    }

    #[test]
    fn right_click_places_exactly_one() {
        let mut session = chest_session(1);
        session.container_mut().set_stack_at(0, stone(8));
        send_click(&mut session, 0, 0, ClickType::Pickup);

        send_click(&mut session, 5, 1, ClickType::Pickup);
        assert_eq!(session.container().stack_at(5).unwrap().count(), 1);
        assert_eq!(session.carried().count(), 7);
    }

    #[test]
    fn click_merges_cursor_into_similar_pile() {
        let mut session = chest_session(1);
        session.container_mut().set_stack_at(0, stone(30));
        session.container_mut().set_stack_at(1, stone(40));
        send_click(&mut session, 0, 0, ClickType::Pickup);

        // 40 + 30 caps at 64, leaving 6 on the cursor.
        send_click(&mut session, 1, 0, ClickType::Pickup);
        assert_eq!(session.container().stack_at(1).unwrap().count(), 64);
        assert_eq!(session.carried().count(), 6);
    }

    #[test]
    fn click_swaps_dissimilar_stacks() {
        let mut session = chest_session(1);
        session.container_mut().set_stack_at(0, stone(5));
        session.container_mut().set_stack_at(1, arrows(7));
        send_click(&mut session, 0, 0, ClickType::Pickup);

        send_click(&mut session, 1, 0, ClickType::Pickup);
        assert_eq!(session.carried().count(), 7);
        assert_eq!(session.container().stack_at(1).unwrap().count(), 5);
        assert!(ItemStack::is_same_item_same_components(
            &session.container().stack_at(1).unwrap(),
            &stone(1)
        ));
    }

    #[test]
    fn filtered_slot_rejects_placement() {
        let top = InventoryBuilder::ordered()
            .child(
                InventoryBuilder::slot()
                    .filter(Arc::new(|stack: &ItemStack| {
                        stack
                            .item()
                            .is_some_and(|ty| std::ptr::eq(ty, &vanilla_items::ARROW))
                    }))
                    .archetype(),
            )
            .build()
            .unwrap();
        let mut session = open_session(top);
        let hotbar = session.container().hotbar_menu_index(0);
        session.container_mut().set_stack_at(hotbar, stone(4));
        send_click(&mut session, hotbar as i16, 0, ClickType::Pickup);

        send_click(&mut session, 0, 0, ClickType::Pickup);
        assert!(session.container().stack_at(0).unwrap().is_empty());
        assert_eq!(session.carried().count(), 4);
    }

    #[test]
    fn shift_click_fills_partial_then_empty() {
        let mut session = chest_session(1);
        // Source: a full 64-stack in the chest.
        session.container_mut().set_stack_at(2, stone(64));
        // Bottom: everything blocked except one partial pile and one
        // empty slot.
        let inventory = Arc::clone(session.container().bottom());
        {
            let mut inv = inventory.lock();
            for slot in 0..36 {
                inv.set_stack(slot, ItemStack::new(&vanilla_items::DIAMOND_SWORD, 1));
            }
            inv.set_stack(20, stone(20));
            inv.set_stack(30, ItemStack::empty());
        }

        send_click(&mut session, 2, 0, ClickType::QuickMove);

        let inv = inventory.lock();
        assert_eq!(inv.stack(20).count(), 64);
        assert_eq!(inv.stack(30).count(), 20);
        drop(inv);
        assert!(session.container().stack_at(2).unwrap().is_empty());
    }

    #[test]
    fn shift_click_leaves_overflow_in_source() {
        let mut session = chest_session(1);
        session.container_mut().set_stack_at(0, stone(64));
        let inventory = Arc::clone(session.container().bottom());
        {
            let mut inv = inventory.lock();
            for slot in 0..36 {
                inv.set_stack(slot, ItemStack::new(&vanilla_items::DIAMOND_SWORD, 1));
            }
            // Only 4 items of room anywhere.
            inv.set_stack(10, stone(60));
        }

        send_click(&mut session, 0, 0, ClickType::QuickMove);

        assert_eq!(inventory.lock().stack(10).count(), 64);
        assert_eq!(session.container().stack_at(0).unwrap().count(), 60);
    }

    #[test]
    fn shift_click_from_inventory_targets_the_chest() {
        let mut session = chest_session(1);
        let source = session.container().hotbar_menu_index(4);
        session
            .container_mut()
            .set_stack_at(source, arrows(12));

        send_click(&mut session, source as i16, 0, ClickType::QuickMove);

        assert_eq!(session.container().stack_at(0).unwrap().count(), 12);
        assert!(session.container().stack_at(source).unwrap().is_empty());
    }

    #[test]
    fn double_click_harvests_partials_before_full_stacks() {
        let mut session = chest_session(1);
        session.container_mut().set_stack_at(0, stone(64));
        session.container_mut().set_stack_at(1, stone(30));
        session.container_mut().set_stack_at(2, stone(20));
        // Seed the cursor with 10.
        session.container_mut().set_stack_at(3, stone(10));
        send_click(&mut session, 3, 0, ClickType::Pickup);

        send_click(&mut session, 3, 0, ClickType::PickupAll);

        // 10 + 30 + 20 from partials, then 4 more from the full stack.
        assert_eq!(session.carried().count(), 64);
        assert!(session.container().stack_at(1).unwrap().is_empty());
        assert!(session.container().stack_at(2).unwrap().is_empty());
        assert_eq!(session.container().stack_at(0).unwrap().count(), 60);
    }

    #[test]
    fn number_key_swaps_clicked_slot_with_hotbar() {
        let mut session = chest_session(1);
        session.container_mut().set_stack_at(4, arrows(5));
        let hotbar_two = session.container().hotbar_menu_index(2);
        session
            .container_mut()
            .set_stack_at(hotbar_two, stone(3));

        send_click(&mut session, 4, 2, ClickType::Swap);

        assert_eq!(session.container().stack_at(4).unwrap().count(), 3);
        assert_eq!(session.container().stack_at(hotbar_two).unwrap().count(), 5);
    }

    #[test]
    fn number_key_swap_aborts_when_filter_rejects() {
        let top = InventoryBuilder::ordered()
            .child(
                InventoryBuilder::slot()
                    .filter(Arc::new(|stack: &ItemStack| {
                        stack
                            .item()
                            .is_some_and(|ty| std::ptr::eq(ty, &vanilla_items::ARROW))
                    }))
                    .archetype(),
            )
            .build()
            .unwrap();
        let mut session = open_session(top);
        session.container_mut().set_stack_at(0, arrows(5));
        let hotbar = session.container().hotbar_menu_index(0);
        session.container_mut().set_stack_at(hotbar, stone(3));

        send_click(&mut session, 0, 0, ClickType::Swap);

        // Stone is not acceptable in the arrow slot: nothing moved.
        assert_eq!(session.container().stack_at(0).unwrap().count(), 5);
        assert_eq!(session.container().stack_at(hotbar).unwrap().count(), 3);
    }

    #[test]
    fn creative_set_bypasses_the_filter() {
        let top = InventoryBuilder::ordered()
            .child(
                InventoryBuilder::slot()
                    .filter(Arc::new(|stack: &ItemStack| {
                        stack
                            .item()
                            .is_some_and(|ty| std::ptr::eq(ty, &vanilla_items::ARROW))
                    }))
                    .archetype(),
            )
            .build()
            .unwrap();
        let mut session = open_session(top);
        session.set_creative(true);

        session.handle(
            InboundMessage::Creative(crate::session::messages::CreativeClick {
                slot: 0,
                stack: stone(64),
            }),
            &mut NoHooks,
        );

        assert_eq!(session.container().stack_at(0).unwrap().count(), 64);
    }

    #[test]
    fn clone_click_fills_the_cursor_in_creative() {
        let mut session = chest_session(1);
        session.set_creative(true);
        session.container_mut().set_stack_at(0, stone(3));

        send_click(&mut session, 0, 2, ClickType::Clone);

        assert_eq!(session.carried().count(), 64);
        assert_eq!(session.container().stack_at(0).unwrap().count(), 3);
    }

    #[test]
    fn throw_drops_one_then_all() {
        let mut session = chest_session(1);
        session.container_mut().set_stack_at(0, stone(10));

        send_click(&mut session, 0, 0, ClickType::Throw);
        assert_eq!(session.container().stack_at(0).unwrap().count(), 9);

        send_click(&mut session, 0, 1, ClickType::Throw);
        assert!(session.container().stack_at(0).unwrap().is_empty());
    }
}
