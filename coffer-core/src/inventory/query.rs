//! Composite fan-out: tree-level offer, poll, and aggregate queries.
//!
//! An offer first routes to the existing pile of the same item (the
//! similarity fast path), then fans out linearly over the remaining slots
//! in traversal order. A processed set keeps a slot that is reachable
//! through more than one path from being drained twice.

use coffer_registry::ItemStack;
use rustc_hash::FxHashSet;

use super::transaction::{
    ItemMatcher, PeekedOffer, PeekedPoll, PeekedSet, SlotTransaction, TransactionList,
};
use super::tree::{InventoryTree, NodeId};

impl InventoryTree {
    /// Computes, without mutating, how the tree would absorb `input`.
    #[must_use]
    pub fn peek_offer(&self, input: &ItemStack) -> PeekedOffer {
        if input.is_empty() {
            return PeekedOffer::rejected(input.clone());
        }

        let order = self.traversal_slots();
        let mut transactions = TransactionList::new();
        let mut processed: FxHashSet<NodeId> = FxHashSet::default();
        let mut remainder = input.clone();

        // Fast path: top up the first existing pile of the same item that
        // still has room.
        for id in &order {
            let Some(slot) = self.slot(*id) else { continue };
            if slot.is_empty()
                || !ItemStack::is_same_item_same_components(slot.stack(), &remainder)
            {
                continue;
            }
            let offer = slot.peek_offer(&remainder);
            if offer.consumed > 0 {
                transactions.push(SlotTransaction {
                    slot: *id,
                    original: slot.stack().clone(),
                    replacement: offer.replacement,
                });
                remainder.shrink(offer.consumed);
                processed.insert(*id);
                break;
            }
        }

        // Linear fan-out in traversal order, each slot draining what it can.
        if !remainder.is_empty() {
            for id in &order {
                if remainder.is_empty() {
                    break;
                }
                if processed.contains(id) {
                    continue;
                }
                let Some(slot) = self.slot(*id) else { continue };
                let offer = slot.peek_offer(&remainder);
                if offer.consumed > 0 {
                    transactions.push(SlotTransaction {
                        slot: *id,
                        original: slot.stack().clone(),
                        replacement: offer.replacement,
                    });
                    remainder.shrink(offer.consumed);
                    processed.insert(*id);
                }
            }
        }

        PeekedOffer {
            transactions,
            remainder,
        }
    }

    /// Offers `input` to the tree, draining the caller's stack.
    ///
    /// Returns the applied result; the final tree state is exactly what
    /// [`Self::peek_offer`] predicted.
    pub fn offer(&mut self, input: &mut ItemStack) -> PeekedOffer {
        let peeked = self.peek_offer(input);
        self.apply(&peeked.transactions);
        *input = peeked.remainder.clone();
        peeked
    }

    /// Computes, without mutating, a removal of up to `limit` items.
    ///
    /// The first matching slot seeds the result; the scan then continues
    /// with the matcher upgraded to similarity with the seed, topping the
    /// result up until `limit` or exhaustion.
    #[must_use]
    pub fn peek_poll(&self, limit: i32, matcher: &ItemMatcher) -> PeekedPoll {
        if limit <= 0 {
            return PeekedPoll::nothing();
        }

        let mut transactions = TransactionList::new();
        let mut polled = ItemStack::empty();

        for id in self.traversal_slots() {
            if polled.count() >= limit {
                break;
            }
            let Some(slot) = self.slot(id) else { continue };

            let effective = if polled.is_empty() {
                matcher.clone()
            } else {
                ItemMatcher::SimilarTo(polled.clone())
            };
            let poll = slot.peek_poll(limit - polled.count(), &effective);
            if poll.taken.is_empty() {
                continue;
            }

            transactions.push(SlotTransaction {
                slot: id,
                original: slot.stack().clone(),
                replacement: poll.replacement,
            });
            if polled.is_empty() {
                polled = poll.taken;
            } else {
                polled.grow(poll.taken.count());
            }
        }

        PeekedPoll {
            transactions,
            polled,
        }
    }

    /// Removes up to `limit` matching items from the tree.
    pub fn poll(&mut self, limit: i32, matcher: &ItemMatcher) -> PeekedPoll {
        let peeked = self.peek_poll(limit, matcher);
        self.apply(&peeked.transactions);
        peeked
    }

    /// Computes, without mutating, an offer into one specific slot.
    #[must_use]
    pub fn peek_offer_at(&self, id: NodeId, input: &ItemStack) -> Option<PeekedOffer> {
        let slot = self.slot(id)?;
        let offer = slot.peek_offer(input);
        if offer.consumed <= 0 {
            return Some(PeekedOffer::rejected(input.clone()));
        }
        let mut remainder = input.clone();
        remainder.shrink(offer.consumed);
        let mut transactions = TransactionList::new();
        transactions.push(SlotTransaction {
            slot: id,
            original: slot.stack().clone(),
            replacement: offer.replacement,
        });
        Some(PeekedOffer {
            transactions,
            remainder,
        })
    }

    /// Offers into one specific slot, draining the caller's stack.
    pub fn offer_at(&mut self, id: NodeId, input: &mut ItemStack) -> Option<PeekedOffer> {
        let peeked = self.peek_offer_at(id, input)?;
        self.apply(&peeked.transactions);
        *input = peeked.remainder.clone();
        Some(peeked)
    }

    /// Computes, without mutating, a poll from one specific slot.
    #[must_use]
    pub fn peek_poll_at(
        &self,
        id: NodeId,
        limit: i32,
        matcher: &ItemMatcher,
    ) -> Option<PeekedPoll> {
        let slot = self.slot(id)?;
        let poll = slot.peek_poll(limit, matcher);
        if poll.taken.is_empty() {
            return Some(PeekedPoll::nothing());
        }
        let mut transactions = TransactionList::new();
        transactions.push(SlotTransaction {
            slot: id,
            original: slot.stack().clone(),
            replacement: poll.replacement,
        });
        Some(PeekedPoll {
            transactions,
            polled: poll.taken,
        })
    }

    /// Polls from one specific slot.
    pub fn poll_at(&mut self, id: NodeId, limit: i32, matcher: &ItemMatcher) -> Option<PeekedPoll> {
        let peeked = self.peek_poll_at(id, limit, matcher)?;
        self.apply(&peeked.transactions);
        Some(peeked)
    }

    /// Computes, without mutating, a wholesale replacement of one slot.
    #[must_use]
    pub fn peek_set_at(&self, id: NodeId, input: &ItemStack, force: bool) -> Option<PeekedSet> {
        let slot = self.slot(id)?;
        let set = slot.peek_set(input, force);
        let mut transactions = TransactionList::new();
        if set.changed {
            transactions.push(SlotTransaction {
                slot: id,
                original: slot.stack().clone(),
                replacement: set.replacement,
            });
        }
        Some(PeekedSet {
            transactions,
            rejected: set.rejected,
        })
    }

    /// Replaces one slot's contents, honoring the partial-failure policy.
    pub fn set_at(&mut self, id: NodeId, input: ItemStack, force: bool) -> Option<PeekedSet> {
        let peeked = self.peek_set_at(id, &input, force)?;
        self.apply(&peeked.transactions);
        Some(peeked)
    }

    /// Unconditionally empties one slot, returning the prior contents.
    pub fn clear_at(&mut self, id: NodeId) -> ItemStack {
        self.slot_mut(id).map_or_else(ItemStack::empty, |slot| slot.clear())
    }

    /// Total number of leaf slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slot_count()
    }

    /// Number of occupied leaf slots.
    #[must_use]
    pub fn size(&self) -> usize {
        self.flattened_slots()
            .iter()
            .filter(|id| self.slot(**id).is_some_and(|slot| !slot.is_empty()))
            .count()
    }

    /// Sum of item quantities across all leaf slots.
    #[must_use]
    pub fn total_items(&self) -> i64 {
        self.flattened_slots()
            .iter()
            .filter_map(|id| self.slot(*id))
            .map(|slot| i64::from(slot.stack().count()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::builder::InventoryBuilder;
    use coffer_registry::vanilla_items;

    fn stone(count: i32) -> ItemStack {
        ItemStack::new(&vanilla_items::STONE, count)
    }

    fn row_tree(length: u32) -> InventoryTree {
        InventoryBuilder::row(length).build().unwrap()
    }

    fn fill(tree: &mut InventoryTree, index: usize, stack: ItemStack) {
        let id = tree.flattened_slots()[index];
        tree.apply(&[SlotTransaction {
            slot: id,
            original: ItemStack::empty(),
            replacement: stack,
        }]);
    }

    #[test]
    fn offer_prefers_the_existing_pile() {
        let mut tree = row_tree(5);
        fill(&mut tree, 3, stone(10));

        let mut input = stone(20);
        let result = tree.offer(&mut input);

        assert!(input.is_empty());
        assert_eq!(result.transactions.len(), 1);
        let pile = tree.flattened_slots()[3];
        assert_eq!(tree.slot(pile).unwrap().stack().count(), 30);
        // Slot 0 stayed empty: the pile won over declaration order.
        let first = tree.flattened_slots()[0];
        assert!(tree.slot(first).unwrap().is_empty());
    }

    #[test]
    fn offer_falls_back_to_linear_scan() {
        let mut tree = row_tree(3);
        fill(&mut tree, 1, stone(60));

        // 10 go into the pile (60 -> 64 takes 4), the rest into slot 0.
        let mut input = stone(10);
        let result = tree.offer(&mut input);

        assert!(input.is_empty());
        assert_eq!(result.transactions.len(), 2);
        assert_eq!(
            tree.slot(tree.flattened_slots()[1]).unwrap().stack().count(),
            64
        );
        assert_eq!(
            tree.slot(tree.flattened_slots()[0]).unwrap().stack().count(),
            6
        );
    }

    #[test]
    fn offer_never_touches_a_slot_twice() {
        let mut tree = row_tree(2);
        fill(&mut tree, 0, stone(60));
        fill(&mut tree, 1, stone(60));

        let mut input = stone(20);
        let result = tree.offer(&mut input);

        // 4 + 4 consumed; each slot appears exactly once.
        assert_eq!(result.transactions.len(), 2);
        let mut seen: Vec<_> = result.transactions.iter().map(|tx| tx.slot).collect();
        seen.dedup();
        assert_eq!(seen.len(), 2);
        assert_eq!(input.count(), 12);
    }

    #[test]
    fn offer_overflow_reports_remainder() {
        let mut tree = row_tree(1);
        let mut input = stone(100);
        let result = tree.offer(&mut input);
        assert_eq!(result.remainder.count(), 36);
        assert_eq!(input.count(), 36);
        assert_eq!(tree.total_items(), 64);
    }

    #[test]
    fn peek_offer_equals_offer() {
        let mut tree = row_tree(4);
        fill(&mut tree, 2, stone(50));

        let input = stone(40);
        let peeked = tree.peek_offer(&input);

        let mut working = input.clone();
        let applied = tree.offer(&mut working);

        assert_eq!(peeked.transactions, applied.transactions);
        assert_eq!(peeked.remainder, applied.remainder);
        for tx in &peeked.transactions {
            assert_eq!(tree.slot(tx.slot).unwrap().stack(), &tx.replacement);
        }
    }

    #[test]
    fn poll_upgrades_matcher_to_similarity() {
        let mut tree = row_tree(4);
        fill(&mut tree, 0, stone(5));
        fill(&mut tree, 1, ItemStack::new(&vanilla_items::ARROW, 7));
        fill(&mut tree, 2, stone(5));

        // Any-matcher seeds on stone, then skips the arrows.
        let result = tree.poll(64, &ItemMatcher::Any);
        assert_eq!(result.polled.count(), 10);
        assert!(ItemStack::is_same_item_same_components(
            &result.polled,
            &stone(1)
        ));
        assert_eq!(tree.total_items(), 7);
    }

    #[test]
    fn poll_stops_at_limit() {
        let mut tree = row_tree(2);
        fill(&mut tree, 0, stone(30));
        fill(&mut tree, 1, stone(30));

        let result = tree.poll(40, &ItemMatcher::Any);
        assert_eq!(result.polled.count(), 40);
        assert_eq!(tree.total_items(), 20);
        // First slot emptied, second split.
        assert_eq!(result.transactions.len(), 2);
    }

    #[test]
    fn quantity_is_conserved() {
        let mut tree = row_tree(6);
        fill(&mut tree, 4, stone(40));

        let before = tree.total_items();
        let mut input = stone(70);
        let offered = input.count();
        let result = tree.offer(&mut input);
        assert_eq!(
            tree.total_items(),
            before + i64::from(offered) - i64::from(result.remainder.count())
        );

        let polled = tree.poll(25, &ItemMatcher::Any);
        assert_eq!(
            tree.total_items(),
            before + i64::from(offered)
                - i64::from(result.remainder.count())
                - i64::from(polled.polled.count())
        );
    }

    #[test]
    fn targeted_set_returns_the_excess() {
        let mut tree = row_tree(2);
        let id = tree.flattened_slots()[1];

        let set = tree.set_at(id, stone(100), false).unwrap();
        assert_eq!(set.rejected.count(), 36);
        assert_eq!(tree.slot(id).unwrap().stack().count(), 64);

        assert_eq!(tree.clear_at(id).count(), 64);
        assert!(tree.slot(id).unwrap().is_empty());
    }

    #[test]
    fn targeted_offer_and_poll_round_trip() {
        let mut tree = row_tree(2);
        let id = tree.flattened_slots()[0];

        let mut input = stone(70);
        let offered = tree.offer_at(id, &mut input).unwrap();
        assert_eq!(input.count(), 6);
        assert_eq!(offered.transactions.len(), 1);

        let polled = tree.poll_at(id, 10, &ItemMatcher::Any).unwrap();
        assert_eq!(polled.polled.count(), 10);
        assert_eq!(tree.slot(id).unwrap().stack().count(), 54);
    }

    #[test]
    fn size_counts_occupied_slots() {
        let mut tree = row_tree(5);
        fill(&mut tree, 0, stone(1));
        fill(&mut tree, 3, stone(2));
        assert_eq!(tree.capacity(), 5);
        assert_eq!(tree.size(), 2);
        assert_eq!(tree.total_items(), 3);
    }

    #[test]
    fn prioritized_child_is_scanned_first() {
        let mut tree = InventoryBuilder::ordered()
            .child(InventoryBuilder::row(2).archetype())
            .child(InventoryBuilder::row(2).archetype())
            .build()
            .unwrap();
        let second = tree.children(tree.root())[1];
        tree.prioritize(second);

        let mut input = stone(10);
        let result = tree.offer(&mut input);
        // The stack landed in the prioritized row's first slot (index 2).
        assert_eq!(tree.slot_index(result.transactions[0].slot), Some(2));
    }
}
