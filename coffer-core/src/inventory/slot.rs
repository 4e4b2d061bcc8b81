//! Leaf slot: stacking arithmetic and transaction primitives.

use std::fmt;
use std::sync::Arc;

use coffer_registry::ItemStack;

use super::transaction::ItemMatcher;

/// Acceptance predicate attached to a slot.
///
/// Filters are shared between the archetype and every slot built from it.
pub type SlotFilter = Arc<dyn Fn(&ItemStack) -> bool + Send + Sync>;

/// The outcome of peeking an offer into one slot.
///
/// `consumed == 0` means the offer was rejected and `replacement` equals
/// the current contents.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotOffer {
    /// How many items of the input the slot would absorb.
    pub consumed: i32,
    /// The slot contents after the offer.
    pub replacement: ItemStack,
}

/// The outcome of peeking a poll from one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPoll {
    /// The stack the poll would remove (empty if nothing matched).
    pub taken: ItemStack,
    /// The slot contents after the poll.
    pub replacement: ItemStack,
}

/// The outcome of peeking a wholesale replacement of one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSet {
    /// The slot contents after the set.
    pub replacement: ItemStack,
    /// The portion of the input the slot would not accept.
    pub rejected: ItemStack,
    /// Whether the set would change the slot at all.
    pub changed: bool,
}

/// A leaf inventory node holding at most one item stack.
///
/// Slots are mutated only through `offer`/`poll`/`set`/`clear`; each of
/// those applies the result of its peek twin, so the peek contract of the
/// transaction engine holds by construction.
#[derive(Clone)]
pub struct Slot {
    stack: ItemStack,
    max_stack_size: i32,
    filter: Option<SlotFilter>,
    place_allowed: bool,
    pickup_allowed: bool,
    prefer_reverse_quick_move: bool,
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("stack", &self.stack)
            .field("max_stack_size", &self.max_stack_size)
            .field("filtered", &self.filter.is_some())
            .field("place_allowed", &self.place_allowed)
            .field("pickup_allowed", &self.pickup_allowed)
            .finish()
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::new()
    }
}

impl Slot {
    /// Creates an empty, unfiltered slot with the default limit of 64.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: ItemStack::empty(),
            max_stack_size: 64,
            filter: None,
            place_allowed: true,
            pickup_allowed: true,
            prefer_reverse_quick_move: false,
        }
    }

    /// Sets the per-slot stack limit.
    #[must_use]
    pub fn with_max_stack_size(mut self, max: i32) -> Self {
        self.max_stack_size = max.max(1);
        self
    }

    /// Attaches an acceptance filter.
    #[must_use]
    pub fn with_filter(mut self, filter: SlotFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Marks the slot output-only: items can be taken but never placed.
    #[must_use]
    pub fn output_only(mut self) -> Self {
        self.place_allowed = false;
        self
    }

    /// Prefers the reversed destination order on shift-click.
    #[must_use]
    pub fn with_reverse_quick_move(mut self) -> Self {
        self.prefer_reverse_quick_move = true;
        self
    }

    /// The current contents (empty stack when vacant).
    #[must_use]
    pub fn stack(&self) -> &ItemStack {
        &self.stack
    }

    /// Returns true if the slot holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The per-slot stack limit, before the item's native limit applies.
    #[must_use]
    pub fn max_stack_size(&self) -> i32 {
        self.max_stack_size
    }

    /// The effective limit for a specific item in this slot.
    #[must_use]
    pub fn max_stack_size_for(&self, item: &ItemStack) -> i32 {
        self.max_stack_size.min(item.max_stack_size())
    }

    /// Whether this slot accepts the given stack (placement policy).
    #[must_use]
    pub fn accepts(&self, stack: &ItemStack) -> bool {
        self.place_allowed && self.filter.as_ref().is_none_or(|filter| filter(stack))
    }

    /// Whether items can be picked up from this slot.
    #[must_use]
    pub fn may_pickup(&self) -> bool {
        self.pickup_allowed
    }

    /// Whether items can ever be placed into this slot.
    #[must_use]
    pub fn may_place_any(&self) -> bool {
        self.place_allowed
    }

    /// Whether shift-clicks out of this slot scan the destination in
    /// reverse order.
    #[must_use]
    pub fn prefers_reverse_quick_move(&self) -> bool {
        self.prefer_reverse_quick_move
    }

    /// Computes, without mutating, how much of `input` would merge in.
    ///
    /// Rejects outright when the slot holds a dissimilar stack, is at its
    /// effective limit, or the filter refuses the input; otherwise merges
    /// up to the available space and reports the consumed amount.
    #[must_use]
    pub fn peek_offer(&self, input: &ItemStack) -> SlotOffer {
        let reject = SlotOffer {
            consumed: 0,
            replacement: self.stack.clone(),
        };

        if input.is_empty() || !self.accepts(input) {
            return reject;
        }
        if !self.stack.is_empty() && !ItemStack::is_same_item_same_components(&self.stack, input) {
            return reject;
        }

        let available = self.max_stack_size_for(input) - self.stack.count();
        if available <= 0 {
            return reject;
        }

        let consumed = available.min(input.count());
        let replacement = if self.stack.is_empty() {
            input.copy_with_count(consumed)
        } else {
            self.stack.copy_with_count(self.stack.count() + consumed)
        };
        SlotOffer {
            consumed,
            replacement,
        }
    }

    /// Merges as much of `input` as fits, draining the caller's stack.
    ///
    /// Returns the consumed amount. Final slot state is exactly what
    /// [`Self::peek_offer`] predicted for the same pre-state.
    pub fn offer(&mut self, input: &mut ItemStack) -> i32 {
        let peeked = self.peek_offer(input);
        if peeked.consumed > 0 {
            self.stack = peeked.replacement;
            input.shrink(peeked.consumed);
        }
        peeked.consumed
    }

    /// Computes, without mutating, a removal of up to `limit` items
    /// matching `matcher`.
    #[must_use]
    pub fn peek_poll(&self, limit: i32, matcher: &ItemMatcher) -> SlotPoll {
        let nothing = SlotPoll {
            taken: ItemStack::empty(),
            replacement: self.stack.clone(),
        };

        if limit <= 0 || !self.pickup_allowed || !matcher.matches(&self.stack) {
            return nothing;
        }

        let taken_count = limit.min(self.stack.count());
        let taken = self.stack.copy_with_count(taken_count);
        let replacement = if taken_count >= self.stack.count() {
            ItemStack::empty()
        } else {
            self.stack.copy_with_count(self.stack.count() - taken_count)
        };
        SlotPoll { taken, replacement }
    }

    /// Removes up to `limit` matching items, returning the polled stack.
    pub fn poll(&mut self, limit: i32, matcher: &ItemMatcher) -> ItemStack {
        let peeked = self.peek_poll(limit, matcher);
        self.stack = peeked.replacement;
        peeked.taken
    }

    /// Computes, without mutating, a wholesale replacement.
    ///
    /// Without `force`, a filtered-out stack fails and keeps the current
    /// contents. A stack over capacity sets the fitting portion and
    /// returns the excess as rejected — deliberate partial success, not
    /// all-or-nothing. `force` bypasses the filter but never the capacity
    /// clamp.
    #[must_use]
    pub fn peek_set(&self, input: &ItemStack, force: bool) -> SlotSet {
        if input.is_empty() {
            return SlotSet {
                replacement: ItemStack::empty(),
                rejected: ItemStack::empty(),
                changed: !self.stack.is_empty(),
            };
        }

        let filter_passes = force || self.filter.as_ref().is_none_or(|filter| filter(input));
        if !filter_passes {
            return SlotSet {
                replacement: self.stack.clone(),
                rejected: input.clone(),
                changed: false,
            };
        }

        let capacity = self.max_stack_size_for(input);
        let fitting = input.count().min(capacity);
        let replacement = input.copy_with_count(fitting);
        let rejected = input.copy_with_count(input.count() - fitting);
        SlotSet {
            changed: self.stack != replacement,
            replacement,
            rejected,
        }
    }

    /// Replaces the contents wholesale, returning the rejected portion.
    pub fn set(&mut self, input: ItemStack, force: bool) -> ItemStack {
        let peeked = self.peek_set(&input, force);
        if peeked.changed {
            self.stack = peeked.replacement;
        }
        peeked.rejected
    }

    /// Unconditionally empties the slot, returning the prior contents.
    pub fn clear(&mut self) -> ItemStack {
        self.stack.copy_and_clear()
    }

    pub(crate) fn set_stack_unchecked(&mut self, stack: ItemStack) {
        self.stack = stack;
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
    fn offer_tops_up_and_leaves_remainder() {
        // Slot holding 40/64 offered 30 ends at 64 with 6 left over.
        let mut slot = Slot::new();
        let _ = slot.set(stone(40), false);

        let mut input = stone(30);
        let consumed = slot.offer(&mut input);
        assert_eq!(consumed, 24);
        assert_eq!(slot.stack().count(), 64);
        assert_eq!(input.count(), 6);
    }

    #[test]
    fn offer_rejects_dissimilar() {
        let mut slot = Slot::new();
        let _ = slot.set(stone(10), false);

        let mut input = ItemStack::new(&vanilla_items::ARROW, 5);
        assert_eq!(slot.offer(&mut input), 0);
        assert_eq!(input.count(), 5);
        assert_eq!(slot.stack().count(), 10);
    }

    #[test]
    fn offer_rejects_when_filter_refuses() {
        let mut slot = Slot::new().with_filter(Arc::new(|stack: &ItemStack| {
            stack.item().is_some_and(|ty| std::ptr::eq(ty, &vanilla_items::ARROW))
        }));

        let mut stones = stone(8);
        assert_eq!(slot.offer(&mut stones), 0);
        assert!(slot.is_empty());

        let mut arrows = ItemStack::new(&vanilla_items::ARROW, 8);
        assert_eq!(slot.offer(&mut arrows), 8);
        assert!(arrows.is_empty());
    }

    #[test]
    fn offer_respects_native_limit() {
        // Ender pearls stack to 16 even in a 64-slot.
        let mut slot = Slot::new();
        let mut pearls = ItemStack::new(&vanilla_items::ENDER_PEARL, 20);
        assert_eq!(slot.offer(&mut pearls), 16);
        assert_eq!(slot.stack().count(), 16);
        assert_eq!(pearls.count(), 4);
    }

    #[test]
    fn offer_respects_slot_limit() {
        let mut slot = Slot::new().with_max_stack_size(8);
        let mut input = stone(20);
        assert_eq!(slot.offer(&mut input), 8);
        assert_eq!(slot.stack().count(), 8);
        assert_eq!(input.count(), 12);
    }

    #[test]
    fn peek_offer_matches_offer() {
        let cases = [
            (Slot::new(), stone(30)),
            (
                {
                    let mut slot = Slot::new();
                    let _ = slot.set(stone(40), false);
                    slot
                },
                stone(30),
            ),
            (
                {
                    let mut slot = Slot::new();
                    let _ = slot.set(stone(64), false);
                    slot
                },
                stone(5),
            ),
            (Slot::new().output_only(), stone(12)),
        ];

        for (slot, input) in cases {
            let peeked = slot.peek_offer(&input);

            let mut applied = slot.clone();
            let mut working = input.clone();
            let consumed = applied.offer(&mut working);

            assert_eq!(consumed, peeked.consumed);
            assert_eq!(applied.stack(), &peeked.replacement);
            assert_eq!(working.count(), input.count() - peeked.consumed);
        }
    }

    #[test]
    fn peek_is_idempotent() {
        let mut slot = Slot::new();
        let _ = slot.set(stone(40), false);
        let input = stone(30);

        let first = slot.peek_offer(&input);
        let second = slot.peek_offer(&input);
        assert_eq!(first, second);

        let poll_a = slot.peek_poll(10, &ItemMatcher::Any);
        let poll_b = slot.peek_poll(10, &ItemMatcher::Any);
        assert_eq!(poll_a, poll_b);
    }

    #[test]
    fn poll_splits_the_stack() {
        let mut slot = Slot::new();
        let _ = slot.set(stone(10), false);

        let taken = slot.poll(4, &ItemMatcher::Any);
        assert_eq!(taken.count(), 4);
        assert_eq!(slot.stack().count(), 6);
    }

    #[test]
    fn poll_over_limit_empties_the_slot() {
        let mut slot = Slot::new();
        let _ = slot.set(stone(10), false);

        let taken = slot.poll(99, &ItemMatcher::Any);
        assert_eq!(taken.count(), 10);
        assert!(slot.is_empty());
    }

    #[test]
    fn poll_honors_matcher() {
        let mut slot = Slot::new();
        let _ = slot.set(stone(10), false);

        let matcher = ItemMatcher::OfType(&vanilla_items::ARROW);
        assert!(slot.poll(10, &matcher).is_empty());
        assert_eq!(slot.stack().count(), 10);
    }

    #[test]
    fn set_partial_success_returns_excess() {
        let mut slot = Slot::new().with_max_stack_size(16);
        let rejected = slot.set(stone(40), false);
        assert_eq!(slot.stack().count(), 16);
        assert_eq!(rejected.count(), 24);
    }

    #[test]
    fn set_filtered_out_keeps_contents() {
        let mut slot = Slot::new().with_filter(Arc::new(|_: &ItemStack| false));
        slot.set_stack_unchecked(stone(3));

        let rejected = slot.set(ItemStack::new(&vanilla_items::ARROW, 5), false);
        assert_eq!(rejected.count(), 5);
        assert_eq!(slot.stack().count(), 3);
    }

    #[test]
    fn forced_set_bypasses_filter_but_not_capacity() {
        let mut slot = Slot::new()
            .with_max_stack_size(16)
            .with_filter(Arc::new(|_: &ItemStack| false));

        let rejected = slot.set(stone(40), true);
        assert_eq!(slot.stack().count(), 16);
        assert_eq!(rejected.count(), 24);
    }

    #[test]
    fn clear_always_succeeds() {
        let mut slot = Slot::new().with_filter(Arc::new(|_: &ItemStack| false));
        slot.set_stack_unchecked(stone(7));

        let taken = slot.clear();
        assert_eq!(taken.count(), 7);
        assert!(slot.is_empty());
    }

    #[test]
    fn output_only_rejects_offers_but_allows_polls() {
        let mut slot = Slot::new().output_only();
        slot.set_stack_unchecked(stone(5));

        let mut input = stone(5);
        assert_eq!(slot.offer(&mut input), 0);
        assert_eq!(slot.poll(5, &ItemMatcher::Any).count(), 5);
    }
}
