//! Transaction value objects and peek outcomes.
//!
//! Every mutating inventory operation has a non-mutating peek twin. The
//! peek computes a set of [`SlotTransaction`]s describing the slots it
//! would touch; committing applies the replacements verbatim, so a peek
//! followed by an apply is byte-identical to the mutating operation.
//!
//! Policy outcomes (full slot, filter rejection) are expressed in these
//! values — an offer that moves nothing has an untouched remainder and an
//! empty transaction list, never an error.

use coffer_registry::{ItemStack, ItemTypeRef};
use smallvec::SmallVec;

use super::tree::NodeId;

/// A proposed or applied change to one slot.
///
/// Transactions are plain values; they carry no ownership of the slot and
/// stay valid descriptions of the change after it is applied or discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotTransaction {
    /// The slot being changed.
    pub slot: NodeId,
    /// Snapshot of the slot contents before the change.
    pub original: ItemStack,
    /// The slot contents after the change.
    pub replacement: ItemStack,
}

impl SlotTransaction {
    /// Returns true if the transaction would not change the slot.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.original == self.replacement
    }
}

/// Transaction lists are short — most operations touch one or two slots.
pub type TransactionList = SmallVec<[SlotTransaction; 2]>;

/// The result of peeking an offer into an inventory.
#[derive(Debug, Clone)]
pub struct PeekedOffer {
    /// The slot changes the offer would make, in application order.
    pub transactions: TransactionList,
    /// What would be left of the offered stack.
    pub remainder: ItemStack,
}

impl PeekedOffer {
    /// An offer that moved nothing: the input comes back as remainder.
    #[must_use]
    pub fn rejected(input: ItemStack) -> Self {
        Self {
            transactions: TransactionList::new(),
            remainder: input,
        }
    }

    /// Returns true if the offered stack would be fully consumed.
    #[must_use]
    pub fn fully_consumed(&self) -> bool {
        self.remainder.is_empty()
    }
}

/// The result of peeking a poll from an inventory.
#[derive(Debug, Clone)]
pub struct PeekedPoll {
    /// The slot changes the poll would make.
    pub transactions: TransactionList,
    /// The stack the poll would produce (possibly partial, possibly empty).
    pub polled: ItemStack,
}

impl PeekedPoll {
    /// A poll that found nothing.
    #[must_use]
    pub fn nothing() -> Self {
        Self {
            transactions: TransactionList::new(),
            polled: ItemStack::empty(),
        }
    }
}

/// The result of peeking a wholesale slot replacement.
///
/// Replacement has partial-failure semantics: a stack larger than the slot
/// capacity sets the fitting portion and returns the excess as `rejected`.
#[derive(Debug, Clone)]
pub struct PeekedSet {
    /// The slot changes the set would make (empty if fully rejected).
    pub transactions: TransactionList,
    /// The portion of the input that would not be accepted.
    pub rejected: ItemStack,
}

/// A predicate over item stacks used by poll operations.
///
/// A closed set of matchers keeps poll results inspectable; composite
/// polls upgrade whatever matcher they were given to [`Self::SimilarTo`]
/// once a seed stack is found, so one poll never mixes item kinds.
#[derive(Debug, Clone)]
pub enum ItemMatcher {
    /// Matches any non-empty stack.
    Any,
    /// Matches stacks similar to the given one (type + components).
    SimilarTo(ItemStack),
    /// Matches stacks of the given item type, components ignored.
    OfType(ItemTypeRef),
}

impl ItemMatcher {
    /// Tests a stack against the matcher. Empty stacks never match.
    #[must_use]
    pub fn matches(&self, stack: &ItemStack) -> bool {
        if stack.is_empty() {
            return false;
        }
        match self {
            Self::Any => true,
            Self::SimilarTo(reference) => ItemStack::is_same_item_same_components(reference, stack),
            Self::OfType(item) => stack.item().is_some_and(|ty| std::ptr::eq(ty, *item)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_registry::vanilla_items;

    #[test]
    fn matcher_rejects_empty() {
        assert!(!ItemMatcher::Any.matches(&ItemStack::empty()));
    }

    #[test]
    fn matcher_of_type_ignores_count() {
        let matcher = ItemMatcher::OfType(&vanilla_items::ARROW);
        assert!(matcher.matches(&ItemStack::new(&vanilla_items::ARROW, 1)));
        assert!(matcher.matches(&ItemStack::new(&vanilla_items::ARROW, 64)));
        assert!(!matcher.matches(&ItemStack::new(&vanilla_items::STONE, 1)));
    }

    #[test]
    fn similar_matcher_tracks_components() {
        use coffer_registry::{ComponentPatch, ComponentValue};

        let reference = ItemStack::new(&vanilla_items::STONE, 1);
        let matcher = ItemMatcher::SimilarTo(reference);
        assert!(matcher.matches(&ItemStack::new(&vanilla_items::STONE, 30)));

        let tagged = ItemStack::with_components(
            &vanilla_items::STONE,
            30,
            ComponentPatch::empty().with("custom_name", ComponentValue::Text("rock".into())),
        );
        assert!(!matcher.matches(&tagged));
    }
}
