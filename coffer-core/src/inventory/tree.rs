//! Arena-backed inventory node tree.
//!
//! An inventory is a tree of nodes stored in one arena and addressed by
//! stable [`NodeId`]s. Leaves hold a [`Slot`]; composites hold an ordered
//! child list plus an addressing overlay (grid, row, column). Parent and
//! root lookups are index walks, so there are no back-reference cycles to
//! manage.
//!
//! Tree shape is frozen once built. The flattened leaf list and the
//! slot→index map are computed lazily on first use and never observed
//! half-built; only the traversal (priority) order of a composite may
//! change afterwards, and that never affects slot indices.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use super::slot::Slot;
use super::transaction::SlotTransaction;

/// Stable handle to a node in an [`InventoryTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[must_use]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A property value attached to a node.
///
/// Properties inherit: a lookup walks toward the root until a node
/// declares the key.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// A boolean property.
    Bool(bool),
    /// An integer property.
    Int(i64),
    /// A text property.
    Text(String),
}

/// How a composite addresses its children.
#[derive(Debug, Clone)]
pub enum Addressing {
    /// Children addressed by declaration order only.
    Ordered,
    /// A W×H matrix with a coordinate map onto leaf slots.
    Grid {
        /// Number of columns.
        width: u32,
        /// Number of rows.
        height: u32,
        /// Coordinate → leaf slot. Populated and validated at build time.
        cells: FxHashMap<(u32, u32), NodeId>,
    },
    /// A horizontal run of slots.
    Row {
        /// Number of slots in the row.
        length: u32,
    },
    /// A vertical run of slots.
    Column {
        /// Number of slots in the column.
        length: u32,
    },
}

/// An internal tree node aggregating child nodes.
#[derive(Debug, Clone)]
pub struct Composite {
    /// Children in declared order; defines flattened slot indices.
    pub(crate) children: Vec<NodeId>,
    /// Children in traversal order; offer/poll scans follow this.
    pub(crate) traversal: Vec<NodeId>,
    /// The addressing overlay.
    pub(crate) addressing: Addressing,
}

/// The shape of a node: a leaf slot or a composite.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A leaf holding one slot.
    Leaf(Slot),
    /// A composite of child nodes.
    Composite(Composite),
}

/// One node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) name: Option<String>,
    pub(crate) properties: FxHashMap<&'static str, PropertyValue>,
    pub(crate) kind: NodeKind,
}

impl Node {
    /// The node's name, if it was given one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The node's shape.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The slot, if this is a leaf.
    #[must_use]
    pub fn as_slot(&self) -> Option<&Slot> {
        match &self.kind {
            NodeKind::Leaf(slot) => Some(slot),
            NodeKind::Composite(_) => None,
        }
    }
}

#[derive(Debug)]
struct FlatIndex {
    slots: Vec<NodeId>,
    index_of: FxHashMap<NodeId, usize>,
}

/// An inventory tree: the arena, its root, and the lazy flat index.
#[derive(Debug)]
pub struct InventoryTree {
    nodes: Vec<Node>,
    root: NodeId,
    flat: OnceLock<FlatIndex>,
}

impl InventoryTree {
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId) -> Self {
        Self {
            nodes,
            root,
            flat: OnceLock::new(),
        }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrows a node.
    ///
    /// # Panics
    /// Panics if the id does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Borrows the slot of a leaf node.
    #[must_use]
    pub fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.node(id).as_slot()
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        match &mut self.node_mut(id).kind {
            NodeKind::Leaf(slot) => Some(slot),
            NodeKind::Composite(_) => None,
        }
    }

    /// The parent of a node, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Looks up a property on the node, inheriting from ancestors.
    #[must_use]
    pub fn property(&self, id: NodeId, key: &str) -> Option<&PropertyValue> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current);
            if let Some(value) = node.properties.get(key) {
                return Some(value);
            }
            cursor = node.parent;
        }
        None
    }

    fn flat_index(&self) -> &FlatIndex {
        self.flat.get_or_init(|| {
            let mut slots = Vec::new();
            self.collect_declared(self.root, &mut slots);
            let index_of = slots
                .iter()
                .enumerate()
                .map(|(index, id)| (*id, index))
                .collect();
            FlatIndex { slots, index_of }
        })
    }

    fn collect_declared(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match &self.node(id).kind {
            NodeKind::Leaf(_) => out.push(id),
            NodeKind::Composite(composite) => {
                for child in &composite.children {
                    self.collect_declared(*child, out);
                }
            }
        }
    }

    /// The leaf slots in declared (index) order.
    #[must_use]
    pub fn flattened_slots(&self) -> &[NodeId] {
        &self.flat_index().slots
    }

    /// The flattened index of a leaf slot.
    #[must_use]
    pub fn slot_index(&self, id: NodeId) -> Option<usize> {
        self.flat_index().index_of.get(&id).copied()
    }

    /// The leaf slot at a flattened index.
    #[must_use]
    pub fn slot_at(&self, index: usize) -> Option<NodeId> {
        self.flat_index().slots.get(index).copied()
    }

    /// Number of leaf slots in the tree.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.flat_index().slots.len()
    }

    /// The leaf slots in traversal (priority) order.
    ///
    /// Recomputed per call: priority moves are rare and the walk is a
    /// cheap index chase, which keeps reads free of cache invalidation.
    #[must_use]
    pub fn traversal_slots(&self) -> Vec<NodeId> {
        let mut slots = Vec::with_capacity(self.slot_count());
        self.collect_traversal(self.root, &mut slots);
        slots
    }

    fn collect_traversal(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match &self.node(id).kind {
            NodeKind::Leaf(_) => out.push(id),
            NodeKind::Composite(composite) => {
                for child in &composite.traversal {
                    self.collect_traversal(*child, out);
                }
            }
        }
    }

    /// Moves `child` to the front of its parent's traversal order.
    ///
    /// Affects only offer/poll scan order; declared order, addressing,
    /// and slot indices are untouched.
    pub fn prioritize(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let NodeKind::Composite(composite) = &mut self.node_mut(parent).kind
            && let Some(position) = composite.traversal.iter().position(|id| *id == child)
            && position != 0
        {
            composite.traversal.remove(position);
            composite.traversal.insert(0, child);
        }
    }

    /// Resolves a grid coordinate to a leaf slot.
    ///
    /// Returns `None` when `composite` is not a grid or the coordinate is
    /// out of range.
    #[must_use]
    pub fn slot_at_coord(&self, composite: NodeId, x: u32, y: u32) -> Option<NodeId> {
        match &self.node(composite).kind {
            NodeKind::Composite(node) => match &node.addressing {
                Addressing::Grid { cells, .. } => cells.get(&(x, y)).copied(),
                _ => None,
            },
            NodeKind::Leaf(_) => None,
        }
    }

    /// The declared children of a composite node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Composite(composite) => &composite.children,
            NodeKind::Leaf(_) => &[],
        }
    }

    /// Applies a transaction list, replacing each slot's contents.
    ///
    /// Proposals are computed against current state on the owning thread,
    /// so application is a plain overwrite; partially applying a proposal
    /// is impossible because nothing here can fail.
    pub fn apply(&mut self, transactions: &[SlotTransaction]) {
        for transaction in transactions {
            if let Some(slot) = self.slot_mut(transaction.slot) {
                slot.set_stack_unchecked(transaction.replacement.clone());
            }
        }
    }
}
