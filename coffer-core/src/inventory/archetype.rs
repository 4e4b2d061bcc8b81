//! Inventory archetypes: immutable, shareable construction blueprints.
//!
//! An archetype describes the shape of an inventory tree — slots, rows,
//! columns, grids, ordered groups — without holding any items. Archetypes
//! are immutable once created and shared behind `Arc`s by any number of
//! builders and inventory instances; instantiating one is a pure function
//! that either yields a fresh tree or a [`BuildError`].

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::slot::{Slot, SlotFilter};
use super::tree::{Addressing, Composite, InventoryTree, Node, NodeId, NodeKind, PropertyValue};

/// Construction-time failures. These are invariant violations, not policy
/// outcomes: a build that returns one of these produced no tree at all.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// A grid coordinate was left without a bound archetype.
    #[error("grid cell ({x}, {y}) has no bound archetype")]
    MissingGridCell {
        /// Column of the unbound cell.
        x: u32,
        /// Row of the unbound cell.
        y: u32,
    },
    /// The same physical slot was registered through two declared paths.
    #[error("slot at ({x}, {y}) is registered through more than one path")]
    DuplicateSlotRegistration {
        /// Column of the doubly-bound cell.
        x: u32,
        /// Row of the doubly-bound cell.
        y: u32,
    },
    /// A binding extends outside the declared grid dimensions.
    #[error("binding at ({x}, {y}) does not fit a {width}x{height} grid")]
    BindingOutOfBounds {
        /// Column of the offending binding.
        x: u32,
        /// Row of the offending binding.
        y: u32,
        /// Declared grid width.
        width: u32,
        /// Declared grid height.
        height: u32,
    },
    /// Grid dimensions must both be non-zero.
    #[error("grid dimensions must be non-zero")]
    ZeroGridDimension,
    /// Rows and columns are runs of slots; nothing else may appear.
    #[error("rows and columns may only contain slot archetypes")]
    NonSlotInLine,
    /// Grids bind slots, rows, or columns; other shapes are rejected.
    #[error("grids may only bind slot, row, or column archetypes")]
    UnsupportedGridBinding,
}

/// The slot-shape portion of an archetype.
#[derive(Clone, Default)]
pub struct SlotArchetype {
    /// Per-slot stack limit; `None` keeps the default of 64.
    pub max_stack_size: Option<i32>,
    /// Acceptance predicate shared by every slot built from this.
    pub filter: Option<SlotFilter>,
    /// Items can be taken but never placed.
    pub output_only: bool,
    /// Shift-clicks out of this slot scan the destination in reverse.
    pub reverse_quick_move: bool,
}

impl fmt::Debug for SlotArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotArchetype")
            .field("max_stack_size", &self.max_stack_size)
            .field("filtered", &self.filter.is_some())
            .field("output_only", &self.output_only)
            .field("reverse_quick_move", &self.reverse_quick_move)
            .finish()
    }
}

impl SlotArchetype {
    fn build_slot(&self) -> Slot {
        let mut slot = Slot::new();
        if let Some(max) = self.max_stack_size {
            slot = slot.with_max_stack_size(max);
        }
        if let Some(filter) = &self.filter {
            slot = slot.with_filter(Arc::clone(filter));
        }
        if self.output_only {
            slot = slot.output_only();
        }
        if self.reverse_quick_move {
            slot = slot.with_reverse_quick_move();
        }
        slot
    }
}

/// A grid binding: a child archetype anchored at a coordinate.
///
/// A slot binding covers its cell; a row binding covers `length` cells to
/// the right of the anchor; a column binding covers `length` cells below
/// it.
#[derive(Debug, Clone)]
pub struct GridBinding {
    /// Anchor column.
    pub x: u32,
    /// Anchor row.
    pub y: u32,
    /// The bound archetype (slot, row, or column).
    pub archetype: Arc<InventoryArchetype>,
}

/// The shape of an archetype.
#[derive(Debug, Clone)]
pub enum ArchetypeKind {
    /// A single slot.
    Slot(SlotArchetype),
    /// An ordered group of arbitrary child archetypes.
    Ordered {
        /// Children in declared order.
        children: Vec<Arc<InventoryArchetype>>,
    },
    /// A horizontal run of slots.
    Row {
        /// The slot archetypes, left to right.
        slots: Vec<Arc<InventoryArchetype>>,
    },
    /// A vertical run of slots.
    Column {
        /// The slot archetypes, top to bottom.
        slots: Vec<Arc<InventoryArchetype>>,
    },
    /// A W×H matrix assembled from coordinate bindings.
    Grid {
        /// Number of columns.
        width: u32,
        /// Number of rows.
        height: u32,
        /// The declared bindings, in declaration order.
        bindings: Vec<GridBinding>,
    },
}

/// An immutable inventory blueprint.
#[derive(Debug, Clone)]
pub struct InventoryArchetype {
    pub(crate) name: Option<String>,
    pub(crate) kind: ArchetypeKind,
    pub(crate) properties: FxHashMap<&'static str, PropertyValue>,
}

impl InventoryArchetype {
    /// A default, unfiltered slot archetype.
    #[must_use]
    pub fn default_slot() -> Arc<Self> {
        Arc::new(Self {
            name: None,
            kind: ArchetypeKind::Slot(SlotArchetype::default()),
            properties: FxHashMap::default(),
        })
    }

    /// The archetype's name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The archetype's shape.
    #[must_use]
    pub fn kind(&self) -> &ArchetypeKind {
        &self.kind
    }

    /// Instantiates a fresh tree from this blueprint.
    ///
    /// Pure and repeatable: instantiating twice yields two independent
    /// trees with identical shape.
    pub fn instantiate(&self) -> Result<InventoryTree, BuildError> {
        let mut nodes = Vec::new();
        let root = build_node(self, &mut nodes)?;
        Ok(InventoryTree::from_parts(nodes, root))
    }
}

fn push_node(
    nodes: &mut Vec<Node>,
    archetype: &InventoryArchetype,
    kind: NodeKind,
) -> NodeId {
    let id = NodeId(nodes.len() as u32);
    nodes.push(Node {
        parent: None,
        name: archetype.name.clone(),
        properties: archetype.properties.clone(),
        kind,
    });
    id
}

fn adopt(nodes: &mut [Node], parent: NodeId, children: &[NodeId]) {
    for child in children {
        nodes[child.index()].parent = Some(parent);
    }
}

fn build_node(
    archetype: &InventoryArchetype,
    nodes: &mut Vec<Node>,
) -> Result<NodeId, BuildError> {
    match &archetype.kind {
        ArchetypeKind::Slot(slot) => Ok(push_node(
            nodes,
            archetype,
            NodeKind::Leaf(slot.build_slot()),
        )),
        ArchetypeKind::Ordered { children } => {
            let mut ids = Vec::with_capacity(children.len());
            for child in children {
                ids.push(build_node(child, nodes)?);
            }
            let id = push_node(
                nodes,
                archetype,
                NodeKind::Composite(Composite {
                    children: ids.clone(),
                    traversal: ids.clone(),
                    addressing: Addressing::Ordered,
                }),
            );
            adopt(nodes, id, &ids);
            Ok(id)
        }
        ArchetypeKind::Row { slots } => build_line(archetype, slots, nodes, true),
        ArchetypeKind::Column { slots } => build_line(archetype, slots, nodes, false),
        ArchetypeKind::Grid {
            width,
            height,
            bindings,
        } => build_grid(archetype, *width, *height, bindings, nodes),
    }
}

fn build_line(
    archetype: &InventoryArchetype,
    slots: &[Arc<InventoryArchetype>],
    nodes: &mut Vec<Node>,
    horizontal: bool,
) -> Result<NodeId, BuildError> {
    let mut ids = Vec::with_capacity(slots.len());
    for slot in slots {
        let ArchetypeKind::Slot(slot_archetype) = &slot.kind else {
            return Err(BuildError::NonSlotInLine);
        };
        ids.push(push_node(
            nodes,
            slot,
            NodeKind::Leaf(slot_archetype.build_slot()),
        ));
    }
    let length = ids.len() as u32;
    let addressing = if horizontal {
        Addressing::Row { length }
    } else {
        Addressing::Column { length }
    };
    let id = push_node(
        nodes,
        archetype,
        NodeKind::Composite(Composite {
            children: ids.clone(),
            traversal: ids.clone(),
            addressing,
        }),
    );
    adopt(nodes, id, &ids);
    Ok(id)
}

fn build_grid(
    archetype: &InventoryArchetype,
    width: u32,
    height: u32,
    bindings: &[GridBinding],
    nodes: &mut Vec<Node>,
) -> Result<NodeId, BuildError> {
    if width == 0 || height == 0 {
        return Err(BuildError::ZeroGridDimension);
    }

    let mut children = Vec::with_capacity(bindings.len());
    let mut cells: FxHashMap<(u32, u32), NodeId> = FxHashMap::default();

    let mut register =
        |cells: &mut FxHashMap<(u32, u32), NodeId>, x: u32, y: u32, slot: NodeId| {
            if x >= width || y >= height {
                return Err(BuildError::BindingOutOfBounds {
                    x,
                    y,
                    width,
                    height,
                });
            }
            if cells.insert((x, y), slot).is_some() {
                return Err(BuildError::DuplicateSlotRegistration { x, y });
            }
            Ok(())
        };

    for binding in bindings {
        let child = build_node(&binding.archetype, nodes)?;
        match &binding.archetype.kind {
            ArchetypeKind::Slot(_) => {
                register(&mut cells, binding.x, binding.y, child)?;
            }
            ArchetypeKind::Row { .. } => {
                let leaves: Vec<NodeId> = match &nodes[child.index()].kind {
                    NodeKind::Composite(composite) => composite.children.clone(),
                    NodeKind::Leaf(_) => Vec::new(),
                };
                for (offset, leaf) in leaves.iter().enumerate() {
                    register(&mut cells, binding.x + offset as u32, binding.y, *leaf)?;
                }
            }
            ArchetypeKind::Column { .. } => {
                let leaves: Vec<NodeId> = match &nodes[child.index()].kind {
                    NodeKind::Composite(composite) => composite.children.clone(),
                    NodeKind::Leaf(_) => Vec::new(),
                };
                for (offset, leaf) in leaves.iter().enumerate() {
                    register(&mut cells, binding.x, binding.y + offset as u32, *leaf)?;
                }
            }
            ArchetypeKind::Ordered { .. } | ArchetypeKind::Grid { .. } => {
                return Err(BuildError::UnsupportedGridBinding);
            }
        }
        children.push(child);
    }

    for y in 0..height {
        for x in 0..width {
            if !cells.contains_key(&(x, y)) {
                return Err(BuildError::MissingGridCell { x, y });
            }
        }
    }

    let id = push_node(
        nodes,
        archetype,
        NodeKind::Composite(Composite {
            children: children.clone(),
            traversal: children.clone(),
            addressing: Addressing::Grid {
                width,
                height,
                cells,
            },
        }),
    );
    adopt(nodes, id, &children);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::builder::InventoryBuilder;

    #[test]
    fn instantiate_is_repeatable_and_independent() {
        let mut builder = InventoryBuilder::grid(3, 2).fill_with_slots();
        let archetype = builder.archetype();

        let tree_a = archetype.instantiate().unwrap();
        let mut tree_b = archetype.instantiate().unwrap();
        assert_eq!(tree_a.slot_count(), tree_b.slot_count());

        // Mutating one instance leaves the other untouched.
        let slot = tree_b.flattened_slots()[0];
        tree_b.apply(&[crate::inventory::SlotTransaction {
            slot,
            original: coffer_registry::ItemStack::empty(),
            replacement: coffer_registry::ItemStack::new(
                &coffer_registry::vanilla_items::STONE,
                9,
            ),
        }]);
        assert!(tree_a.slot(tree_a.flattened_slots()[0]).unwrap().is_empty());
    }

    #[test]
    fn grid_with_missing_cell_fails() {
        let result = InventoryBuilder::grid(2, 2)
            .bind_cell(0, 0, InventoryArchetype::default_slot())
            .bind_cell(1, 0, InventoryArchetype::default_slot())
            .bind_cell(0, 1, InventoryArchetype::default_slot())
            .build();
        assert_eq!(result.unwrap_err(), BuildError::MissingGridCell { x: 1, y: 1 });
    }

    #[test]
    fn overlapping_row_and_cell_fails() {
        // Row overlay across y=0 collides with the explicit cell at (1, 0).
        let result = InventoryBuilder::grid(3, 1)
            .bind_cell(1, 0, InventoryArchetype::default_slot())
            .bind_row(0, InventoryBuilder::row(3).archetype())
            .build();
        assert_eq!(
            result.unwrap_err(),
            BuildError::DuplicateSlotRegistration { x: 1, y: 0 }
        );
    }

    #[test]
    fn out_of_bounds_binding_fails() {
        let result = InventoryBuilder::grid(2, 1)
            .bind_row(0, InventoryBuilder::row(3).archetype())
            .build();
        assert_eq!(
            result.unwrap_err(),
            BuildError::BindingOutOfBounds {
                x: 2,
                y: 0,
                width: 2,
                height: 1,
            }
        );
    }

    #[test]
    fn rows_refuse_composite_children() {
        let nested = InventoryBuilder::ordered().archetype();
        let archetype = InventoryArchetype {
            name: None,
            kind: ArchetypeKind::Row {
                slots: vec![nested],
            },
            properties: FxHashMap::default(),
        };
        assert_eq!(archetype.instantiate().unwrap_err(), BuildError::NonSlotInLine);
    }

    #[test]
    fn zero_dimension_grid_fails() {
        assert_eq!(
            InventoryBuilder::grid(0, 3).build().unwrap_err(),
            BuildError::ZeroGridDimension
        );
    }
}
