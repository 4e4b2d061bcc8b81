//! Inventory builders: plain configuration values with memoized archetypes.
//!
//! A builder is an ordinary value — copying one is `Clone`, no bespoke
//! copy protocol. Shape-defining mutators invalidate the memoized
//! archetype so a stale blueprint is never handed out; `build` is a pure
//! function of the archetype and may be repeated freely.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::archetype::{
    ArchetypeKind, BuildError, GridBinding, InventoryArchetype, SlotArchetype,
};
use super::slot::SlotFilter;
use super::tree::{InventoryTree, PropertyValue};

/// Builder for inventory archetypes and trees.
#[derive(Debug, Clone)]
pub struct InventoryBuilder {
    name: Option<String>,
    shape: Shape,
    properties: FxHashMap<&'static str, PropertyValue>,
    cached: Option<Arc<InventoryArchetype>>,
}

#[derive(Debug, Clone)]
enum Shape {
    Slot(SlotArchetype),
    Ordered(Vec<Arc<InventoryArchetype>>),
    Row(Vec<Arc<InventoryArchetype>>),
    Column(Vec<Arc<InventoryArchetype>>),
    Grid {
        width: u32,
        height: u32,
        bindings: Vec<GridBinding>,
    },
}

impl InventoryBuilder {
    fn with_shape(shape: Shape) -> Self {
        Self {
            name: None,
            shape,
            properties: FxHashMap::default(),
            cached: None,
        }
    }

    /// A builder for a single slot.
    #[must_use]
    pub fn slot() -> Self {
        Self::with_shape(Shape::Slot(SlotArchetype::default()))
    }

    /// A builder for an ordered group with no children yet.
    #[must_use]
    pub fn ordered() -> Self {
        Self::with_shape(Shape::Ordered(Vec::new()))
    }

    /// A builder for a row of `length` default slots.
    #[must_use]
    pub fn row(length: u32) -> Self {
        let slots = (0..length)
            .map(|_| InventoryArchetype::default_slot())
            .collect();
        Self::with_shape(Shape::Row(slots))
    }

    /// A builder for a column of `length` default slots.
    #[must_use]
    pub fn column(length: u32) -> Self {
        let slots = (0..length)
            .map(|_| InventoryArchetype::default_slot())
            .collect();
        Self::with_shape(Shape::Column(slots))
    }

    /// A builder for a `width`×`height` grid with no bindings yet.
    #[must_use]
    pub fn grid(width: u32, height: u32) -> Self {
        Self::with_shape(Shape::Grid {
            width,
            height,
            bindings: Vec::new(),
        })
    }

    fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Names the built node.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.invalidate();
        self.name = Some(name.into());
        self
    }

    /// Sets a property on the built node; children inherit it.
    #[must_use]
    pub fn property(mut self, key: &'static str, value: PropertyValue) -> Self {
        self.invalidate();
        self.properties.insert(key, value);
        self
    }

    fn slot_config(&mut self) -> Option<&mut SlotArchetype> {
        match &mut self.shape {
            Shape::Slot(config) => Some(config),
            _ => None,
        }
    }

    /// Sets the per-slot stack limit. Slot builders only.
    #[must_use]
    pub fn max_stack_size(mut self, max: i32) -> Self {
        self.invalidate();
        if let Some(config) = self.slot_config() {
            config.max_stack_size = Some(max);
        }
        self
    }

    /// Attaches an acceptance filter. Slot builders only.
    #[must_use]
    pub fn filter(mut self, filter: SlotFilter) -> Self {
        self.invalidate();
        if let Some(config) = self.slot_config() {
            config.filter = Some(filter);
        }
        self
    }

    /// Marks the slot output-only. Slot builders only.
    #[must_use]
    pub fn output_only(mut self) -> Self {
        self.invalidate();
        if let Some(config) = self.slot_config() {
            config.output_only = true;
        }
        self
    }

    /// Prefers reversed shift-click destinations. Slot builders only.
    #[must_use]
    pub fn reverse_quick_move(mut self) -> Self {
        self.invalidate();
        if let Some(config) = self.slot_config() {
            config.reverse_quick_move = true;
        }
        self
    }

    /// Appends a child archetype. Ordered builders only.
    #[must_use]
    pub fn child(mut self, archetype: Arc<InventoryArchetype>) -> Self {
        self.invalidate();
        if let Shape::Ordered(children) = &mut self.shape {
            children.push(archetype);
        }
        self
    }

    /// Appends a slot archetype to a row or column builder.
    #[must_use]
    pub fn push_slot(mut self, archetype: Arc<InventoryArchetype>) -> Self {
        self.invalidate();
        match &mut self.shape {
            Shape::Row(slots) | Shape::Column(slots) => slots.push(archetype),
            _ => {}
        }
        self
    }

    /// Binds an archetype at a grid cell. Grid builders only.
    #[must_use]
    pub fn bind_cell(mut self, x: u32, y: u32, archetype: Arc<InventoryArchetype>) -> Self {
        self.invalidate();
        if let Shape::Grid { bindings, .. } = &mut self.shape {
            bindings.push(GridBinding { x, y, archetype });
        }
        self
    }

    /// Binds a row archetype across row `y`, anchored at column 0.
    #[must_use]
    pub fn bind_row(self, y: u32, archetype: Arc<InventoryArchetype>) -> Self {
        self.bind_cell(0, y, archetype)
    }

    /// Binds a column archetype down column `x`, anchored at row 0.
    #[must_use]
    pub fn bind_column(self, x: u32, archetype: Arc<InventoryArchetype>) -> Self {
        self.bind_cell(x, 0, archetype)
    }

    /// Fills every unbound row of a grid with default slots.
    #[must_use]
    pub fn fill_with_slots(mut self) -> Self {
        self.invalidate();
        if let Shape::Grid {
            width,
            height,
            bindings,
        } = &mut self.shape
        {
            let width = *width;
            for y in 0..*height {
                let mut row = InventoryBuilder::row(width);
                bindings.push(GridBinding {
                    x: 0,
                    y,
                    archetype: row.archetype(),
                });
            }
        }
        self
    }

    /// The archetype for the current builder state, memoized.
    ///
    /// Any shape-defining mutator invalidates the memo; a stale archetype
    /// is never returned.
    pub fn archetype(&mut self) -> Arc<InventoryArchetype> {
        if let Some(cached) = &self.cached {
            return Arc::clone(cached);
        }
        let kind = match &self.shape {
            Shape::Slot(config) => ArchetypeKind::Slot(config.clone()),
            Shape::Ordered(children) => ArchetypeKind::Ordered {
                children: children.clone(),
            },
            Shape::Row(slots) => ArchetypeKind::Row {
                slots: slots.clone(),
            },
            Shape::Column(slots) => ArchetypeKind::Column {
                slots: slots.clone(),
            },
            Shape::Grid {
                width,
                height,
                bindings,
            } => ArchetypeKind::Grid {
                width: *width,
                height: *height,
                bindings: bindings.clone(),
            },
        };
        let archetype = Arc::new(InventoryArchetype {
            name: self.name.clone(),
            kind,
            properties: self.properties.clone(),
        });
        self.cached = Some(Arc::clone(&archetype));
        archetype
    }

    /// Builds a fresh inventory tree from the current state.
    pub fn build(&mut self) -> Result<InventoryTree, BuildError> {
        self.archetype().instantiate()
    }
}

/// Stock archetypes shared across the subsystem.
pub mod standard {
    use std::sync::Arc;

    use super::InventoryBuilder;
    use crate::inventory::archetype::InventoryArchetype;

    /// A generic chest: a 9×`rows` grid of plain slots.
    #[must_use]
    pub fn chest(rows: u32) -> Arc<InventoryArchetype> {
        InventoryBuilder::grid(9, rows)
            .fill_with_slots()
            .name(format!("generic_9x{rows}"))
            .archetype()
    }

    /// The 9-slot hotbar row.
    #[must_use]
    pub fn hotbar() -> Arc<InventoryArchetype> {
        InventoryBuilder::row(9).name("hotbar").archetype()
    }

    /// The 9×3 main player storage grid.
    #[must_use]
    pub fn player_main() -> Arc<InventoryArchetype> {
        InventoryBuilder::grid(9, 3)
            .fill_with_slots()
            .name("player_main")
            .archetype()
    }

    /// The full 36-slot player inventory: hotbar first, then main storage.
    #[must_use]
    pub fn player_inventory() -> Arc<InventoryArchetype> {
        InventoryBuilder::ordered()
            .child(hotbar())
            .child(player_main())
            .name("player_inventory")
            .archetype()
    }
}
