//! Click type definitions for container interactions.
//!
//! Wire ids and the drag header bit layout match the vanilla client:
//! the drag phase lives in bits 0-1 of the button field and the drag kind
//! in bits 2-3.

/// The type of click action performed on a container slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClickType {
    /// Normal left or right click to pick up or place items.
    Pickup = 0,
    /// Shift-click to quickly move items between container sections.
    QuickMove = 1,
    /// Number key (1-9) to swap with a hotbar slot.
    Swap = 2,
    /// Middle-click in creative mode to clone the full stack.
    Clone = 3,
    /// Q key to throw items out of the inventory.
    Throw = 4,
    /// Drag across multiple slots to distribute items.
    QuickCraft = 5,
    /// Double-click to collect all matching items to the cursor.
    PickupAll = 6,
}

impl ClickType {
    /// Converts a wire byte to a `ClickType`.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Pickup),
            1 => Some(Self::QuickMove),
            2 => Some(Self::Swap),
            3 => Some(Self::Clone),
            4 => Some(Self::Throw),
            5 => Some(Self::QuickCraft),
            6 => Some(Self::PickupAll),
            _ => None,
        }
    }
}

/// The mouse button used in a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
}

impl MouseButton {
    /// Converts a button number to a `MouseButton`.
    #[must_use]
    pub fn from_button(button: i8) -> Self {
        if button == 0 { Self::Left } else { Self::Right }
    }
}

/// Phase of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Begin accumulating drag slots.
    Start,
    /// Add the clicked slot to the gesture.
    Add,
    /// Release: distribute and commit.
    End,
}

/// How a drag distributes the carried stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// Left drag: an even split across all slots.
    EvenSplit,
    /// Right drag: one item per slot.
    SingleItem,
    /// Middle drag: a full stack per slot, creative only.
    CloneStack,
}

impl DragKind {
    /// Whether this drag kind is allowed for the player.
    #[must_use]
    pub fn is_allowed(self, has_infinite_materials: bool) -> bool {
        match self {
            Self::EvenSplit | Self::SingleItem => true,
            Self::CloneStack => has_infinite_materials,
        }
    }
}

/// The decoded button field of a drag (quick-craft) click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragHeader {
    /// The gesture phase.
    pub phase: DragPhase,
    /// The distribution kind.
    pub kind: DragKind,
}

impl DragHeader {
    /// Decodes a button field; `None` for malformed headers.
    #[must_use]
    pub fn parse(button: i8) -> Option<Self> {
        let header = i32::from(button);
        let phase = match header & 3 {
            0 => DragPhase::Start,
            1 => DragPhase::Add,
            2 => DragPhase::End,
            _ => return None,
        };
        let kind = match (header >> 2) & 3 {
            0 => DragKind::EvenSplit,
            1 => DragKind::SingleItem,
            2 => DragKind::CloneStack,
            _ => return None,
        };
        Some(Self { phase, kind })
    }

    /// Encodes back into a button field.
    #[must_use]
    pub fn encode(self) -> i8 {
        let phase_bits = match self.phase {
            DragPhase::Start => 0,
            DragPhase::Add => 1,
            DragPhase::End => 2,
        };
        let kind_bits = match self.kind {
            DragKind::EvenSplit => 0,
            DragKind::SingleItem => 1,
            DragKind::CloneStack => 2,
        };
        (phase_bits | (kind_bits << 2)) as i8
    }
}
