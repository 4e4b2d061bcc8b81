//! Static item type definitions.

/// A registered item type.
///
/// Item types are process-wide statics; code passes them around as
/// [`ItemTypeRef`] and compares them by identity.
#[derive(Debug, PartialEq, Eq)]
pub struct ItemType {
    /// The namespaced identifier, e.g. `minecraft:stone`.
    pub name: &'static str,
    /// The native maximum stack size for this item.
    ///
    /// Slots may restrict this further but never raise it.
    pub max_stack_size: i32,
}

/// A reference to a registered item type.
pub type ItemTypeRef = &'static ItemType;

/// Vanilla item types used by this subsystem.
///
/// The full registry is generated elsewhere; this module carries the
/// entries the container logic and its tests need, with their vanilla
/// stack limits.
pub mod vanilla_items {
    use super::ItemType;

    macro_rules! items {
        ($($ident:ident => ($name:literal, $max:literal)),* $(,)?) => {
            $(
                #[doc = concat!("`", $name, "`")]
                pub static $ident: ItemType = ItemType {
                    name: $name,
                    max_stack_size: $max,
                };
            )*
        };
    }

    items! {
        STONE => ("minecraft:stone", 64),
        COBBLESTONE => ("minecraft:cobblestone", 64),
        OAK_PLANKS => ("minecraft:oak_planks", 64),
        STICK => ("minecraft:stick", 64),
        ARROW => ("minecraft:arrow", 64),
        APPLE => ("minecraft:apple", 64),
        ENDER_PEARL => ("minecraft:ender_pearl", 16),
        SNOWBALL => ("minecraft:snowball", 16),
        EGG => ("minecraft:egg", 16),
        BUCKET => ("minecraft:bucket", 16),
        DIAMOND_SWORD => ("minecraft:diamond_sword", 1),
        IRON_PICKAXE => ("minecraft:iron_pickaxe", 1),
        SHIELD => ("minecraft:shield", 1),
        TOTEM_OF_UNDYING => ("minecraft:totem_of_undying", 1),
    }
}

static BY_NAME: phf::Map<&'static str, &'static ItemType> = phf::phf_map! {
    "minecraft:stone" => &vanilla_items::STONE,
    "minecraft:cobblestone" => &vanilla_items::COBBLESTONE,
    "minecraft:oak_planks" => &vanilla_items::OAK_PLANKS,
    "minecraft:stick" => &vanilla_items::STICK,
    "minecraft:arrow" => &vanilla_items::ARROW,
    "minecraft:apple" => &vanilla_items::APPLE,
    "minecraft:ender_pearl" => &vanilla_items::ENDER_PEARL,
    "minecraft:snowball" => &vanilla_items::SNOWBALL,
    "minecraft:egg" => &vanilla_items::EGG,
    "minecraft:bucket" => &vanilla_items::BUCKET,
    "minecraft:diamond_sword" => &vanilla_items::DIAMOND_SWORD,
    "minecraft:iron_pickaxe" => &vanilla_items::IRON_PICKAXE,
    "minecraft:shield" => &vanilla_items::SHIELD,
    "minecraft:totem_of_undying" => &vanilla_items::TOTEM_OF_UNDYING,
};

/// Looks up an item type by its namespaced identifier.
#[must_use]
pub fn by_name(name: &str) -> Option<ItemTypeRef> {
    BY_NAME.get(name).copied()
}
