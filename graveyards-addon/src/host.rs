//! Collaborator interfaces implemented by the host-integration layer.
//!
//! The addon never talks to the server runtime or the grave plugin
//! directly. The integration layer implements [`Host`] and [`GraveApi`]
//! and hands them to [`crate::context::AddonContext`].

use std::collections::HashMap;
use std::time::Duration;

use graveyards_core::types::Position;
use uuid::Uuid;

/// A player as seen by the addon at the moment of an event or command.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRef {
    /// Stable player id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Current position.
    pub position: Position,
}

impl PlayerRef {
    /// Create a player reference.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
        }
    }
}

/// The entity that killed a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Killer {
    /// Entity id.
    pub id: Uuid,
    /// Entity kind, e.g. `ZOMBIE` or `PLAYER`.
    pub kind: String,
}

/// An item stack dropped on death.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemStack {
    /// Material identifier.
    pub material: String,
    /// Stack size.
    pub amount: u32,
}

impl ItemStack {
    /// Create an item stack.
    #[must_use]
    pub fn new(material: impl Into<String>, amount: u32) -> Self {
        Self {
            material: material.into(),
            amount,
        }
    }
}

/// Equipment slots a grave can restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipmentSlot {
    /// Helmet.
    Head,
    /// Chestplate.
    Chest,
    /// Leggings.
    Legs,
    /// Boots.
    Feet,
    /// Main hand.
    MainHand,
    /// Off hand.
    OffHand,
}

/// Damage cause used when the host does not report one.
pub const DEFAULT_DAMAGE_CAUSE: &str = "CUSTOM";

/// Everything the grave plugin needs to create a grave.
#[derive(Debug, Clone, PartialEq)]
pub struct GraveRequest {
    /// Owner of the grave.
    pub player: PlayerRef,
    /// Killer entity, if any.
    pub killer: Option<Uuid>,
    /// Killer entity kind, if any.
    pub killer_kind: Option<String>,
    /// Where the grave is placed.
    pub position: Position,
    /// Starting equipment.
    pub equipment: HashMap<EquipmentSlot, ItemStack>,
    /// Items stored in the grave.
    pub drops: Vec<ItemStack>,
    /// Experience stored in the grave.
    pub experience: u32,
    /// Remaining lifetime; `None` means the grave never expires.
    pub time_alive_remaining: Option<Duration>,
    /// Damage cause reported to the grave plugin.
    pub damage_cause: String,
    /// Whether the grave is protected.
    pub protection: bool,
    /// Protection length; `None` means unlimited.
    pub protection_time: Option<Duration>,
}

/// The grave plugin's API surface.
pub trait GraveApi: Send + Sync {
    /// Create a grave. Fire-and-forget: the plugin reports nothing back.
    fn create_grave(&self, request: GraveRequest);

    /// The plugin's debug sink. Higher levels are more verbose.
    fn debug_message(&self, message: &str, level: u8) {
        tracing::debug!(debug_level = level, "{message}");
    }
}

/// The server runtime's API surface.
pub trait Host: Send + Sync {
    /// Send a chat message to a player.
    fn send_message(&self, player: Uuid, message: &str);

    /// Whether the block at `position` is empty space (air).
    fn is_empty_block(&self, position: &Position) -> bool;

    /// Drop items into the world at `position` as if they fell naturally.
    fn drop_items_naturally(&self, position: &Position, items: Vec<ItemStack>);
}
