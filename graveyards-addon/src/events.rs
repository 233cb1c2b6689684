//! Host events the addon subscribes to.
//!
//! The integration layer converts the server's and grave plugin's events
//! into these types and feeds them to
//! [`crate::listener::GraveyardListener`], either through the dedicated
//! handler methods or through [`HostEvent`] and `dispatch`.

use graveyards_core::types::Position;

use crate::host::{ItemStack, Killer, PlayerRef};

/// A player died.
#[derive(Debug, Clone)]
pub struct PlayerDeathEvent {
    /// The player, positioned where they died.
    pub player: PlayerRef,
    /// Who killed them, if anyone.
    pub killer: Option<Killer>,
    /// Items about to drop. Emptied when the addon takes them over.
    pub drops: Vec<ItemStack>,
    /// The player's total experience.
    pub experience: u32,
    /// Last damage cause reported by the server.
    pub damage_cause: Option<String>,
}

/// The grave plugin is about to create a grave.
#[derive(Debug, Clone)]
pub struct GraveCreateEvent {
    /// The entity the grave belongs to, if it is a player.
    pub player: Option<PlayerRef>,
    /// Set when the grave is handled by this addon.
    pub addon: bool,
}

/// A grave was looted, by hand or automatically.
#[derive(Debug, Clone)]
pub struct GraveLootEvent {
    /// Where the grave was.
    pub position: Position,
}

/// A grave exploded.
#[derive(Debug, Clone)]
pub struct GraveExplodeEvent {
    /// The grave's recorded death location.
    pub death_position: Position,
}

/// Any event the addon handles.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A player died.
    PlayerDeath(PlayerDeathEvent),
    /// A grave is being created.
    GraveCreate(GraveCreateEvent),
    /// A grave was emptied automatically.
    GraveAutoLooted(GraveLootEvent),
    /// A grave was looted by a player.
    GraveLooted(GraveLootEvent),
    /// A grave exploded.
    GraveExploded(GraveExplodeEvent),
}

impl HostEvent {
    /// The position the event is about.
    #[must_use]
    pub fn position(&self) -> Option<&Position> {
        match self {
            Self::PlayerDeath(event) => Some(&event.player.position),
            Self::GraveCreate(event) => event.player.as_ref().map(|p| &p.position),
            Self::GraveAutoLooted(event) | Self::GraveLooted(event) => Some(&event.position),
            Self::GraveExploded(event) => Some(&event.death_position),
        }
    }
}

/// What happened to a player death.
#[derive(Debug, Clone, PartialEq)]
pub enum DeathOutcome {
    /// Not in a graveyard; default grave behavior applies.
    Ignored,
    /// In a graveyard with every site taken; drops fell at the death position.
    NoFreeSite {
        /// The graveyard the player died in.
        graveyard: String,
    },
    /// A grave was placed on a free site.
    Placed {
        /// The graveyard the player died in.
        graveyard: String,
        /// The chosen site.
        site: Position,
    },
}

/// Result of [`crate::listener::GraveyardListener::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// A death was processed.
    Death(DeathOutcome),
    /// A grave creation was inspected; `true` if flagged as addon-handled.
    GraveCreate(bool),
    /// A loot or explode event; `true` if a site was freed.
    Freed(bool),
}
