//! Death and grave lifecycle handling.
//!
//! A player who dies near a graveyard's sites gets their grave placed on a
//! random free site of that graveyard. Looting or exploding the grave frees
//! the site again.
//!
//! ```text
//!   death ──► resolve graveyard ──► none ─────────────► Ignored
//!                    │
//!                    ▼
//!              free sites? ──► none ──► drop items ───► NoFreeSite
//!                    │
//!                    ▼
//!   pick random ─► mark occupied ─► create grave ─────► Placed
//! ```

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, trace};

use graveyards_core::types::{GraveSite, Position};

use crate::context::AddonContext;
use crate::events::{
    DeathOutcome, GraveCreateEvent, GraveExplodeEvent, GraveLootEvent, Handled, HostEvent,
    PlayerDeathEvent,
};
use crate::host::{DEFAULT_DAMAGE_CAUSE, GraveRequest};

/// Event subscriber for deaths and grave lifecycle events.
#[derive(Debug)]
pub struct GraveyardListener {
    ctx: AddonContext,
    rng: Mutex<StdRng>,
}

impl GraveyardListener {
    /// A listener with an entropy-seeded site picker.
    #[must_use]
    pub fn new(ctx: AddonContext) -> Self {
        Self::with_rng(ctx, StdRng::from_entropy())
    }

    /// A listener with a caller-supplied site picker (for reproducible runs).
    #[must_use]
    pub fn with_rng(ctx: AddonContext, rng: StdRng) -> Self {
        Self {
            ctx,
            rng: Mutex::new(rng),
        }
    }

    fn enabled(&self) -> bool {
        self.ctx.config.general.enabled
    }

    fn graveyard_at(&self, position: &Position) -> Option<String> {
        self.ctx
            .cache
            .resolve(position, self.ctx.config.placement.radius)
    }

    /// Route any host event to its handler.
    pub fn dispatch(&self, event: &mut HostEvent) -> Handled {
        if let Some(position) = event.position() {
            trace!(position = %position, "Dispatching host event");
        }
        match event {
            HostEvent::PlayerDeath(e) => Handled::Death(self.on_player_death(e)),
            HostEvent::GraveCreate(e) => Handled::GraveCreate(self.on_grave_create(e)),
            HostEvent::GraveAutoLooted(e) => Handled::Freed(self.on_grave_auto_looted(e)),
            HostEvent::GraveLooted(e) => Handled::Freed(self.on_grave_looted(e)),
            HostEvent::GraveExploded(e) => Handled::Freed(self.on_grave_exploded(e)),
        }
    }

    /// Place the grave of a player who died in a graveyard.
    ///
    /// Takes the event's drops when a grave is placed, and drops them at the
    /// death position when the graveyard is full. Outside graveyards the
    /// event is left untouched.
    pub fn on_player_death(&self, event: &mut PlayerDeathEvent) -> DeathOutcome {
        if !self.enabled() {
            return DeathOutcome::Ignored;
        }
        let death_position = event.player.position.clone();
        let Some(graveyard) = self.graveyard_at(&death_position) else {
            return DeathOutcome::Ignored;
        };

        let free: Vec<GraveSite> = self
            .ctx
            .cache
            .sites_for(&graveyard)
            .into_iter()
            .filter(|site| !site.occupied)
            .collect();
        let chosen = free.choose(&mut *self.rng.lock()).cloned();

        let Some(site) = chosen else {
            self.ctx.notify(
                event.player.id,
                &format!("No available grave sites found in the graveyard {graveyard}"),
            );
            self.ctx.graves.debug_message(
                &format!(
                    "No available grave sites for player {} in graveyard {graveyard}",
                    event.player.name
                ),
                2,
            );
            let drops = std::mem::take(&mut event.drops);
            if !drops.is_empty() {
                self.ctx.host.drop_items_naturally(&death_position, drops);
            }
            info!(player = %event.player.name, graveyard = %graveyard, "Graveyard full");
            return DeathOutcome::NoFreeSite { graveyard };
        };

        self.ctx.cache.set_occupancy(&graveyard, &site.position, true);

        let protection = &self.ctx.config.protection;
        let request = GraveRequest {
            player: event.player.clone(),
            killer: event.killer.as_ref().map(|k| k.id),
            killer_kind: event.killer.as_ref().map(|k| k.kind.clone()),
            position: site.position.clone(),
            equipment: std::collections::HashMap::new(),
            drops: std::mem::take(&mut event.drops),
            experience: event.experience,
            time_alive_remaining: None,
            damage_cause: event
                .damage_cause
                .clone()
                .unwrap_or_else(|| DEFAULT_DAMAGE_CAUSE.to_string()),
            protection: protection.enabled,
            protection_time: protection.duration(),
        };
        self.ctx.graves.create_grave(request);

        self.ctx.notify(
            event.player.id,
            &format!("Your grave has been created in the graveyard {graveyard}"),
        );
        self.ctx.graves.debug_message(
            &format!(
                "Grave created for player {} in graveyard {graveyard} at location {}",
                event.player.name, site.position
            ),
            2,
        );
        info!(
            player = %event.player.name,
            graveyard = %graveyard,
            site = %site.position,
            "Grave placed in graveyard"
        );

        DeathOutcome::Placed {
            graveyard,
            site: site.position,
        }
    }

    /// Flag graves created inside a graveyard as handled by the addon.
    pub fn on_grave_create(&self, event: &mut GraveCreateEvent) -> bool {
        if !self.enabled() {
            return false;
        }
        let Some(player) = event.player.as_ref() else {
            return false;
        };
        let Some(graveyard) = self.graveyard_at(&player.position) else {
            return false;
        };
        event.addon = true;
        self.ctx.graves.debug_message(
            &format!("Grave created at {} in graveyard {graveyard}", player.position),
            2,
        );
        true
    }

    /// Free the site of an automatically emptied grave.
    pub fn on_grave_auto_looted(&self, event: &GraveLootEvent) -> bool {
        self.free_site_at(&event.position, "auto-looted")
    }

    /// Free the site of a looted grave.
    pub fn on_grave_looted(&self, event: &GraveLootEvent) -> bool {
        self.free_site_at(&event.position, "looted")
    }

    /// Free the site of an exploded grave.
    pub fn on_grave_exploded(&self, event: &GraveExplodeEvent) -> bool {
        self.free_site_at(&event.death_position, "exploded")
    }

    fn free_site_at(&self, position: &Position, what: &str) -> bool {
        if !self.enabled() {
            return false;
        }
        let Some(graveyard) = self.graveyard_at(position) else {
            return false;
        };
        if self.ctx.cache.site_by_position(&graveyard, position).is_none() {
            debug!(graveyard = %graveyard, position = %position, "No grave site at grave location");
            return false;
        }
        self.ctx.cache.set_occupancy(&graveyard, position, false);
        self.ctx.graves.debug_message(
            &format!("Grave {what} at {position} in graveyard {graveyard}"),
            2,
        );
        true
    }
}
