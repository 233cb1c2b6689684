//! Shared dependencies handed to every addon component.

use std::sync::Arc;

use graveyards_core::cache::GraveyardCache;
use graveyards_core::config::GraveyardsConfig;
use graveyards_core::persistence::GraveyardStore;
use uuid::Uuid;

use crate::host::{GraveApi, Host};

/// The cache, configuration and collaborator APIs, passed explicitly to the
/// listener and command executors. Cloning is cheap.
#[derive(Clone)]
pub struct AddonContext {
    /// Loaded configuration.
    pub config: Arc<GraveyardsConfig>,
    /// Graveyard cache (and, through it, the document store).
    pub cache: Arc<GraveyardCache>,
    /// Grave plugin API.
    pub graves: Arc<dyn GraveApi>,
    /// Server runtime API.
    pub host: Arc<dyn Host>,
}

impl std::fmt::Debug for AddonContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddonContext")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl AddonContext {
    /// Bundle the addon's dependencies.
    #[must_use]
    pub fn new(
        config: Arc<GraveyardsConfig>,
        cache: Arc<GraveyardCache>,
        graves: Arc<dyn GraveApi>,
        host: Arc<dyn Host>,
    ) -> Self {
        Self {
            config,
            cache,
            graves,
            host,
        }
    }

    /// The document store behind the cache.
    #[must_use]
    pub fn store(&self) -> &GraveyardStore {
        self.cache.store()
    }

    /// Send `message` to a player with the configured prefix.
    pub fn notify(&self, player: Uuid, message: &str) {
        let text = format!("{}{message}", self.config.messages.prefix);
        self.host.send_message(player, &text);
    }
}
