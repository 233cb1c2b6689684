//! Addon lifecycle: wiring on enable, shutdown on disable.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use graveyards_core::cache::GraveyardCache;
use graveyards_core::config::GraveyardsConfig;
use graveyards_core::error::Result;
use graveyards_core::persistence::GraveyardStore;

use crate::command::GraveyardCommand;
use crate::context::AddonContext;
use crate::host::{GraveApi, Host};
use crate::info::GraveyardInfoCommand;
use crate::listener::GraveyardListener;

/// Configuration file name inside the addon data folder.
pub const CONFIG_FILE: &str = "graveyards.toml";

/// Read `graveyards.toml` from `data_dir`, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(data_dir: &Path) -> Result<GraveyardsConfig> {
    let path = data_dir.join(CONFIG_FILE);
    if path.is_file() {
        GraveyardsConfig::from_file(&path)
    } else {
        info!(path = %path.display(), "No config file, using defaults");
        Ok(GraveyardsConfig::default())
    }
}

/// The running addon: listener, commands and the shared context.
#[derive(Debug)]
pub struct Graveyards {
    ctx: AddonContext,
    listener: GraveyardListener,
    command: GraveyardCommand,
    info: GraveyardInfoCommand,
}

impl Graveyards {
    /// Open the graveyard store under `data_dir`, build every component and
    /// start loading the cache on `runtime`.
    ///
    /// The returned handle resolves to the number of graveyards loaded.
    /// Events that arrive before it completes see an empty cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created.
    pub fn enable(
        data_dir: &Path,
        config: GraveyardsConfig,
        graves: Arc<dyn GraveApi>,
        host: Arc<dyn Host>,
        runtime: &Handle,
    ) -> Result<(Self, JoinHandle<Result<usize>>)> {
        let root: PathBuf = data_dir.join(&config.storage.directory);
        let store = Arc::new(GraveyardStore::open(&root)?);
        let cache = Arc::new(GraveyardCache::new(store));

        if !config.general.enabled {
            warn!("Graveyards disabled by configuration; events will be ignored");
        }

        let ctx = AddonContext::new(Arc::new(config), Arc::clone(&cache), graves, host);
        let addon = Self {
            listener: GraveyardListener::new(ctx.clone()),
            command: GraveyardCommand::new(ctx.clone()),
            info: GraveyardInfoCommand::new(ctx.clone()),
            ctx,
        };
        let load = cache.spawn_load(runtime);

        info!(path = %root.display(), "Graveyards enabled");
        Ok((addon, load))
    }

    /// Log shutdown. Occupancy is written as it changes, so nothing is
    /// flushed here.
    pub fn disable(self) {
        info!(graveyards = self.ctx.cache.len(), "Graveyards disabled");
    }

    /// Shared context.
    #[must_use]
    pub fn context(&self) -> &AddonContext {
        &self.ctx
    }

    /// Death and grave lifecycle subscriber.
    #[must_use]
    pub fn listener(&self) -> &GraveyardListener {
        &self.listener
    }

    /// `/graveyards` executor.
    #[must_use]
    pub fn command(&self) -> &GraveyardCommand {
        &self.command
    }

    /// `/graveyardinfo` executor.
    #[must_use]
    pub fn info(&self) -> &GraveyardInfoCommand {
        &self.info
    }
}
