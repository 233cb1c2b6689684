//! Recording fakes for the host and grave plugin.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;

use graveyards_addon::command::{CommandSender, GraveyardCommand};
use graveyards_addon::context::AddonContext;
use graveyards_addon::host::{GraveApi, GraveRequest, Host, ItemStack, PlayerRef};
use graveyards_addon::info::GraveyardInfoCommand;
use graveyards_addon::listener::GraveyardListener;
use graveyards_core::cache::GraveyardCache;
use graveyards_core::config::GraveyardsConfig;
use graveyards_core::persistence::GraveyardStore;
use graveyards_core::types::Position;

/// Records every call; blocks listed in `air` are empty space.
#[derive(Default)]
pub struct FakeServer {
    pub graves: Mutex<Vec<GraveRequest>>,
    pub debug: Mutex<Vec<(String, u8)>>,
    pub messages: Mutex<Vec<(Uuid, String)>>,
    pub dropped: Mutex<Vec<(Position, Vec<ItemStack>)>>,
    pub air: Mutex<HashSet<(i64, i64, i64)>>,
}

impl FakeServer {
    pub fn set_air(&self, x: i64, y: i64, z: i64) {
        self.air.lock().insert((x, y, z));
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages.lock().last().map(|(_, text)| text.clone())
    }
}

impl GraveApi for FakeServer {
    fn create_grave(&self, request: GraveRequest) {
        self.graves.lock().push(request);
    }

    fn debug_message(&self, message: &str, level: u8) {
        self.debug.lock().push((message.to_string(), level));
    }
}

impl Host for FakeServer {
    fn send_message(&self, player: Uuid, message: &str) {
        self.messages.lock().push((player, message.to_string()));
    }

    fn is_empty_block(&self, position: &Position) -> bool {
        self.air
            .lock()
            .contains(&(position.block_x(), position.block_y(), position.block_z()))
    }

    fn drop_items_naturally(&self, position: &Position, items: Vec<ItemStack>) {
        self.dropped.lock().push((position.clone(), items));
    }
}

/// A fully wired addon over a temporary store.
pub struct Harness {
    pub dir: tempfile::TempDir,
    pub server: Arc<FakeServer>,
    pub ctx: AddonContext,
    pub listener: GraveyardListener,
    pub command: GraveyardCommand,
    pub info: GraveyardInfoCommand,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(GraveyardsConfig::default())
    }

    pub fn with_config(config: GraveyardsConfig) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx_dir: &Path = dir.path();
        let store = GraveyardStore::open(ctx_dir.join(&config.storage.directory))
            .expect("open store");
        let cache = Arc::new(GraveyardCache::new(Arc::new(store)));
        cache.load_all().expect("initial load");

        let server = Arc::new(FakeServer::default());
        let ctx = AddonContext::new(
            Arc::new(config),
            cache,
            Arc::clone(&server) as Arc<dyn GraveApi>,
            Arc::clone(&server) as Arc<dyn Host>,
        );
        Self {
            listener: GraveyardListener::with_rng(ctx.clone(), StdRng::seed_from_u64(42)),
            command: GraveyardCommand::new(ctx.clone()),
            info: GraveyardInfoCommand::new(ctx.clone()),
            dir,
            server,
            ctx,
        }
    }

    pub fn cache(&self) -> &GraveyardCache {
        &self.ctx.cache
    }

    pub fn store(&self) -> &GraveyardStore {
        self.ctx.store()
    }
}

pub fn pos(x: f64, y: f64, z: f64) -> Position {
    Position::new("w", x, y, z)
}

pub fn admin_at(x: f64, y: f64, z: f64) -> CommandSender {
    CommandSender::Player(PlayerRef::new(
        Uuid::from_u128(0xad),
        "Admin",
        pos(x, y, z),
    ))
}
