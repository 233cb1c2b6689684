//! Graveyards Benchmark Suite
//!
//! Every death runs a graveyard resolution, so lookups stay on the hot path:
//!   graveyard_resolve_50x20 ......... resolve a death against 50 graveyards
//!   graveyard_sites_for ............. copy one graveyard's sites
//!   graveyard_death_full ............ full death handling on a full graveyard

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uuid::Uuid;

use graveyards_addon::context::AddonContext;
use graveyards_addon::events::PlayerDeathEvent;
use graveyards_addon::host::{GraveApi, GraveRequest, Host, ItemStack, PlayerRef};
use graveyards_addon::listener::GraveyardListener;
use graveyards_core::cache::GraveyardCache;
use graveyards_core::config::GraveyardsConfig;
use graveyards_core::persistence::GraveyardStore;
use graveyards_core::types::{Corner, Graveyard, Position};

struct NullServer;

impl GraveApi for NullServer {
    fn create_grave(&self, request: GraveRequest) {
        black_box(request);
    }

    fn debug_message(&self, message: &str, level: u8) {
        black_box((message, level));
    }
}

impl Host for NullServer {
    fn send_message(&self, _player: Uuid, message: &str) {
        black_box(message);
    }

    fn is_empty_block(&self, _position: &Position) -> bool {
        false
    }

    fn drop_items_naturally(&self, _position: &Position, items: Vec<ItemStack>) {
        black_box(items);
    }
}

/// 50 graveyards 100 blocks apart, 20 sites each.
fn populated_cache(dir: &tempfile::TempDir) -> Arc<GraveyardCache> {
    let store = GraveyardStore::open(dir.path()).expect("open store");
    for g in 0..50 {
        let name = format!("yard{g}");
        let origin = f64::from(g) * 100.0;
        let corner = Corner {
            world: "w".to_string(),
            x: i64::from(g) * 100,
            y: 64,
            z: 0,
        };
        store
            .create(&Graveyard::new(name.clone(), corner.clone(), corner))
            .expect("create");
        for s in 0..20 {
            store
                .add_site(&name, &Position::new("w", origin + f64::from(s % 5), 65.0, f64::from(s / 5)))
                .expect("add site");
        }
    }
    let cache = Arc::new(GraveyardCache::new(Arc::new(store)));
    cache.load_all().expect("load");
    cache
}

fn bench_resolve(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = populated_cache(&dir);
    let death = Position::new("w", 2502.0, 65.0, 2.0);

    c.bench_function("graveyard_resolve_50x20", |b| {
        b.iter(|| black_box(cache.resolve(black_box(&death), 5.0)));
    });
}

fn bench_sites_for(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = populated_cache(&dir);

    c.bench_function("graveyard_sites_for", |b| {
        b.iter(|| black_box(cache.sites_for(black_box("yard25"))));
    });
}

fn bench_death_full_graveyard(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = populated_cache(&dir);
    for site in cache.sites_for("yard10") {
        cache.set_occupancy("yard10", &site.position, true);
    }
    let server = Arc::new(NullServer);
    let ctx = AddonContext::new(
        Arc::new(GraveyardsConfig::default()),
        cache,
        Arc::clone(&server) as Arc<dyn GraveApi>,
        server as Arc<dyn Host>,
    );
    let listener = GraveyardListener::new(ctx);
    let player = PlayerRef::new(Uuid::nil(), "Bench", Position::new("w", 1001.0, 65.0, 1.0));

    c.bench_function("graveyard_death_full", |b| {
        b.iter(|| {
            let mut event = PlayerDeathEvent {
                player: player.clone(),
                killer: None,
                drops: vec![ItemStack::new("DIRT", 64)],
                experience: 0,
                damage_cause: None,
            };
            black_box(listener.on_player_death(&mut event));
        });
    });
}

criterion_group!(
    benches,
    bench_resolve,
    bench_sites_for,
    bench_death_full_graveyard,
);
criterion_main!(benches);
