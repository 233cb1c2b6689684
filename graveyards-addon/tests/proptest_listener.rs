//! Property-Based Tests for Death Handling
//!
//! Every placed grave takes exactly one free site, whatever the site layout,
//! including sites that share a block.

mod common;

use proptest::prelude::*;
use uuid::Uuid;

use graveyards_addon::events::{DeathOutcome, PlayerDeathEvent};
use graveyards_addon::host::{ItemStack, PlayerRef};
use graveyards_core::types::{Corner, Graveyard};

use common::{Harness, pos};

fn corner() -> Corner {
    Corner {
        world: "w".to_string(),
        x: 0,
        y: 64,
        z: 0,
    }
}

fn death() -> PlayerDeathEvent {
    PlayerDeathEvent {
        player: PlayerRef::new(Uuid::new_v4(), "Victim", pos(1.0, 66.0, 1.0)),
        killer: None,
        drops: vec![ItemStack::new("COBBLESTONE", 32)],
        experience: 5,
        damage_cause: None,
    }
}

fn occupied(h: &Harness) -> usize {
    h.cache()
        .sites_for("east")
        .iter()
        .filter(|site| site.occupied)
        .count()
}

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Site offsets on a 3x3 patch around the death, so blocks repeat often.
fn arb_sites() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((0u8..3, 0u8..3), 1..8)
}

// ---------------------------------------------------------------------------
// Property: one placed grave, one newly occupied site
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn each_death_occupies_exactly_one_free_site(
        sites in arb_sites(),
        deaths in 1usize..12,
    ) {
        let h = Harness::new();
        h.store()
            .create(&Graveyard::new("east", corner(), corner()))
            .expect("create graveyard");
        for (x, z) in &sites {
            h.store()
                .add_site("east", &pos(f64::from(*x), 66.0, f64::from(*z)))
                .expect("add site");
        }
        h.cache().reload();

        let mut placed = 0;
        for _ in 0..deaths {
            let before = occupied(&h);
            let mut event = death();
            match h.listener.on_player_death(&mut event) {
                DeathOutcome::Placed { graveyard, .. } => {
                    prop_assert_eq!(graveyard, "east");
                    prop_assert_eq!(occupied(&h), before + 1);
                    placed += 1;
                }
                DeathOutcome::NoFreeSite { .. } => {
                    prop_assert_eq!(before, sites.len());
                    prop_assert_eq!(occupied(&h), before);
                }
                DeathOutcome::Ignored => prop_assert!(false, "death inside east was ignored"),
            }
            prop_assert!(event.drops.is_empty());
        }

        prop_assert_eq!(placed, deaths.min(sites.len()));
        prop_assert_eq!(h.server.graves.lock().len(), placed);

        h.cache().reload();
        prop_assert_eq!(occupied(&h), placed);
    }
}
