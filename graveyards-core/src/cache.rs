//! In-memory graveyard cache.
//!
//! Mirrors every graveyard document as `name -> ordered grave sites` for
//! lookups during gameplay events. The map sits behind a reader/writer
//! lock; loads build a fresh map outside the lock and swap it in, so a
//! reader sees either the previous snapshot or the complete new one.
//!
//! Occupancy changes update the cached site first and are then written to
//! the backing document. A failed write is logged and not rolled back: the
//! cache stays authoritative until the next successful write or reload.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::persistence::GraveyardStore;
use crate::types::{GraveSite, Position};

/// Cached grave sites for every graveyard.
#[derive(Debug)]
pub struct GraveyardCache {
    store: Arc<GraveyardStore>,
    graveyards: RwLock<HashMap<String, Vec<GraveSite>>>,
    ready: AtomicBool,
}

impl GraveyardCache {
    /// An empty cache over `store`. Nothing is read until [`Self::load_all`]
    /// or [`Self::spawn_load`] runs.
    #[must_use]
    pub fn new(store: Arc<GraveyardStore>) -> Self {
        Self {
            store,
            graveyards: RwLock::new(HashMap::new()),
            ready: AtomicBool::new(false),
        }
    }

    /// The backing document store.
    #[must_use]
    pub fn store(&self) -> &Arc<GraveyardStore> {
        &self.store
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Read every document and replace the cached map with the result.
    ///
    /// Returns the number of graveyards now cached.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the store directory cannot be listed; the
    /// cached map is left untouched in that case.
    pub fn load_all(&self) -> Result<usize> {
        info!("Loading graveyards");
        let fresh: HashMap<String, Vec<GraveSite>> = self
            .store
            .load_all()?
            .into_iter()
            .map(|graveyard| (graveyard.name, graveyard.sites))
            .collect();
        let count = fresh.len();
        *self.graveyards.write() = fresh;
        self.ready.store(true, Ordering::Release);
        info!(graveyards = count, "Loaded graveyards");
        Ok(count)
    }

    /// Run [`Self::load_all`] on a blocking worker of `runtime`.
    ///
    /// The returned handle completes when the load has finished; hosts
    /// await it before treating the cache as ready.
    pub fn spawn_load(self: &Arc<Self>, runtime: &Handle) -> JoinHandle<Result<usize>> {
        let cache = Arc::clone(self);
        runtime.spawn_blocking(move || cache.load_all())
    }

    /// Whether at least one load has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Drop the cached map and load it again.
    ///
    /// A failing load leaves the cache empty and is logged. Returns the
    /// number of graveyards cached afterwards.
    pub fn reload(&self) -> usize {
        self.graveyards.write().clear();
        match self.load_all() {
            Ok(count) => count,
            Err(e) => {
                error!(error = %e, "Graveyard reload failed; cache left empty");
                0
            }
        }
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// Sites of `name` in document order; empty if the graveyard is unknown.
    #[must_use]
    pub fn sites_for(&self, name: &str) -> Vec<GraveSite> {
        self.graveyards.read().get(name).cloned().unwrap_or_default()
    }

    /// The site of `name` at exactly `position`.
    #[must_use]
    pub fn site_by_position(&self, name: &str, position: &Position) -> Option<GraveSite> {
        self.graveyards
            .read()
            .get(name)?
            .iter()
            .find(|site| site.position == *position)
            .cloned()
    }

    /// A copy of the whole cache.
    #[must_use]
    pub fn all_graveyards(&self) -> HashMap<String, Vec<GraveSite>> {
        self.graveyards.read().clone()
    }

    /// Cached graveyard names, sorted.
    #[must_use]
    pub fn graveyard_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.graveyards.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of cached graveyards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graveyards.read().len()
    }

    /// Whether no graveyard is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graveyards.read().is_empty()
    }

    /// The graveyard `position` belongs to, if any.
    ///
    /// A graveyard matches when one of its sites is in the same world and
    /// within `radius`. When several match, the one with the nearest site
    /// wins; equal distances resolve to the lexicographically smaller name.
    #[must_use]
    pub fn resolve(&self, position: &Position, radius: f64) -> Option<String> {
        let graveyards = self.graveyards.read();
        graveyards
            .iter()
            .filter_map(|(name, sites)| {
                sites
                    .iter()
                    .filter_map(|site| site.position.distance(position))
                    .filter(|distance| *distance <= radius)
                    .map(OrderedFloat)
                    .min()
                    .map(|distance| (distance, name))
            })
            .min()
            .map(|(_, name)| name.clone())
    }

    // ------------------------------------------------------------------
    // Occupancy
    // ------------------------------------------------------------------

    /// Set the occupancy of the site of `name` at exactly `position`, then
    /// write it to the graveyard's document.
    ///
    /// When several sites share `position`, the lowest-numbered one whose
    /// flag differs is updated, matching the choice made on disk.
    ///
    /// Returns `false` (and changes nothing) when no cached site matches.
    /// Write failures are logged; the cached flag keeps the new value.
    pub fn set_occupancy(&self, name: &str, position: &Position, occupied: bool) -> bool {
        {
            let mut graveyards = self.graveyards.write();
            let site = graveyards.get_mut(name).and_then(|sites| {
                let index = sites
                    .iter()
                    .position(|site| site.position == *position && site.occupied != occupied)
                    .or_else(|| sites.iter().position(|site| site.position == *position))?;
                sites.get_mut(index)
            });
            let Some(site) = site else {
                debug!(graveyard = name, position = %position, "Grave site not found in cache");
                return false;
            };
            site.occupied = occupied;
        }

        match self.store.update_occupancy(name, position, occupied) {
            Ok(true) => {
                debug!(graveyard = name, position = %position, occupied, "Grave site occupancy updated");
            }
            Ok(false) => {
                warn!(
                    graveyard = name,
                    position = %position,
                    "Grave site missing from document; cache and disk differ until reload"
                );
            }
            Err(e) => {
                error!(
                    graveyard = name,
                    position = %position,
                    error = %e,
                    "Could not save updated graveyard file"
                );
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
