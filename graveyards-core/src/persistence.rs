//! File-backed persistence for graveyards.
//!
//! Each graveyard is one TOML document under the store root, named after
//! the graveyard:
//!
//! ```toml
//! name = "east"
//!
//! [pos1]
//! world = "w"
//! x = 0
//! y = 65
//! z = 0
//!
//! [pos2]
//! world = "w"
//! x = 10
//! y = 65
//! z = 10
//!
//! [gravesite.1]
//! world = "w"
//! x = 5.0
//! y = 66.0
//! z = 5.0
//! occupied = false
//! ```
//!
//! Grave-site keys are 1-based sequence numbers. They are never renumbered:
//! removing site 2 of 3 leaves sites 1 and 3 addressable as before.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{GraveyardError, Result};
use crate::types::{Corner, GraveSite, Graveyard, Position, is_valid_name};

const EXTENSION: &str = "toml";

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

/// On-disk shape of a graveyard document.
///
/// Every field is optional on read so that hand-edited or partially written
/// documents can be reported and skipped instead of failing a whole load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraveyardDocument {
    /// Graveyard name; documents without one are skipped on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// First corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos1: Option<Corner>,
    /// Second corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos2: Option<Corner>,
    /// Grave sites keyed by sequence number.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub gravesite: BTreeMap<String, SiteRecord>,
}

/// One `gravesite.<n>` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteRecord {
    /// World identifier; entries without one are skipped on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world: Option<String>,
    /// X coordinate.
    #[serde(default)]
    pub x: f64,
    /// Y coordinate.
    #[serde(default)]
    pub y: f64,
    /// Z coordinate.
    #[serde(default)]
    pub z: f64,
    /// Occupancy flag.
    #[serde(default)]
    pub occupied: bool,
}

impl SiteRecord {
    fn position(&self) -> Option<Position> {
        self.world
            .as_ref()
            .map(|world| Position::new(world.clone(), self.x, self.y, self.z))
    }
}

impl GraveyardDocument {
    /// A fresh document for a newly created graveyard.
    #[must_use]
    pub fn for_graveyard(graveyard: &Graveyard) -> Self {
        Self {
            name: Some(graveyard.name().to_string()),
            pos1: Some(graveyard.corner1().clone()),
            pos2: Some(graveyard.corner2().clone()),
            gravesite: BTreeMap::new(),
        }
    }

    /// Sequence numbers present in the document, ascending.
    #[must_use]
    pub fn site_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self
            .gravesite
            .keys()
            .filter_map(|key| key.parse().ok())
            .collect();
        numbers.sort_unstable();
        numbers
    }

    /// Grave sites in ascending sequence-number order.
    ///
    /// Entries with a non-numeric key or no world are skipped with a warning.
    #[must_use]
    pub fn sites(&self, source: &str) -> Vec<(u32, GraveSite)> {
        let mut sites = Vec::with_capacity(self.gravesite.len());
        for (key, record) in &self.gravesite {
            let Ok(number) = key.parse::<u32>() else {
                warn!(file = source, key = %key, "Skipping grave site with non-numeric key");
                continue;
            };
            let Some(position) = record.position() else {
                warn!(file = source, site = number, "World not set for grave site");
                continue;
            };
            sites.push((
                number,
                GraveSite {
                    position,
                    occupied: record.occupied,
                },
            ));
        }
        sites.sort_by_key(|(number, _)| *number);
        sites
    }

    /// The number the next appended site receives.
    ///
    /// One past the highest existing number, so a new site never takes the
    /// number of a surviving one.
    #[must_use]
    pub fn next_site_number(&self) -> u32 {
        self.site_numbers().last().map_or(1, |n| n + 1)
    }

    /// Append a free site at `position`, returning its sequence number.
    pub fn push_site(&mut self, position: &Position) -> u32 {
        let number = self.next_site_number();
        self.gravesite.insert(
            number.to_string(),
            SiteRecord {
                world: Some(position.world.clone()),
                x: position.x,
                y: position.y,
                z: position.z,
                occupied: false,
            },
        );
        number
    }

    /// Remove the site with the given number. Returns `false` if absent.
    pub fn remove_site(&mut self, number: u32) -> bool {
        let key = self
            .gravesite
            .keys()
            .find(|key| key.parse::<u32>().ok() == Some(number))
            .cloned();
        key.is_some_and(|key| self.gravesite.remove(&key).is_some())
    }

    /// Keys of the entries at `position`, in ascending sequence order.
    fn keys_at(&self, position: &Position) -> Vec<(u32, String)> {
        let mut keys: Vec<(u32, String)> = self
            .gravesite
            .iter()
            .filter(|(_, record)| record.position().as_ref() == Some(position))
            .filter_map(|(key, _)| key.parse().ok().map(|n| (n, key.clone())))
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Number of the lowest-numbered site at exactly `position`.
    #[must_use]
    pub fn site_number_at(&self, position: &Position) -> Option<u32> {
        self.keys_at(position).first().map(|(number, _)| *number)
    }

    /// Set the occupancy of a site at `position`.
    ///
    /// Sites are visited in sequence order; the first one whose flag differs
    /// from `occupied` is updated, so each call flips at most one site.
    /// Returns `false` if no entry sits at `position`.
    pub fn set_occupied(&mut self, position: &Position, occupied: bool) -> bool {
        let keys = self.keys_at(position);
        let target = keys
            .iter()
            .find(|(_, key)| self.gravesite.get(key).is_some_and(|r| r.occupied != occupied))
            .or_else(|| keys.first());
        let Some((_, key)) = target else {
            return false;
        };
        if let Some(record) = self.gravesite.get_mut(key) {
            record.occupied = occupied;
        }
        true
    }
}

/// A graveyard read from disk, ready for the cache.
#[derive(Debug, Clone)]
pub struct LoadedGraveyard {
    /// Name from the document's `name` field.
    pub name: String,
    /// Sites in ascending sequence-number order.
    pub sites: Vec<GraveSite>,
}

// ---------------------------------------------------------------------------
// GraveyardStore
// ---------------------------------------------------------------------------

/// Directory of graveyard documents.
///
/// # Usage
///
/// ```no_run
/// # use graveyards_core::persistence::GraveyardStore;
/// # use graveyards_core::types::{Corner, Graveyard, Position};
/// let store = GraveyardStore::open("plugins/Graveyards/Graveyards")?;
/// let corner = Corner::from(&Position::new("world", 0.0, 64.0, 0.0));
/// store.create(&Graveyard::new("east", corner.clone(), corner))?;
/// let number = store.add_site("east", &Position::new("world", 5.0, 66.0, 5.0))?;
/// assert_eq!(number, 1);
/// # Ok::<(), graveyards_core::error::GraveyardError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GraveyardStore {
    root: PathBuf,
}

impl GraveyardStore {
    /// Open (or create) the document directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`GraveyardError::Io`] if the directory cannot be created.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        info!(path = %root.display(), "Graveyard store opened");
        Ok(Self { root })
    }

    /// The directory holding the documents.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document for `name` (whether or not it exists).
    #[must_use]
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{EXTENSION}"))
    }

    /// Whether a document exists for `name`.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        is_valid_name(name) && self.document_path(name).is_file()
    }

    fn checked_path(&self, name: &str) -> Result<PathBuf> {
        if is_valid_name(name) {
            Ok(self.document_path(name))
        } else {
            Err(GraveyardError::InvalidName(name.to_string()))
        }
    }

    fn existing_path(&self, name: &str) -> Result<PathBuf> {
        let path = self.checked_path(name)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(GraveyardError::GraveyardNotFound(name.to_string()))
        }
    }

    // ------------------------------------------------------------------
    // Core CRUD
    // ------------------------------------------------------------------

    /// Write the document for a new graveyard.
    ///
    /// # Errors
    ///
    /// [`GraveyardError::InvalidName`] for unusable names,
    /// [`GraveyardError::GraveyardExists`] if a document is already present,
    /// or an I/O / serialization error.
    pub fn create(&self, graveyard: &Graveyard) -> Result<()> {
        let path = self.checked_path(graveyard.name())?;
        if path.exists() {
            return Err(GraveyardError::GraveyardExists(graveyard.name().to_string()));
        }
        write_document(&path, &GraveyardDocument::for_graveyard(graveyard))?;
        info!(
            graveyard = graveyard.name(),
            pos1 = %graveyard.corner1(),
            pos2 = %graveyard.corner2(),
            "Graveyard created"
        );
        Ok(())
    }

    /// Read the document for `name`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// [`GraveyardError::Parse`] if the document is malformed, or an I/O error.
    pub fn load(&self, name: &str) -> Result<Option<GraveyardDocument>> {
        let path = self.checked_path(name)?;
        if !path.is_file() {
            return Ok(None);
        }
        read_document(&path).map(Some)
    }

    /// Overwrite the document for `name`.
    ///
    /// # Errors
    ///
    /// Returns an I/O or serialization error.
    pub fn save(&self, name: &str, document: &GraveyardDocument) -> Result<()> {
        let path = self.checked_path(name)?;
        write_document(&path, document)
    }

    /// Delete the document for `name`. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns [`GraveyardError::Io`] if the file exists but cannot be removed.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.checked_path(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!(graveyard = name, "Graveyard deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Names of all documents in the store (file stems), sorted.
    ///
    /// # Errors
    ///
    /// Returns [`GraveyardError::Io`] if the directory cannot be read.
    pub fn list_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .document_files()?
            .iter()
            .filter_map(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    fn document_files(&self) -> Result<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Read every document in the store.
    ///
    /// Malformed documents and documents without a `name` are skipped with a
    /// warning. An empty or missing directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`GraveyardError::Io`] only if the directory itself cannot be
    /// listed.
    pub fn load_all(&self) -> Result<Vec<LoadedGraveyard>> {
        let start = Instant::now();
        let files = self.document_files()?;
        if files.is_empty() {
            info!(path = %self.root.display(), "No graveyard files found");
            return Ok(Vec::new());
        }

        let mut loaded = Vec::with_capacity(files.len());
        for path in files {
            let file = path.display().to_string();
            let document = match read_document(&path) {
                Ok(document) => document,
                Err(e) => {
                    warn!(file = %file, error = %e, "Skipping unreadable graveyard file");
                    continue;
                }
            };
            let Some(name) = document.name.clone() else {
                warn!(file = %file, "Graveyard name not found in file");
                continue;
            };
            let sites: Vec<GraveSite> = document
                .sites(&file)
                .into_iter()
                .map(|(number, site)| {
                    debug!(
                        graveyard = %name,
                        site = number,
                        position = %site.position,
                        occupied = site.occupied,
                        "Loaded grave site"
                    );
                    site
                })
                .collect();
            loaded.push(LoadedGraveyard { name, sites });
        }

        debug!(
            graveyards = loaded.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Read graveyard documents"
        );
        Ok(loaded)
    }

    // ------------------------------------------------------------------
    // Grave sites
    // ------------------------------------------------------------------

    /// Append a free grave site to `name`, returning its sequence number.
    ///
    /// # Errors
    ///
    /// [`GraveyardError::GraveyardNotFound`] if the document does not exist,
    /// or an I/O / parse / serialization error.
    pub fn add_site(&self, name: &str, position: &Position) -> Result<u32> {
        let path = self.existing_path(name)?;
        let mut document = read_document(&path)?;
        let number = document.push_site(position);
        write_document(&path, &document)?;
        info!(graveyard = name, site = number, position = %position, "Grave site added");
        Ok(number)
    }

    /// Remove grave site `number` from `name`. Returns `false` if the entry
    /// does not exist.
    ///
    /// # Errors
    ///
    /// [`GraveyardError::GraveyardNotFound`] if the document does not exist,
    /// or an I/O / parse / serialization error.
    pub fn remove_site(&self, name: &str, number: u32) -> Result<bool> {
        let path = self.existing_path(name)?;
        let mut document = read_document(&path)?;
        if !document.remove_site(number) {
            return Ok(false);
        }
        write_document(&path, &document)?;
        info!(graveyard = name, site = number, "Grave site removed");
        Ok(true)
    }

    /// Sequence numbers of the sites in `name`; empty if there is no document.
    ///
    /// # Errors
    ///
    /// Returns a parse or I/O error for unreadable documents.
    pub fn site_numbers(&self, name: &str) -> Result<Vec<u32>> {
        Ok(self
            .load(name)?
            .map(|document| document.site_numbers())
            .unwrap_or_default())
    }

    /// Number of the site of `name` at exactly `position`, if any.
    ///
    /// # Errors
    ///
    /// [`GraveyardError::GraveyardNotFound`] if the document does not exist,
    /// or an I/O / parse error.
    pub fn site_at(&self, name: &str, position: &Position) -> Result<Option<u32>> {
        let path = self.existing_path(name)?;
        Ok(read_document(&path)?.site_number_at(position))
    }

    /// Write the occupancy flag of the site at `position` in `name`.
    ///
    /// Re-reads the document and matches the entry by position equality.
    /// Returns `false` if no entry matches (nothing is written).
    ///
    /// # Errors
    ///
    /// [`GraveyardError::GraveyardNotFound`] if the document does not exist,
    /// or an I/O / parse / serialization error.
    pub fn update_occupancy(&self, name: &str, position: &Position, occupied: bool) -> Result<bool> {
        let path = self.existing_path(name)?;
        let mut document = read_document(&path)?;
        if !document.set_occupied(position, occupied) {
            return Ok(false);
        }
        write_document(&path, &document)?;
        debug!(graveyard = name, position = %position, occupied, "Occupancy written");
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

fn read_document(path: &Path) -> Result<GraveyardDocument> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| GraveyardError::Parse {
        file: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Write through a sibling temp file and rename, so a failed write never
/// leaves a truncated document behind.
fn write_document(path: &Path, document: &GraveyardDocument) -> Result<()> {
    let content = toml::to_string(document)?;
    let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
