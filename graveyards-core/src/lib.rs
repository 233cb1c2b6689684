//! # Graveyards Core Library
//!
//! Game-agnostic model for graveyard zones: named regions whose deaths are
//! redirected onto predefined grave sites.
//!
//! - [`types`]: positions, corners, graveyards, grave sites
//! - [`persistence`]: one TOML document per graveyard
//! - [`cache`]: lock-guarded in-memory mirror with occupancy tracking
//! - [`config`]: `graveyards.toml`
//!
//! The host integration (events, commands, the grave plugin API) lives in
//! `graveyards-addon`.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod error;
pub mod persistence;
pub mod types;

pub use cache::GraveyardCache;
pub use config::GraveyardsConfig;
pub use error::GraveyardError;
pub use persistence::GraveyardStore;
pub use types::*;
