//! # graveyards-addon: Grave Plugin Integration for Graveyards
//!
//! Connects the game-agnostic `graveyards-core` model to a server runtime
//! and a grave plugin. The host layer implements [`host::Host`] and
//! [`host::GraveApi`], forwards events to the listener and routes the
//! `/graveyards` and `/graveyardinfo` commands.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          Server runtime + grave plugin        │
//! │  ┌────────────────────────────────────────┐  │
//! │  │           graveyards-addon             │  │
//! │  │  ┌──────────┐ ┌──────────┐ ┌────────┐ │  │
//! │  │  │ Listener │ │ Commands │ │  Info  │ │  │
//! │  │  └────┬─────┘ └────┬─────┘ └───┬────┘ │  │
//! │  │       └────────────┼───────────┘      │  │
//! │  │                    ▼                  │  │
//! │  │       ┌─────────────────────────┐     │  │
//! │  │       │   AddonContext          │     │  │
//! │  │       └────────────┬────────────┘     │  │
//! │  │                    ▼                  │  │
//! │  │       ┌─────────────────────────┐     │  │
//! │  │       │   graveyards-core       │     │  │
//! │  │       └─────────────────────────┘     │  │
//! │  └────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `host`: collaborator traits and the grave creation request
//! - `events`: events the addon subscribes to, and their outcomes
//! - `context`: shared dependencies
//! - `listener`: death and grave lifecycle handling
//! - `command`: `/graveyards` administration
//! - `info`: `/graveyardinfo`
//! - `completion`: tab completion
//! - `logging`: subscriber setup
//! - `addon`: enable/disable

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod addon;
pub mod command;
pub mod completion;
pub mod context;
pub mod events;
pub mod host;
pub mod info;
pub mod listener;
pub mod logging;

pub use addon::Graveyards;
pub use command::{CommandError, CommandSender, GraveyardCommand, Reply};
pub use context::AddonContext;
pub use events::{DeathOutcome, HostEvent};
pub use listener::GraveyardListener;
