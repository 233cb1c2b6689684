//! `/graveyards`: administrative commands.
//!
//! ```text
//! /graveyards pos1 | pos2
//! /graveyards create <name>
//! /graveyards addsite <name>
//! /graveyards delete <name>
//! /graveyards removesite <name> <number>
//! ```
//!
//! Every structural change is written to the graveyard's document and
//! followed by a full cache reload.

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use graveyards_core::error::GraveyardError;
use graveyards_core::types::{Corner, Graveyard};

use crate::completion;
use crate::context::AddonContext;
use crate::host::PlayerRef;

/// Who issued a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandSender {
    /// The server console.
    Console,
    /// An in-game player.
    Player(PlayerRef),
}

impl CommandSender {
    /// The issuing player, if any.
    #[must_use]
    pub fn player(&self) -> Option<&PlayerRef> {
        match self {
            Self::Console => None,
            Self::Player(player) => Some(player),
        }
    }

    /// Deliver a line of output to the sender.
    pub fn reply(&self, ctx: &AddonContext, message: &str) {
        match self {
            Self::Console => info!(target: "graveyards::console", "{message}"),
            Self::Player(player) => ctx.notify(player.id, message),
        }
    }
}

/// A command the issuer got wrong, or one that failed.
///
/// The `Display` text is what the issuer sees.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Console tried a player-only command.
    #[error("This command can only be used by players.")]
    PlayersOnly,

    /// Missing arguments.
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// Unrecognised verb.
    #[error("Unknown subcommand. Use /graveyards <pos1|pos2|create|addsite|delete|removesite>")]
    UnknownSubcommand(String),

    /// `create` without both corners.
    #[error("Please set both positions (pos1 and pos2) before creating a graveyard.")]
    MissingCorners,

    /// Name unusable as a graveyard.
    #[error("{0} is not a valid graveyard name.")]
    InvalidName(String),

    /// Duplicate graveyard.
    #[error("A graveyard with the name {0} already exists.")]
    AlreadyExists(String),

    /// Unknown graveyard.
    #[error("Graveyard {0} does not exist.")]
    NotFound(String),

    /// `addsite` over empty space.
    #[error("Please stand on solid ground to add a grave site.")]
    NotOnGround,

    /// Site number did not parse.
    #[error("Site number must be an integer.")]
    NotANumber(String),

    /// Unknown site number.
    #[error("No grave site found with number {number} in graveyard {name}.")]
    SiteNotFound {
        /// Graveyard name.
        name: String,
        /// Requested number.
        number: i64,
    },

    /// `addsite` on a block that already holds a site.
    #[error("Grave site {number} of graveyard {name} already occupies this block.")]
    SiteExists {
        /// Graveyard name.
        name: String,
        /// Number of the existing site.
        number: u32,
    },

    /// The store failed; details are in the server log.
    #[error("Failed to {action}. Please check the server logs.")]
    Storage {
        /// What was being attempted.
        action: &'static str,
        /// Underlying error.
        #[source]
        source: GraveyardError,
    },
}

/// A successful `/graveyards` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `pos1`/`pos2` recorded.
    CornerSet {
        /// 1 or 2.
        which: u8,
        /// The recorded corner.
        corner: Corner,
    },
    /// Graveyard document written.
    Created(String),
    /// Grave site appended.
    SiteAdded {
        /// Graveyard name.
        name: String,
        /// Assigned sequence number.
        number: u32,
    },
    /// Graveyard document removed.
    Deleted(String),
    /// Grave site removed.
    SiteRemoved {
        /// Graveyard name.
        name: String,
        /// Removed sequence number.
        number: u32,
    },
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CornerSet { which, corner } => write!(
                f,
                "Position {which} set to x:{} y:{} z:{}",
                corner.x, corner.y, corner.z
            ),
            Self::Created(name) => write!(f, "Graveyard {name} created and saved successfully!"),
            Self::SiteAdded { name, number } => {
                write!(f, "Added grave site {number} to graveyard {name}.")
            }
            Self::Deleted(name) => write!(f, "Graveyard {name} deleted successfully!"),
            Self::SiteRemoved { name, number } => {
                write!(f, "Removed grave site {number} from graveyard {name}.")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// A parsed `/graveyards` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subcommand {
    /// Record the first corner.
    Pos1,
    /// Record the second corner.
    Pos2,
    /// Create a graveyard from the recorded corners.
    Create(String),
    /// Add a site at the issuer's position.
    AddSite(String),
    /// Delete a graveyard.
    Delete(String),
    /// Remove a numbered site.
    RemoveSite {
        /// Graveyard name.
        name: String,
        /// Sequence number as typed; checked once the graveyard is known.
        number: String,
    },
}

/// Parse a typed site number.
///
/// # Errors
///
/// [`CommandError::NotANumber`] unless `raw` is an integer.
pub fn parse_site_number(raw: &str) -> Result<i64, CommandError> {
    raw.parse::<i64>()
        .map_err(|_| CommandError::NotANumber(raw.to_string()))
}

impl Subcommand {
    /// Parse raw arguments. Verbs are case-insensitive.
    ///
    /// # Errors
    ///
    /// [`CommandError::Usage`] for missing arguments and
    /// [`CommandError::UnknownSubcommand`] for unknown verbs.
    pub fn parse(args: &[&str]) -> Result<Self, CommandError> {
        let Some(verb) = args.first() else {
            return Err(CommandError::Usage(
                "/graveyards <pos1|pos2|create|addsite|delete|removesite>",
            ));
        };
        let name = || {
            args.get(1)
                .map(|name| (*name).to_string())
                .ok_or(CommandError::Usage(usage_for(verb)))
        };

        match verb.to_lowercase().as_str() {
            "pos1" => Ok(Self::Pos1),
            "pos2" => Ok(Self::Pos2),
            "create" => Ok(Self::Create(name()?)),
            "addsite" => Ok(Self::AddSite(name()?)),
            "delete" => Ok(Self::Delete(name()?)),
            "removesite" => {
                let name = name()?;
                let number = args
                    .get(2)
                    .map(|raw| (*raw).to_string())
                    .ok_or(CommandError::Usage(usage_for(verb)))?;
                Ok(Self::RemoveSite { name, number })
            }
            other => Err(CommandError::UnknownSubcommand(other.to_string())),
        }
    }
}

fn usage_for(verb: &str) -> &'static str {
    match verb.to_lowercase().as_str() {
        "create" => "/graveyards create <name>",
        "addsite" => "/graveyards addsite <graveyard-name>",
        "delete" => "/graveyards delete <graveyard-name>",
        "removesite" => "/graveyards removesite <graveyard-name> <site-number>",
        _ => "/graveyards <pos1|pos2|create|addsite|delete|removesite>",
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
struct PendingCorners {
    pos1: Option<Corner>,
    pos2: Option<Corner>,
}

/// Executor for `/graveyards`.
///
/// Pending corners are remembered per issuing player until a graveyard is
/// created from them.
#[derive(Debug)]
pub struct GraveyardCommand {
    ctx: AddonContext,
    pending: Mutex<HashMap<Uuid, PendingCorners>>,
}

impl GraveyardCommand {
    /// Create the executor.
    #[must_use]
    pub fn new(ctx: AddonContext) -> Self {
        Self {
            ctx,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Execute and send the outcome to the sender.
    pub fn run(&self, sender: &CommandSender, args: &[&str]) {
        let message = match self.execute(sender, args) {
            Ok(reply) => reply.to_string(),
            Err(e) => e.to_string(),
        };
        sender.reply(&self.ctx, &message);
    }

    /// Execute a `/graveyards` invocation.
    ///
    /// # Errors
    ///
    /// Any [`CommandError`]; nothing is changed when one is returned, except
    /// for [`CommandError::Storage`] where a write may have partly applied.
    pub fn execute(&self, sender: &CommandSender, args: &[&str]) -> Result<Reply, CommandError> {
        let player = sender.player().ok_or(CommandError::PlayersOnly)?;
        match Subcommand::parse(args)? {
            Subcommand::Pos1 => Ok(self.set_corner(player, 1)),
            Subcommand::Pos2 => Ok(self.set_corner(player, 2)),
            Subcommand::Create(name) => self.create(player, name),
            Subcommand::AddSite(name) => self.add_site(player, name),
            Subcommand::Delete(name) => self.delete(name),
            Subcommand::RemoveSite { name, number } => self.remove_site(name, &number),
        }
    }

    /// Tab-completion candidates for `/graveyards`.
    #[must_use]
    pub fn complete(&self, sender: &CommandSender, args: &[&str]) -> Vec<String> {
        if sender.player().is_none() {
            return Vec::new();
        }
        completion::graveyards(self.ctx.store(), args)
    }

    fn set_corner(&self, player: &PlayerRef, which: u8) -> Reply {
        #[allow(clippy::cast_precision_loss)]
        let raised = player
            .position
            .offset_y(self.ctx.config.placement.corner_height_offset as f64);
        let corner = Corner::from(&raised);
        let mut pending = self.pending.lock();
        let entry = pending.entry(player.id).or_default();
        if which == 1 {
            entry.pos1 = Some(corner.clone());
        } else {
            entry.pos2 = Some(corner.clone());
        }
        Reply::CornerSet { which, corner }
    }

    fn create(&self, player: &PlayerRef, name: String) -> Result<Reply, CommandError> {
        let corners = self.pending.lock().get(&player.id).cloned().unwrap_or_default();
        let (Some(pos1), Some(pos2)) = (corners.pos1, corners.pos2) else {
            return Err(CommandError::MissingCorners);
        };

        match self.ctx.store().create(&Graveyard::new(name.clone(), pos1, pos2)) {
            Ok(()) => {}
            Err(GraveyardError::InvalidName(name)) => return Err(CommandError::InvalidName(name)),
            Err(GraveyardError::GraveyardExists(name)) => {
                return Err(CommandError::AlreadyExists(name));
            }
            Err(source) => {
                error!(graveyard = %name, error = %source, "Failed to save graveyard");
                return Err(CommandError::Storage {
                    action: "save graveyard",
                    source,
                });
            }
        }

        self.pending.lock().remove(&player.id);
        info!(graveyard = %name, by = %player.name, "Graveyard created");
        self.ctx.cache.reload();
        Ok(Reply::Created(name))
    }

    fn add_site(&self, player: &PlayerRef, name: String) -> Result<Reply, CommandError> {
        let store = self.ctx.store();
        if !store.exists(&name) {
            return Err(CommandError::NotFound(name));
        }

        let feet = player.position.to_block();
        if self.ctx.host.is_empty_block(&feet.offset_y(-1.0)) {
            return Err(CommandError::NotOnGround);
        }
        #[allow(clippy::cast_precision_loss)]
        let site = feet.offset_y(self.ctx.config.placement.site_height_offset as f64);

        match store.site_at(&name, &site) {
            Ok(None) => {}
            Ok(Some(number)) => return Err(CommandError::SiteExists { name, number }),
            Err(source) => {
                error!(graveyard = %name, error = %source, "Failed to read graveyard");
                return Err(CommandError::Storage {
                    action: "read graveyard",
                    source,
                });
            }
        }

        let number = store.add_site(&name, &site).map_err(|source| {
            error!(graveyard = %name, error = %source, "Failed to save grave site");
            CommandError::Storage {
                action: "save grave site",
                source,
            }
        })?;

        info!(graveyard = %name, site = number, by = %player.name, "Grave site added");
        self.ctx.cache.reload();
        Ok(Reply::SiteAdded { name, number })
    }

    fn delete(&self, name: String) -> Result<Reply, CommandError> {
        let store = self.ctx.store();
        if !store.exists(&name) {
            return Err(CommandError::NotFound(name));
        }
        match store.delete(&name) {
            Ok(true) => {
                self.ctx.cache.reload();
                Ok(Reply::Deleted(name))
            }
            Ok(false) => Err(CommandError::NotFound(name)),
            Err(source) => {
                error!(graveyard = %name, error = %source, "Failed to delete graveyard");
                Err(CommandError::Storage {
                    action: "delete graveyard",
                    source,
                })
            }
        }
    }

    fn remove_site(&self, name: String, raw: &str) -> Result<Reply, CommandError> {
        let store = self.ctx.store();
        if !store.exists(&name) {
            return Err(CommandError::NotFound(name));
        }
        let requested = parse_site_number(raw)?;
        let Some(number) = u32::try_from(requested).ok().filter(|n| *n > 0) else {
            return Err(CommandError::SiteNotFound {
                name,
                number: requested,
            });
        };
        match store.remove_site(&name, number) {
            Ok(true) => {
                self.ctx.cache.reload();
                Ok(Reply::SiteRemoved { name, number })
            }
            Ok(false) => Err(CommandError::SiteNotFound {
                name,
                number: requested,
            }),
            Err(source) => {
                error!(graveyard = %name, site = number, error = %source, "Failed to remove grave site");
                Err(CommandError::Storage {
                    action: "save changes to graveyard",
                    source,
                })
            }
        }
    }
}
