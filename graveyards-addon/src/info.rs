//! `/graveyardinfo <name>`: list a graveyard's grave sites.

use graveyards_core::types::GraveSite;

use crate::command::{CommandError, CommandSender};
use crate::completion;
use crate::context::AddonContext;

/// Read-only query over the cache. Available to console and players.
#[derive(Debug, Clone)]
pub struct GraveyardInfoCommand {
    ctx: AddonContext,
}

/// One output line per site.
fn describe(site: &GraveSite) -> String {
    format!(
        "World: {}, X: {}, Y: {}, Z: {}, Occupied: {}",
        site.position.world,
        site.position.block_x(),
        site.position.block_y(),
        site.position.block_z(),
        site.occupied
    )
}

impl GraveyardInfoCommand {
    /// Create the query command.
    #[must_use]
    pub fn new(ctx: AddonContext) -> Self {
        Self { ctx }
    }

    /// Output lines for `/graveyardinfo <args>`.
    ///
    /// # Errors
    ///
    /// [`CommandError::Usage`] when no name is given.
    pub fn execute(&self, args: &[&str]) -> Result<Vec<String>, CommandError> {
        let Some(name) = args.first() else {
            return Err(CommandError::Usage("/graveyardinfo <graveyardName>"));
        };
        let sites = self.ctx.cache.sites_for(name);
        if sites.is_empty() {
            return Ok(vec![format!("No grave sites found for {name}")]);
        }
        Ok(sites.iter().map(describe).collect())
    }

    /// Execute and send every line to the sender.
    pub fn run(&self, sender: &CommandSender, args: &[&str]) {
        match self.execute(args) {
            Ok(lines) => {
                for line in lines {
                    sender.reply(&self.ctx, &line);
                }
            }
            Err(e) => sender.reply(&self.ctx, &e.to_string()),
        }
    }

    /// Tab-completion candidates.
    #[must_use]
    pub fn complete(&self, args: &[&str]) -> Vec<String> {
        completion::graveyard_info(&self.ctx.cache, args)
    }
}
