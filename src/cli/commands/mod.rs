//! cli::commands
//!
//! Command handlers. Each handler resolves configuration, builds the REST
//! platform client, and hands control to the engine.

mod apply;
mod destroy;

use anyhow::Result;

use super::args::{Cli, Command};
use crate::engine::Context;

/// Dispatch to the handler for the parsed command.
pub async fn dispatch(cli: Cli, ctx: &Context) -> Result<()> {
    match cli.command {
        Command::Apply => apply::apply(&cli, ctx).await,
        Command::Destroy => destroy::destroy(&cli, ctx).await,
    }
}
