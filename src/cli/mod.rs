//! cli
//!
//! Command-line interface layer for Quartermaster.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve settings and configuration before any remote call
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! the [`crate::engine`] for execution. All remote mutations flow through
//! the engine's reconciliation loop.

pub mod args;
pub mod commands;

pub use args::Cli;

use anyhow::Result;

use crate::engine;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = engine::Context {
        quiet: cli.quiet,
        debug: cli.debug,
        ..Default::default()
    };

    commands::dispatch(cli, &ctx).await
}
