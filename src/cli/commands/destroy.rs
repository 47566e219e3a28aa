//! cli::commands::destroy
//!
//! `qm destroy` - tear down all configured projects.

use anyhow::{Context as _, Result};

use crate::cli::args::Cli;
use crate::core::config::{self, Settings};
use crate::engine::{self, Context};
use crate::platform::rest::RestPlatform;
use crate::ui::output;

/// Tear down every project described by the configuration directory.
pub async fn destroy(cli: &Cli, ctx: &Context) -> Result<()> {
    let settings = Settings::new(cli.platform_url.clone(), cli.token.clone())?;
    let projects = config::load_projects(&cli.config_dir).with_context(|| {
        format!(
            "loading project documents from '{}'",
            cli.config_dir.display()
        )
    })?;

    let platform = RestPlatform::new(&settings)?;
    engine::destroy(&platform, &projects, ctx)
        .await
        .context("teardown failed")?;

    output::print(
        format!("Tore down {} project(s)", projects.len()),
        ctx.verbosity(),
    );
    Ok(())
}
