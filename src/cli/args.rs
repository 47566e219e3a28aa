//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config-dir <path>`: Directory of project documents
//! - `--platform-url <url>`: Platform base URL (env: `QM_PLATFORM_URL`)
//! - `--token <token>`: Access token (env: `QM_ACCESS_TOKEN`)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quartermaster - provision package-platform projects, repositories, and applications
#[derive(Parser, Debug)]
#[command(name = "qm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing project configuration documents (*.json)
    #[arg(long, global = true, default_value = "./projects")]
    pub config_dir: PathBuf,

    /// Base URL of the platform (e.g., https://acme.platform.io)
    #[arg(long, global = true, env = "QM_PLATFORM_URL")]
    pub platform_url: Option<String>,

    /// Bearer token for the platform
    #[arg(long, global = true, env = "QM_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision all configured projects (idempotent; safe to re-run)
    #[command(
        name = "apply",
        long_about = "Provision all configured projects.\n\n\
            For each project document in the configuration directory, apply \
            creates the declared lifecycle stages, the project, the repository \
            tree for each package type, and the declared applications. Every \
            step checks remote state first, so re-running against an already \
            provisioned platform makes no changes."
    )]
    Apply,

    /// Tear down all configured projects (stages are left in place)
    #[command(
        name = "destroy",
        long_about = "Tear down all configured projects.\n\n\
            Deletes applications, repositories, and projects in reverse \
            dependency order. Resources that are already absent are skipped. \
            Lifecycle stages are shared across projects and are never deleted."
    )]
    Destroy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn apply_parses_with_defaults() {
        let cli = Cli::try_parse_from(["qm", "apply"]).unwrap();
        assert!(matches!(cli.command, Command::Apply));
        assert_eq!(cli.config_dir, PathBuf::from("./projects"));
        assert!(!cli.quiet);
        assert!(!cli.debug);
    }

    #[test]
    fn destroy_accepts_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "qm",
            "destroy",
            "--config-dir",
            "/tmp/projects",
            "--quiet",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Destroy));
        assert_eq!(cli.config_dir, PathBuf::from("/tmp/projects"));
        assert!(cli.quiet);
    }
}
