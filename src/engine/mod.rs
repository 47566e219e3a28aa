//! engine
//!
//! The reconciler: converges remote platform state toward the desired
//! project specs (provisioning) or away from them (teardown).
//!
//! # Architecture
//!
//! Both modes walk one project at a time in a strict dependency order and
//! make every step idempotent by probing remote state first:
//!
//! - **Provisioning** ([`provision`]): stages -> project (confirmed
//!   visible) -> repository trees per package type -> applications.
//! - **Teardown** ([`teardown`]): applications -> repositories -> project.
//!   Stages are shared across projects and are never deleted.
//!
//! # Invariants
//!
//! - A stage exists before any local repository scoped to it is created
//! - A project is confirmed to exist (not just "create call returned")
//!   before any repository or application of that project is created
//! - All local repositories of a package type, and its remote repository,
//!   exist before the virtual repository referencing them is created
//! - Already-satisfied state is a success; a remote conflict on create is
//!   treated the same as already-present
//! - Any other rejection from the platform aborts the entire run
//!
//! # Scheduling
//!
//! Projects are reconciled sequentially, fail-fast. Nothing blocks beyond
//! the latency of a single remote call except the bounded existence poll
//! after project creation (see [`retry`]).

pub mod provision;
pub mod retry;
pub mod teardown;

use thiserror::Error;

use crate::core::types::ProjectSpec;
use crate::platform::{Platform, PlatformError};
use crate::ui::output::{self, Verbosity};
use retry::RetryPolicy;

/// Errors from reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The platform rejected a call; aborts the run.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// A created project never became queryable within the poll bound.
    #[error("project '{key}' not visible after creation ({attempts} attempts)")]
    ProjectNotVisible { key: String, attempts: u32 },
}

/// Execution context shared by all engine operations.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// Minimal output
    pub quiet: bool,
    /// Verbose output
    pub debug: bool,
    /// Bound for the post-create project visibility poll
    pub visibility: RetryPolicy,
}

impl Context {
    /// Output verbosity derived from the flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self {
            quiet: false,
            debug: false,
            visibility: retry::PROJECT_VISIBILITY,
        }
    }
}

/// Provision every project, in order, fail-fast.
pub async fn apply(
    platform: &dyn Platform,
    projects: &[ProjectSpec],
    ctx: &Context,
) -> Result<(), ReconcileError> {
    let verbosity = ctx.verbosity();
    for project in projects {
        output::banner(format!("Processing project {}", project.project_key), verbosity);
        provision::provision_project(platform, project, ctx).await?;
    }
    Ok(())
}

/// Tear down every project, in order, fail-fast.
pub async fn destroy(
    platform: &dyn Platform,
    projects: &[ProjectSpec],
    ctx: &Context,
) -> Result<(), ReconcileError> {
    let verbosity = ctx.verbosity();
    for project in projects {
        output::banner(format!("Cleaning project {}", project.project_key), verbosity);
        teardown::teardown_project(platform, project, verbosity).await?;
    }
    Ok(())
}
