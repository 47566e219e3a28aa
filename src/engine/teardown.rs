//! engine::teardown
//!
//! Teardown mode: remove a project's resources in reverse dependency order.
//!
//! # Order
//!
//! Per project, strictly:
//!
//! 1. Applications
//! 2. Per package type: local repositories per stage, then the remote
//!    repository (FULL and REMOTE_ONLY variants), then the virtual
//!    repository (FULL only)
//! 3. The project itself
//!
//! Stages are deliberately never deleted: they are global to the platform
//! and outlive any single project. Absence of any resource is a normal
//! skip, and a successful delete call is trusted immediately; there is no
//! post-delete polling.

use super::ReconcileError;
use crate::core::naming::{repo_name, RepoRole};
use crate::core::policy::{PackageType, Variant};
use crate::core::types::ProjectSpec;
use crate::platform::{Platform, PlatformError};
use crate::ui::output::{self, Verbosity};

/// Tear down one project and everything it owns.
pub async fn teardown_project(
    platform: &dyn Platform,
    project: &ProjectSpec,
    verbosity: Verbosity,
) -> Result<(), ReconcileError> {
    let key = &project.project_key;

    for app in &project.applications {
        delete_application(platform, &app.name, verbosity).await?;
    }

    for pkg in &project.package_types {
        let variant = PackageType::resolve(&pkg.name).variant();

        if variant != Variant::RemoteOnly {
            for stage in &project.stages {
                let role = RepoRole::Local {
                    stage: stage.clone(),
                };
                delete_repo(platform, &repo_name(key, &pkg.name, &role), verbosity).await?;
            }
        }

        if variant != Variant::LocalOnly {
            delete_repo(platform, &repo_name(key, &pkg.name, &RepoRole::Remote), verbosity)
                .await?;
        }

        if variant == Variant::Full {
            delete_repo(platform, &repo_name(key, &pkg.name, &RepoRole::Virtual), verbosity)
                .await?;
        }
    }

    delete_project(platform, key, verbosity).await?;

    // Stages are shared across projects and are intentionally left in place.
    Ok(())
}

/// Delete an application if present; absence is a normal skip.
async fn delete_application(
    platform: &dyn Platform,
    name: &str,
    verbosity: Verbosity,
) -> Result<(), ReconcileError> {
    if !platform.application_exists(name).await? {
        output::print(
            format!("Application '{}' does not exist, skipping", name),
            verbosity,
        );
        return Ok(());
    }

    output::print(format!("Deleting application '{}'", name), verbosity);
    match platform.delete_application(name).await {
        Ok(()) | Err(PlatformError::NotFound(_)) => {
            output::print(format!("Deleted application '{}'", name), verbosity);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a repository if present; absence is a normal skip.
async fn delete_repo(
    platform: &dyn Platform,
    name: &str,
    verbosity: Verbosity,
) -> Result<(), ReconcileError> {
    if !platform.repo_exists(name).await? {
        output::print(
            format!("Repository '{}' does not exist, skipping", name),
            verbosity,
        );
        return Ok(());
    }

    output::print(format!("Deleting repository '{}'", name), verbosity);
    match platform.delete_repo(name).await {
        Ok(()) | Err(PlatformError::NotFound(_)) => {
            output::print(format!("Deleted repository '{}'", name), verbosity);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete the project if present; absence is a normal skip.
async fn delete_project(
    platform: &dyn Platform,
    key: &str,
    verbosity: Verbosity,
) -> Result<(), ReconcileError> {
    if !platform.project_exists(key).await? {
        output::print(
            format!("Project '{}' does not exist, skipping", key),
            verbosity,
        );
        return Ok(());
    }

    output::print(format!("Deleting project '{}'", key), verbosity);
    match platform.delete_project(key).await {
        Ok(()) | Err(PlatformError::NotFound(_)) => {
            output::print(format!("Deleted project '{}'", key), verbosity);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
