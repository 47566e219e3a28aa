//! engine::provision
//!
//! Provisioning mode: converge remote state toward a desired project tree.
//!
//! # Order
//!
//! Per project, strictly:
//!
//! 1. Each declared stage, in declaration order
//! 2. The project itself, confirmed visible via a bounded existence poll
//! 3. Per package type: local repositories per stage, then the remote and
//!    virtual repositories as the policy variant dictates
//! 4. Applications
//!
//! Every create step probes existence first; present means skip. A remote
//! conflict on create means another writer got there first and is also a
//! skip. Anything else aborts the run.

use super::retry;
use super::{Context, ReconcileError};
use crate::core::naming::{repo_name, RepoRole};
use crate::core::policy::{PackageType, Variant};
use crate::core::types::{ApplicationSpec, PackageTypeSpec, ProjectSpec};
use crate::platform::{
    CreateApplicationRequest, CreateProjectRequest, CreateRepoRequest, Platform, PlatformError,
    RepoDetail,
};
use crate::ui::output::{self, Verbosity};

/// Provision one project and everything it owns.
pub async fn provision_project(
    platform: &dyn Platform,
    project: &ProjectSpec,
    ctx: &Context,
) -> Result<(), ReconcileError> {
    let verbosity = ctx.verbosity();

    for stage in &project.stages {
        ensure_stage(platform, stage, verbosity).await?;
    }

    ensure_project(platform, project, ctx).await?;

    for pkg in &project.package_types {
        provision_package_type(platform, project, pkg, verbosity).await?;
    }

    for app in &project.applications {
        ensure_application(platform, &project.project_key, app, verbosity).await?;
    }

    Ok(())
}

/// Create a global lifecycle stage unless it already exists.
///
/// Stage names are lower-cased before any remote call, and a conflict on
/// create is an accepted race with another writer.
async fn ensure_stage(
    platform: &dyn Platform,
    stage: &str,
    verbosity: Verbosity,
) -> Result<(), ReconcileError> {
    let stage = stage.to_lowercase();

    if platform.stage_exists(&stage).await? {
        output::print(format!("Stage '{}' already exists", stage), verbosity);
        return Ok(());
    }

    output::print(format!("Creating global stage '{}'", stage), verbosity);
    match platform.create_stage(&stage).await {
        Ok(()) => {
            output::print(format!("Stage '{}' created", stage), verbosity);
            Ok(())
        }
        Err(PlatformError::Conflict(_)) => {
            output::print(format!("Stage '{}' already exists", stage), verbosity);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Create the project unless present, then wait until it is queryable.
///
/// The platform may acknowledge creation before the project is visible to
/// reads; repositories and applications must not be created until a probe
/// confirms it. A conflict on create means the project already exists, so
/// no poll is needed.
async fn ensure_project(
    platform: &dyn Platform,
    project: &ProjectSpec,
    ctx: &Context,
) -> Result<(), ReconcileError> {
    let verbosity = ctx.verbosity();
    let key = &project.project_key;

    if platform.project_exists(key).await? {
        output::print(format!("Project '{}' already exists", key), verbosity);
        return Ok(());
    }

    output::print(format!("Creating project '{}'", key), verbosity);
    let request = CreateProjectRequest {
        key: key.clone(),
        display_name: project.display_name.clone(),
        description: project.description.clone(),
    };

    match platform.create_project(&request).await {
        Ok(()) => {}
        Err(PlatformError::Conflict(_)) => {
            output::print(format!("Project '{}' already exists", key), verbosity);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let visible = retry::wait_until(&ctx.visibility, || platform.project_exists(key)).await?;
    if !visible {
        return Err(ReconcileError::ProjectNotVisible {
            key: key.clone(),
            attempts: ctx.visibility.max_attempts,
        });
    }

    output::print(format!("Project '{}' is ready", key), verbosity);
    Ok(())
}

/// Build the repository tree for one package type, per its policy variant.
async fn provision_package_type(
    platform: &dyn Platform,
    project: &ProjectSpec,
    pkg: &PackageTypeSpec,
    verbosity: Verbosity,
) -> Result<(), ReconcileError> {
    let key = &project.project_key;
    let package_type = PackageType::resolve(&pkg.name);
    let variant = package_type.variant();
    output::debug(
        format!("package type '{}' resolved to '{}' ({})", pkg.name, package_type.canonical(), variant),
        verbosity,
    );

    if variant == Variant::RemoteOnly {
        // Proxy-only type: one remote repo, no stage iteration at all.
        let name = repo_name(key, &pkg.name, &RepoRole::Remote);
        ensure_repo(
            platform,
            CreateRepoRequest {
                name,
                package_type: package_type.canonical().to_string(),
                layout_ref: package_type.layout_ref().to_string(),
                project_key: key.clone(),
                detail: RepoDetail::Remote {
                    url: pkg.remote_url.clone(),
                },
            },
            verbosity,
        )
        .await?;
        return Ok(());
    }

    let mut members = Vec::new();
    for stage in &project.stages {
        let role = RepoRole::Local {
            stage: stage.clone(),
        };
        let name = repo_name(key, &pkg.name, &role);
        ensure_repo(
            platform,
            CreateRepoRequest {
                name: name.clone(),
                package_type: package_type.canonical().to_string(),
                layout_ref: package_type.layout_ref().to_string(),
                project_key: key.clone(),
                detail: RepoDetail::Local {
                    stage: stage.to_lowercase(),
                },
            },
            verbosity,
        )
        .await?;
        members.push(name);
    }

    if variant == Variant::LocalOnly {
        output::print(
            format!("Skipping remote & virtual for '{}'", pkg.name),
            verbosity,
        );
        return Ok(());
    }

    let remote_name = repo_name(key, &pkg.name, &RepoRole::Remote);
    ensure_repo(
        platform,
        CreateRepoRequest {
            name: remote_name.clone(),
            package_type: package_type.canonical().to_string(),
            layout_ref: package_type.layout_ref().to_string(),
            project_key: key.clone(),
            detail: RepoDetail::Remote {
                url: pkg.remote_url.clone(),
            },
        },
        verbosity,
    )
    .await?;
    members.push(remote_name);

    // Default deployment target is the first local, or the remote when the
    // project declares no stages.
    let default_deployment = members[0].clone();
    let virtual_name = repo_name(key, &pkg.name, &RepoRole::Virtual);
    ensure_repo(
        platform,
        CreateRepoRequest {
            name: virtual_name,
            package_type: package_type.canonical().to_string(),
            layout_ref: package_type.layout_ref().to_string(),
            project_key: key.clone(),
            detail: RepoDetail::Virtual {
                members,
                default_deployment,
            },
        },
        verbosity,
    )
    .await?;

    Ok(())
}

/// Create a repository unless it already exists.
async fn ensure_repo(
    platform: &dyn Platform,
    request: CreateRepoRequest,
    verbosity: Verbosity,
) -> Result<(), ReconcileError> {
    let kind = match &request.detail {
        RepoDetail::Local { .. } => "local",
        RepoDetail::Remote { .. } => "remote",
        RepoDetail::Virtual { .. } => "virtual",
    };

    if platform.repo_exists(&request.name).await? {
        output::print(
            format!("{} repo '{}' already exists", capitalize(kind), request.name),
            verbosity,
        );
        return Ok(());
    }

    output::print(
        format!("Creating {} repo '{}'", kind, request.name),
        verbosity,
    );
    match platform.create_repo(&request).await {
        Ok(()) => Ok(()),
        Err(PlatformError::Conflict(_)) => {
            output::print(
                format!("{} repo '{}' already exists", capitalize(kind), request.name),
                verbosity,
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Create an application unless it already exists.
///
/// The conflict arm stays as a second line of defense against a concurrent
/// writer between the probe and the create.
async fn ensure_application(
    platform: &dyn Platform,
    project_key: &str,
    app: &ApplicationSpec,
    verbosity: Verbosity,
) -> Result<(), ReconcileError> {
    if platform.application_exists(&app.name).await? {
        output::print(format!("Application '{}' already exists", app.name), verbosity);
        return Ok(());
    }

    output::print(format!("Creating application '{}'", app.name), verbosity);
    let request = CreateApplicationRequest {
        name: app.name.clone(),
        application_key: app.application_key.clone(),
        description: app.description.clone(),
        project_key: project_key.to_string(),
    };

    match platform.create_application(&request).await {
        Ok(()) => {
            output::print(format!("Application '{}' created", app.name), verbosity);
            Ok(())
        }
        Err(PlatformError::Conflict(_)) => {
            output::print(format!("Application '{}' already exists", app.name), verbosity);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::retry::RetryPolicy;
    use crate::platform::mock::{FailOn, MockOperation, MockPlatform};
    use std::time::Duration;

    fn quiet() -> Context {
        Context {
            quiet: true,
            ..Default::default()
        }
    }

    fn quiet_with_poll(max_attempts: u32) -> Context {
        Context {
            visibility: RetryPolicy::new(max_attempts, Duration::from_millis(1)),
            ..quiet()
        }
    }

    fn project(key: &str, stages: &[&str], pkgs: &[(&str, &str)], apps: &[&str]) -> ProjectSpec {
        ProjectSpec {
            project_key: key.to_string(),
            display_name: key.to_uppercase(),
            description: String::new(),
            stages: stages.iter().map(|s| s.to_string()).collect(),
            package_types: pkgs
                .iter()
                .map(|(name, url)| PackageTypeSpec {
                    name: name.to_string(),
                    remote_url: url.to_string(),
                })
                .collect(),
            applications: apps
                .iter()
                .map(|name| ApplicationSpec {
                    name: name.to_string(),
                    application_key: String::new(),
                    description: String::new(),
                })
                .collect(),
        }
    }

    fn created_names(ops: &[MockOperation]) -> Vec<String> {
        ops.iter()
            .filter_map(|op| match op {
                MockOperation::CreateRepo { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn full_variant_creates_locals_remote_virtual_in_order() {
        let platform = MockPlatform::new();
        let project = project("acme", &["DEV", "PROD"], &[("maven", "")], &[]);

        provision_project(&platform, &project, &quiet())
            .await
            .unwrap();

        let ops = platform.operations();
        assert_eq!(
            ops[0],
            MockOperation::CreateStage { name: "dev".into() }
        );
        assert_eq!(
            ops[1],
            MockOperation::CreateStage { name: "prod".into() }
        );
        assert_eq!(ops[2], MockOperation::CreateProject { key: "acme".into() });
        assert_eq!(
            created_names(&ops),
            vec![
                "acme-maven-dev-local",
                "acme-maven-prod-local",
                "acme-maven-remote",
                "acme-maven-virtual"
            ]
        );
    }

    #[tokio::test]
    async fn virtual_members_are_locals_then_remote_with_first_local_default() {
        let platform = MockPlatform::new();
        let project = project("acme", &["DEV", "PROD"], &[("maven", "")], &[]);

        provision_project(&platform, &project, &quiet())
            .await
            .unwrap();

        let ops = platform.operations();
        let virtual_op = ops
            .iter()
            .find(|op| matches!(op, MockOperation::CreateRepo { rclass, .. } if rclass == "virtual"))
            .unwrap();
        match virtual_op {
            MockOperation::CreateRepo {
                members,
                default_deployment,
                ..
            } => {
                assert_eq!(
                    members,
                    &vec![
                        "acme-maven-dev-local".to_string(),
                        "acme-maven-prod-local".to_string(),
                        "acme-maven-remote".to_string()
                    ]
                );
                assert_eq!(default_deployment.as_deref(), Some("acme-maven-dev-local"));
            }
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn virtual_defaults_to_remote_when_no_stages() {
        let platform = MockPlatform::new();
        let project = project("acme", &[], &[("maven", "")], &[]);

        provision_project(&platform, &project, &quiet())
            .await
            .unwrap();

        let ops = platform.operations();
        let virtual_op = ops
            .iter()
            .find(|op| matches!(op, MockOperation::CreateRepo { rclass, .. } if rclass == "virtual"))
            .unwrap();
        match virtual_op {
            MockOperation::CreateRepo {
                default_deployment, ..
            } => {
                assert_eq!(default_deployment.as_deref(), Some("acme-maven-remote"));
            }
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn local_only_variant_creates_no_remote_or_virtual() {
        let platform = MockPlatform::new();
        let project = project("acme", &["DEV"], &[("machinelearning", "")], &[]);

        provision_project(&platform, &project, &quiet())
            .await
            .unwrap();

        assert_eq!(
            created_names(&platform.operations()),
            vec!["acme-machinelearning-dev-local"]
        );
    }

    #[tokio::test]
    async fn remote_only_variant_skips_stage_iteration() {
        let platform = MockPlatform::new();
        let project = project("acme", &["DEV", "PROD"], &[("vcs", "")], &[]);

        provision_project(&platform, &project, &quiet())
            .await
            .unwrap();

        assert_eq!(created_names(&platform.operations()), vec!["acme-vcs-remote"]);
    }

    #[tokio::test]
    async fn repo_payload_uses_canonical_type_and_layout() {
        let platform = MockPlatform::new();
        let project = project("acme", &["DEV"], &[("python", "")], &[]);

        provision_project(&platform, &project, &quiet())
            .await
            .unwrap();

        let ops = platform.operations();
        let local = ops
            .iter()
            .find(|op| matches!(op, MockOperation::CreateRepo { rclass, .. } if rclass == "local"))
            .unwrap();
        match local {
            MockOperation::CreateRepo {
                name, package_type, ..
            } => {
                // Names keep the raw token; the payload carries the canonical type.
                assert_eq!(name, "acme-python-dev-local");
                assert_eq!(package_type, "pypi");
            }
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn second_run_issues_no_mutations() {
        let platform = MockPlatform::new();
        let project = project(
            "acme",
            &["DEV", "PROD"],
            &[("maven", ""), ("machinelearning", "")],
            &[],
        );

        provision_project(&platform, &project, &quiet())
            .await
            .unwrap();
        platform.clear_operations();

        provision_project(&platform, &project, &quiet())
            .await
            .unwrap();
        assert!(platform.operations().is_empty());
    }

    #[tokio::test]
    async fn conflict_on_project_create_skips_visibility_poll() {
        let platform = MockPlatform::new();
        platform.fail_on(FailOn::CreateProject(PlatformError::Conflict(
            "project 'acme'".into(),
        )));
        let project = project("acme", &[], &[], &[]);

        // The conflict path returns immediately; if the visibility poll ran
        // here it would exhaust its bound and fail, since the mock never
        // actually created the project.
        provision_project(&platform, &project, &quiet_with_poll(2))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn visibility_lag_within_the_poll_bound_succeeds() {
        let platform = MockPlatform::new();
        platform.set_project_visibility_lag(3);
        let project = project("acme", &[], &[], &[]);

        provision_project(&platform, &project, &quiet_with_poll(5))
            .await
            .unwrap();
        assert!(platform.project_exists("acme").await.unwrap());
    }

    #[tokio::test]
    async fn exhausted_visibility_poll_fails_the_run() {
        let platform = MockPlatform::new();
        platform.set_project_visibility_lag(50);
        let project = project("acme", &[], &[], &[]);

        let err = provision_project(&platform, &project, &quiet_with_poll(3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::ProjectNotVisible { ref key, attempts: 3 } if key == "acme"
        ));
    }

    #[tokio::test]
    async fn stage_conflict_is_accepted_race() {
        let platform = MockPlatform::new();
        platform.fail_on(FailOn::CreateStage(PlatformError::Conflict(
            "stage 'dev'".into(),
        )));
        let project = project("acme", &["DEV"], &[], &[]);

        provision_project(&platform, &project, &quiet())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_repo_create_aborts() {
        let platform = MockPlatform::new();
        platform.fail_on(FailOn::CreateRepo(PlatformError::ApiError {
            status: 400,
            body: "bad layout".into(),
        }));
        let project = project("acme", &["DEV"], &[("maven", "")], &[]);

        let err = provision_project(&platform, &project, &quiet())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::Platform(PlatformError::ApiError { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn existing_application_is_skipped() {
        let platform = MockPlatform::new();
        platform.seed_project("acme");
        platform.seed_application("billing");
        let project = project("acme", &[], &[], &["billing"]);

        provision_project(&platform, &project, &quiet())
            .await
            .unwrap();
        assert!(platform.operations().is_empty());
    }

    #[tokio::test]
    async fn application_conflict_is_already_satisfied() {
        let platform = MockPlatform::new();
        platform.fail_on(FailOn::CreateApplication(PlatformError::Conflict(
            "application 'billing'".into(),
        )));
        let project = project("acme", &[], &[], &["billing"]);

        provision_project(&platform, &project, &quiet())
            .await
            .unwrap();
    }

    #[test]
    fn capitalize_words() {
        assert_eq!(capitalize("local"), "Local");
        assert_eq!(capitalize(""), "");
    }
}
