//! platform::mock
//!
//! Mock platform implementation for deterministic testing.
//!
//! # Design
//!
//! The mock platform keeps remote state (stages, projects, repositories,
//! applications) in memory, records every mutation for verification, and
//! allows injecting failures per method. Probes are not recorded, so a
//! test can assert "a second run issues no mutating calls" directly from
//! the operation log.
//!
//! # Example
//!
//! ```
//! use quartermaster::platform::mock::{MockPlatform, MockOperation};
//! use quartermaster::platform::Platform;
//!
//! # tokio_test::block_on(async {
//! let platform = MockPlatform::new();
//!
//! platform.create_stage("dev").await.unwrap();
//! assert!(platform.stage_exists("dev").await.unwrap());
//!
//! assert_eq!(
//!     platform.operations(),
//!     vec![MockOperation::CreateStage { name: "dev".to_string() }]
//! );
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::traits::{
    CreateApplicationRequest, CreateProjectRequest, CreateRepoRequest, Platform, PlatformError,
    RepoDetail,
};

/// Mock platform for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockPlatform {
    inner: Arc<Mutex<MockPlatformInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockPlatformInner {
    stages: HashSet<String>,
    projects: HashSet<String>,
    repos: HashSet<String>,
    applications: HashSet<String>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Number of project-existence probes answered `false` before the
    /// project becomes visible (eventual-consistency simulation).
    project_visibility_lag: u32,
    /// Recorded mutations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail create_stage with the given error.
    CreateStage(PlatformError),
    /// Fail create_project with the given error.
    CreateProject(PlatformError),
    /// Fail create_repo with the given error.
    CreateRepo(PlatformError),
    /// Fail create_application with the given error.
    CreateApplication(PlatformError),
    /// Fail delete_project with the given error.
    DeleteProject(PlatformError),
    /// Fail delete_repo with the given error.
    DeleteRepo(PlatformError),
    /// Fail delete_application with the given error.
    DeleteApplication(PlatformError),
}

/// Recorded mutation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    CreateStage {
        name: String,
    },
    CreateProject {
        key: String,
    },
    DeleteProject {
        key: String,
    },
    CreateRepo {
        name: String,
        rclass: String,
        package_type: String,
        members: Vec<String>,
        default_deployment: Option<String>,
    },
    DeleteRepo {
        name: String,
    },
    CreateApplication {
        name: String,
        project_key: String,
    },
    DeleteApplication {
        name: String,
    },
}

impl MockPlatform {
    /// Create a new empty mock platform.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockPlatformInner::default())),
        }
    }

    /// Configure a method to fail with the given error.
    pub fn fail_on(&self, fail: FailOn) {
        self.inner.lock().unwrap().fail_on = Some(fail);
    }

    /// Clear any configured failure.
    pub fn clear_failure(&self) {
        self.inner.lock().unwrap().fail_on = None;
    }

    /// Make the next `lag` project-existence probes after a create answer
    /// `false`, simulating eventual-consistency propagation.
    pub fn set_project_visibility_lag(&self, lag: u32) {
        self.inner.lock().unwrap().project_visibility_lag = lag;
    }

    /// Seed a stage as already existing.
    pub fn seed_stage(&self, name: &str) {
        self.inner.lock().unwrap().stages.insert(name.to_string());
    }

    /// Seed a project as already existing.
    pub fn seed_project(&self, key: &str) {
        self.inner.lock().unwrap().projects.insert(key.to_string());
    }

    /// Seed a repository as already existing.
    pub fn seed_repo(&self, name: &str) {
        self.inner.lock().unwrap().repos.insert(name.to_string());
    }

    /// Seed an application as already existing.
    pub fn seed_application(&self, name: &str) {
        self.inner
            .lock()
            .unwrap()
            .applications
            .insert(name.to_string());
    }

    /// Get the recorded mutations, in call order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Clear the recorded mutations (e.g., between reconciliation runs).
    pub fn clear_operations(&self) {
        self.inner.lock().unwrap().operations.clear();
    }

    fn take_failure<F>(&self, matcher: F) -> Option<PlatformError>
    where
        F: FnOnce(&FailOn) -> Option<PlatformError>,
    {
        let mut inner = self.inner.lock().unwrap();
        let result = inner.fail_on.as_ref().and_then(matcher);
        if result.is_some() {
            inner.fail_on = None;
        }
        result
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn stage_exists(&self, stage: &str) -> Result<bool, PlatformError> {
        Ok(self.inner.lock().unwrap().stages.contains(stage))
    }

    async fn create_stage(&self, stage: &str) -> Result<(), PlatformError> {
        if let Some(err) = self.take_failure(|f| match f {
            FailOn::CreateStage(e) => Some(e.clone()),
            _ => None,
        }) {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::CreateStage {
            name: stage.to_string(),
        });
        if !inner.stages.insert(stage.to_string()) {
            return Err(PlatformError::Conflict(format!("stage '{}'", stage)));
        }
        Ok(())
    }

    async fn project_exists(&self, key: &str) -> Result<bool, PlatformError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.projects.contains(key) && inner.project_visibility_lag > 0 {
            inner.project_visibility_lag -= 1;
            return Ok(false);
        }
        Ok(inner.projects.contains(key))
    }

    async fn create_project(&self, request: &CreateProjectRequest) -> Result<(), PlatformError> {
        if let Some(err) = self.take_failure(|f| match f {
            FailOn::CreateProject(e) => Some(e.clone()),
            _ => None,
        }) {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::CreateProject {
            key: request.key.clone(),
        });
        if !inner.projects.insert(request.key.clone()) {
            return Err(PlatformError::Conflict(format!("project '{}'", request.key)));
        }
        Ok(())
    }

    async fn delete_project(&self, key: &str) -> Result<(), PlatformError> {
        if let Some(err) = self.take_failure(|f| match f {
            FailOn::DeleteProject(e) => Some(e.clone()),
            _ => None,
        }) {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::DeleteProject {
            key: key.to_string(),
        });
        if !inner.projects.remove(key) {
            return Err(PlatformError::NotFound(format!("project '{}'", key)));
        }
        Ok(())
    }

    async fn repo_exists(&self, name: &str) -> Result<bool, PlatformError> {
        Ok(self.inner.lock().unwrap().repos.contains(name))
    }

    async fn create_repo(&self, request: &CreateRepoRequest) -> Result<(), PlatformError> {
        if let Some(err) = self.take_failure(|f| match f {
            FailOn::CreateRepo(e) => Some(e.clone()),
            _ => None,
        }) {
            return Err(err);
        }

        let (rclass, members, default_deployment) = match &request.detail {
            RepoDetail::Local { .. } => ("local", Vec::new(), None),
            RepoDetail::Remote { .. } => ("remote", Vec::new(), None),
            RepoDetail::Virtual {
                members,
                default_deployment,
            } => ("virtual", members.clone(), Some(default_deployment.clone())),
        };

        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::CreateRepo {
            name: request.name.clone(),
            rclass: rclass.to_string(),
            package_type: request.package_type.clone(),
            members,
            default_deployment,
        });
        if !inner.repos.insert(request.name.clone()) {
            return Err(PlatformError::Conflict(format!("repo '{}'", request.name)));
        }
        Ok(())
    }

    async fn delete_repo(&self, name: &str) -> Result<(), PlatformError> {
        if let Some(err) = self.take_failure(|f| match f {
            FailOn::DeleteRepo(e) => Some(e.clone()),
            _ => None,
        }) {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::DeleteRepo {
            name: name.to_string(),
        });
        if !inner.repos.remove(name) {
            return Err(PlatformError::NotFound(format!("repo '{}'", name)));
        }
        Ok(())
    }

    async fn application_exists(&self, name: &str) -> Result<bool, PlatformError> {
        Ok(self.inner.lock().unwrap().applications.contains(name))
    }

    async fn create_application(
        &self,
        request: &CreateApplicationRequest,
    ) -> Result<(), PlatformError> {
        if let Some(err) = self.take_failure(|f| match f {
            FailOn::CreateApplication(e) => Some(e.clone()),
            _ => None,
        }) {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::CreateApplication {
            name: request.name.clone(),
            project_key: request.project_key.clone(),
        });
        if !inner.applications.insert(request.name.clone()) {
            return Err(PlatformError::Conflict(format!(
                "application '{}'",
                request.name
            )));
        }
        Ok(())
    }

    async fn delete_application(&self, name: &str) -> Result<(), PlatformError> {
        if let Some(err) = self.take_failure(|f| match f {
            FailOn::DeleteApplication(e) => Some(e.clone()),
            _ => None,
        }) {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::DeleteApplication {
            name: name.to_string(),
        });
        if !inner.applications.remove(name) {
            return Err(PlatformError::NotFound(format!("application '{}'", name)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_probe() {
        let platform = MockPlatform::new();
        assert!(!platform.stage_exists("dev").await.unwrap());
        platform.create_stage("dev").await.unwrap();
        assert!(platform.stage_exists("dev").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_create_is_conflict() {
        let platform = MockPlatform::new();
        platform.create_stage("dev").await.unwrap();
        assert!(matches!(
            platform.create_stage("dev").await,
            Err(PlatformError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let platform = MockPlatform::new();
        assert!(matches!(
            platform.delete_repo("nope").await,
            Err(PlatformError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn probes_are_not_recorded() {
        let platform = MockPlatform::new();
        platform.seed_repo("acme-maven-remote");
        let _ = platform.repo_exists("acme-maven-remote").await.unwrap();
        let _ = platform.project_exists("acme").await.unwrap();
        assert!(platform.operations().is_empty());
    }

    #[tokio::test]
    async fn fail_on_fires_once() {
        let platform = MockPlatform::new();
        platform.fail_on(FailOn::CreateStage(PlatformError::ApiError {
            status: 500,
            body: "boom".into(),
        }));

        assert!(platform.create_stage("dev").await.is_err());
        // Failure is consumed; the retry succeeds.
        platform.create_stage("dev").await.unwrap();
    }

    #[tokio::test]
    async fn visibility_lag_hides_created_project() {
        let platform = MockPlatform::new();
        platform.seed_project("acme");
        platform.set_project_visibility_lag(2);

        assert!(!platform.project_exists("acme").await.unwrap());
        assert!(!platform.project_exists("acme").await.unwrap());
        assert!(platform.project_exists("acme").await.unwrap());
    }
}
