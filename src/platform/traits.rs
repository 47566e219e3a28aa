//! platform::traits
//!
//! Platform trait definition for interacting with the remote
//! package-management platform.
//!
//! # Design
//!
//! The `Platform` trait is async because every operation involves network
//! I/O. Methods come in two shapes:
//!
//! - **Probes** (`stage_exists`, `project_exists`, ...) are read-only and
//!   answer "does this resource exist right now". They never mutate.
//! - **Mutations** (`create_*`, `delete_*`) perform a single remote call.
//!   A remote conflict surfaces as [`PlatformError::Conflict`] and a
//!   missing delete target as [`PlatformError::NotFound`], so the caller
//!   decides whether those are fatal. For the reconciler they are not:
//!   conflict on create and absence on delete both mean the target state
//!   is already reached.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from platform operations.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// The remote reported a conflict (resource already exists).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The access token cannot be used as an HTTP header value.
    #[error("invalid access token")]
    InvalidToken,

    /// The platform rejected the call with an unexpected status.
    /// The response body is preserved for operator diagnosis.
    #[error("API error: {status} - {body}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body from the platform
        body: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Request to create a project.
#[derive(Debug, Clone)]
pub struct CreateProjectRequest {
    /// Unique project key
    pub key: String,
    /// Human-readable name
    pub display_name: String,
    /// Free-form description
    pub description: String,
}

/// Request to create a repository of any class.
#[derive(Debug, Clone)]
pub struct CreateRepoRequest {
    /// Derived repository name (globally unique)
    pub name: String,
    /// Canonical package type (e.g., "maven", "pypi")
    pub package_type: String,
    /// Repository layout reference
    pub layout_ref: String,
    /// Owning project key
    pub project_key: String,
    /// Class-specific payload
    pub detail: RepoDetail,
}

/// Class-specific part of a repository creation request.
#[derive(Debug, Clone)]
pub enum RepoDetail {
    /// Stage-scoped local repository.
    Local {
        /// Lifecycle stage the repository is scoped to (lower-cased)
        stage: String,
    },
    /// Caching proxy of an upstream source.
    Remote {
        /// Upstream URL; empty means the platform default for the type
        url: String,
    },
    /// Aggregate view over other repositories.
    Virtual {
        /// Member repository names, in resolution order
        members: Vec<String>,
        /// Member that receives uploads
        default_deployment: String,
    },
}

/// Request to create an application under a project.
#[derive(Debug, Clone)]
pub struct CreateApplicationRequest {
    /// Application name, globally unique
    pub name: String,
    /// Optional application key
    pub application_key: String,
    /// Free-form description
    pub description: String,
    /// Owning project key
    pub project_key: String,
}

/// The Platform trait for interacting with the remote system.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, PlatformError>`. Callers should handle:
/// - `Conflict`: The resource already exists (usually not an error)
/// - `NotFound`: The resource is absent (normal during teardown)
/// - `ApiError`: Display status and body to the operator
/// - `NetworkError`: Check connectivity
#[async_trait]
pub trait Platform: Send + Sync {
    /// Get the platform backend name (e.g., "rest", "mock").
    fn name(&self) -> &'static str;

    /// Check whether a lifecycle stage exists (stage name lower-cased).
    async fn stage_exists(&self, stage: &str) -> Result<bool, PlatformError>;

    /// Create a lifecycle stage.
    ///
    /// # Errors
    ///
    /// - `Conflict` if another process created the stage first
    async fn create_stage(&self, stage: &str) -> Result<(), PlatformError>;

    /// Check whether a project exists.
    async fn project_exists(&self, key: &str) -> Result<bool, PlatformError>;

    /// Create a project.
    ///
    /// The creation call may return before the project is queryable;
    /// callers that need the project to be visible must poll
    /// [`project_exists`](Platform::project_exists) afterwards.
    async fn create_project(&self, request: &CreateProjectRequest) -> Result<(), PlatformError>;

    /// Delete a project.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project does not exist
    async fn delete_project(&self, key: &str) -> Result<(), PlatformError>;

    /// Check whether a repository exists.
    async fn repo_exists(&self, name: &str) -> Result<bool, PlatformError>;

    /// Create a repository (local, remote, or virtual per the request).
    async fn create_repo(&self, request: &CreateRepoRequest) -> Result<(), PlatformError>;

    /// Delete a repository.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the repository does not exist
    async fn delete_repo(&self, name: &str) -> Result<(), PlatformError>;

    /// Check whether an application exists.
    async fn application_exists(&self, name: &str) -> Result<bool, PlatformError>;

    /// Create an application under its owning project.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the application already exists
    async fn create_application(
        &self,
        request: &CreateApplicationRequest,
    ) -> Result<(), PlatformError>;

    /// Delete an application.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the application does not exist
    async fn delete_application(&self, name: &str) -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_error_display() {
        assert_eq!(
            format!("{}", PlatformError::Conflict("stage 'dev'".into())),
            "conflict: stage 'dev'"
        );
        assert_eq!(
            format!("{}", PlatformError::NotFound("repo 'x'".into())),
            "not found: repo 'x'"
        );
        assert_eq!(
            format!(
                "{}",
                PlatformError::ApiError {
                    status: 400,
                    body: "bad payload".into()
                }
            ),
            "API error: 400 - bad payload"
        );
        assert_eq!(
            format!("{}", PlatformError::NetworkError("connection refused".into())),
            "network error: connection refused"
        );
        assert_eq!(format!("{}", PlatformError::InvalidToken), "invalid access token");
    }

    #[test]
    fn repo_detail_variants_carry_payload() {
        let detail = RepoDetail::Virtual {
            members: vec!["a".into(), "b".into()],
            default_deployment: "a".into(),
        };
        match detail {
            RepoDetail::Virtual {
                members,
                default_deployment,
            } => {
                assert_eq!(members, vec!["a", "b"]);
                assert_eq!(default_deployment, "a");
            }
            _ => unreachable!(),
        }
    }
}
