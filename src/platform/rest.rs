//! platform::rest
//!
//! REST implementation of the `Platform` trait using `reqwest`.
//!
//! # Design
//!
//! The platform exposes four resource families under one base URL:
//!
//! - Stages:       `/access/api/v2/stages/{name}`
//! - Projects:     `/access/api/v1/projects/{key}`
//! - Repositories: `/artifactory/api/repositories/{name}`
//! - Applications: `/apptrust/api/v1/applications/{name}`
//!
//! All requests carry a bearer token. Existence probes are plain GETs:
//! 2xx means present, 404 means absent, anything else propagates as
//! [`PlatformError::ApiError`]. Mutations map 409 to
//! [`PlatformError::Conflict`] and 404 to [`PlatformError::NotFound`];
//! other non-success statuses surface status and body for diagnosis.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;

use super::traits::{
    CreateApplicationRequest, CreateProjectRequest, CreateRepoRequest, Platform, PlatformError,
    RepoDetail,
};
use crate::core::config::Settings;

/// REST platform client.
///
/// Holds a connection pool and the resolved [`Settings`]; cheap to share by
/// reference for the duration of a run.
pub struct RestPlatform {
    /// HTTP client for making requests
    client: Client,
    /// Base URL of the platform (no trailing slash)
    base_url: String,
    /// Pre-built headers (bearer token + content type)
    headers: HeaderMap,
}

// Custom Debug to avoid exposing the token held in headers.
impl std::fmt::Debug for RestPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestPlatform")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RestPlatform {
    /// Create a REST platform client from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidToken` if the token contains bytes
    /// that cannot appear in an HTTP header.
    pub fn new(settings: &Settings) -> Result<Self, PlatformError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", settings.token))
            .map_err(|_| PlatformError::InvalidToken)?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            client: Client::new(),
            base_url: settings.base_url.clone(),
            headers,
        })
    }

    fn stage_url(&self, stage: &str) -> String {
        format!("{}/access/api/v2/stages/{}", self.base_url, stage)
    }

    fn stages_url(&self) -> String {
        format!("{}/access/api/v2/stages/", self.base_url)
    }

    fn project_url(&self, key: &str) -> String {
        format!("{}/access/api/v1/projects/{}", self.base_url, key)
    }

    fn projects_url(&self) -> String {
        format!("{}/access/api/v1/projects", self.base_url)
    }

    fn repo_url(&self, name: &str) -> String {
        format!("{}/artifactory/api/repositories/{}", self.base_url, name)
    }

    fn app_url(&self, name: &str) -> String {
        format!("{}/apptrust/api/v1/applications/{}", self.base_url, name)
    }

    fn apps_url(&self) -> String {
        format!("{}/apptrust/api/v1/applications", self.base_url)
    }

    /// Existence probe: GET the resource URL and interpret the status.
    async fn probe(&self, url: &str) -> Result<bool, PlatformError> {
        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| PlatformError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PlatformError::ApiError {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Map a mutation response to the error taxonomy.
    async fn check_mutation(&self, response: Response) -> Result<(), PlatformError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::CONFLICT => PlatformError::Conflict(body),
            StatusCode::NOT_FOUND => PlatformError::NotFound(body),
            _ => PlatformError::ApiError {
                status: status.as_u16(),
                body,
            },
        })
    }

    async fn post<B: Serialize>(&self, url: &str, body: &B) -> Result<(), PlatformError> {
        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| PlatformError::NetworkError(e.to_string()))?;
        self.check_mutation(response).await
    }

    async fn put<B: Serialize>(&self, url: &str, body: &B) -> Result<(), PlatformError> {
        let response = self
            .client
            .put(url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| PlatformError::NetworkError(e.to_string()))?;
        self.check_mutation(response).await
    }

    async fn delete(&self, url: &str) -> Result<(), PlatformError> {
        let response = self
            .client
            .delete(url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| PlatformError::NetworkError(e.to_string()))?;
        self.check_mutation(response).await
    }
}

#[async_trait]
impl Platform for RestPlatform {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn stage_exists(&self, stage: &str) -> Result<bool, PlatformError> {
        self.probe(&self.stage_url(stage)).await
    }

    async fn create_stage(&self, stage: &str) -> Result<(), PlatformError> {
        let body = StageBody {
            name: stage,
            description: &format!("{} lifecycle stage", stage),
        };
        self.post(&self.stages_url(), &body).await
    }

    async fn project_exists(&self, key: &str) -> Result<bool, PlatformError> {
        self.probe(&self.project_url(key)).await
    }

    async fn create_project(&self, request: &CreateProjectRequest) -> Result<(), PlatformError> {
        let body = ProjectBody {
            project_key: &request.key,
            display_name: &request.display_name,
            description: &request.description,
        };
        self.post(&self.projects_url(), &body).await
    }

    async fn delete_project(&self, key: &str) -> Result<(), PlatformError> {
        self.delete(&self.project_url(key)).await
    }

    async fn repo_exists(&self, name: &str) -> Result<bool, PlatformError> {
        self.probe(&self.repo_url(name)).await
    }

    async fn create_repo(&self, request: &CreateRepoRequest) -> Result<(), PlatformError> {
        let url = self.repo_url(&request.name);
        match &request.detail {
            RepoDetail::Local { stage } => {
                let body = LocalRepoBody {
                    rclass: "local",
                    package_type: &request.package_type,
                    repo_layout_ref: &request.layout_ref,
                    project_key: &request.project_key,
                    xray_index: true,
                    properties: RepoProperties {
                        env: vec![stage.clone()],
                        project: vec![request.project_key.clone()],
                    },
                };
                self.put(&url, &body).await
            }
            RepoDetail::Remote { url: upstream } => {
                let body = RemoteRepoBody {
                    rclass: "remote",
                    package_type: &request.package_type,
                    repo_layout_ref: &request.layout_ref,
                    url: upstream,
                    project_key: &request.project_key,
                };
                self.put(&url, &body).await
            }
            RepoDetail::Virtual {
                members,
                default_deployment,
            } => {
                let body = VirtualRepoBody {
                    rclass: "virtual",
                    package_type: &request.package_type,
                    repositories: members,
                    default_deployment_repo: default_deployment,
                    project_key: &request.project_key,
                };
                self.put(&url, &body).await
            }
        }
    }

    async fn delete_repo(&self, name: &str) -> Result<(), PlatformError> {
        self.delete(&self.repo_url(name)).await
    }

    async fn application_exists(&self, name: &str) -> Result<bool, PlatformError> {
        self.probe(&self.app_url(name)).await
    }

    async fn create_application(
        &self,
        request: &CreateApplicationRequest,
    ) -> Result<(), PlatformError> {
        let body = ApplicationBody {
            application_name: &request.name,
            application_key: &request.application_key,
            description: &request.description,
            project_key: &request.project_key,
        };
        self.post(&self.apps_url(), &body).await
    }

    async fn delete_application(&self, name: &str) -> Result<(), PlatformError> {
        self.delete(&self.app_url(name)).await
    }
}

// --------------------------------------------------------------------------
// API Request Types
// --------------------------------------------------------------------------

/// Request body for creating a stage.
#[derive(Serialize)]
struct StageBody<'a> {
    name: &'a str,
    description: &'a str,
}

/// Request body for creating a project.
#[derive(Serialize)]
struct ProjectBody<'a> {
    project_key: &'a str,
    display_name: &'a str,
    description: &'a str,
}

/// Request body for creating a local repository.
#[derive(Serialize)]
struct LocalRepoBody<'a> {
    rclass: &'a str,
    #[serde(rename = "packageType")]
    package_type: &'a str,
    #[serde(rename = "repoLayoutRef")]
    repo_layout_ref: &'a str,
    #[serde(rename = "projectKey")]
    project_key: &'a str,
    #[serde(rename = "xrayIndex")]
    xray_index: bool,
    properties: RepoProperties,
}

/// Stage/project tags attached to a local repository.
#[derive(Serialize)]
struct RepoProperties {
    env: Vec<String>,
    project: Vec<String>,
}

/// Request body for creating a remote repository.
#[derive(Serialize)]
struct RemoteRepoBody<'a> {
    rclass: &'a str,
    #[serde(rename = "packageType")]
    package_type: &'a str,
    #[serde(rename = "repoLayoutRef")]
    repo_layout_ref: &'a str,
    url: &'a str,
    #[serde(rename = "projectKey")]
    project_key: &'a str,
}

/// Request body for creating an application.
#[derive(Serialize)]
struct ApplicationBody<'a> {
    application_name: &'a str,
    application_key: &'a str,
    description: &'a str,
    project_key: &'a str,
}

/// Request body for creating a virtual repository.
#[derive(Serialize)]
struct VirtualRepoBody<'a> {
    rclass: &'a str,
    #[serde(rename = "packageType")]
    package_type: &'a str,
    repositories: &'a [String],
    #[serde(rename = "defaultDeploymentRepo")]
    default_deployment_repo: &'a str,
    #[serde(rename = "projectKey")]
    project_key: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base: &str) -> Settings {
        Settings {
            base_url: base.to_string(),
            token: "test-token".to_string(),
        }
    }

    #[test]
    fn new_builds_bearer_header() {
        let platform = RestPlatform::new(&settings("https://platform.example")).unwrap();
        assert_eq!(platform.name(), "rest");
        assert_eq!(
            platform.headers.get(AUTHORIZATION).unwrap(),
            "Bearer test-token"
        );
    }

    #[test]
    fn new_rejects_unusable_token() {
        let bad = Settings {
            base_url: "https://platform.example".to_string(),
            token: "line\nbreak".to_string(),
        };
        assert!(matches!(
            RestPlatform::new(&bad),
            Err(PlatformError::InvalidToken)
        ));
    }

    #[test]
    fn url_builders() {
        let platform = RestPlatform::new(&settings("https://platform.example")).unwrap();
        assert_eq!(
            platform.stage_url("dev"),
            "https://platform.example/access/api/v2/stages/dev"
        );
        assert_eq!(
            platform.project_url("acme"),
            "https://platform.example/access/api/v1/projects/acme"
        );
        assert_eq!(
            platform.repo_url("acme-maven-virtual"),
            "https://platform.example/artifactory/api/repositories/acme-maven-virtual"
        );
        assert_eq!(
            platform.app_url("billing"),
            "https://platform.example/apptrust/api/v1/applications/billing"
        );
    }

    #[test]
    fn debug_redacts_token() {
        let platform = RestPlatform::new(&settings("https://platform.example")).unwrap();
        let debug_output = format!("{:?}", platform);
        assert!(!debug_output.contains("test-token"));
        assert!(debug_output.contains("base_url"));
    }

    #[test]
    fn virtual_body_serializes_platform_field_names() {
        let body = VirtualRepoBody {
            rclass: "virtual",
            package_type: "maven",
            repositories: &["a".to_string(), "b".to_string()],
            default_deployment_repo: "a",
            project_key: "acme",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["rclass"], "virtual");
        assert_eq!(json["packageType"], "maven");
        assert_eq!(json["defaultDeploymentRepo"], "a");
        assert_eq!(json["projectKey"], "acme");
        assert_eq!(json["repositories"][1], "b");
    }

    #[test]
    fn local_body_serializes_stage_properties() {
        let body = LocalRepoBody {
            rclass: "local",
            package_type: "maven",
            repo_layout_ref: "maven-2-default",
            project_key: "acme",
            xray_index: true,
            properties: RepoProperties {
                env: vec!["dev".to_string()],
                project: vec!["acme".to_string()],
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["xrayIndex"], true);
        assert_eq!(json["repoLayoutRef"], "maven-2-default");
        assert_eq!(json["properties"]["env"][0], "dev");
        assert_eq!(json["properties"]["project"][0], "acme");
    }
}
