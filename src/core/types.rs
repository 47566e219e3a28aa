//! core::types
//!
//! Desired-state model: the in-memory representation of parsed configuration.
//!
//! # Types
//!
//! - [`ProjectSpec`] - One project and everything owned by it
//! - [`PackageTypeSpec`] - A package type declared for a project
//! - [`ApplicationSpec`] - An application owned by a project
//! - [`RepoKind`] - The three repository classes the platform knows
//!
//! # Lifecycle
//!
//! Specs are deserialized once from configuration documents and are
//! read-only for the rest of the run. Field defaults follow the document
//! format: missing lists are empty, missing strings are empty.

use serde::Deserialize;

/// One project to reconcile: the project itself plus the stages, package
/// types, and applications declared for it.
///
/// Stages are global to the platform and merely *referenced* here; the
/// project does not own them.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSpec {
    /// Unique lowercase project key (e.g., "acme").
    pub project_key: String,

    /// Human-readable project name.
    pub display_name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Lifecycle stages, in declaration order (e.g., ["DEV", "PROD"]).
    #[serde(default)]
    pub stages: Vec<String>,

    /// Package types whose repository trees this project needs.
    #[serde(default)]
    pub package_types: Vec<PackageTypeSpec>,

    /// Applications owned by this project.
    #[serde(default)]
    pub applications: Vec<ApplicationSpec>,
}

/// A package type declared for a project.
///
/// The raw `name` token is resolved through [`crate::core::policy`] into a
/// canonical type, a repository layout, and a structural variant.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageTypeSpec {
    /// Raw package-type token as written in configuration (e.g., "Maven").
    pub name: String,

    /// Upstream URL for the remote (proxy) repository, when the variant
    /// has one. Empty means the platform default.
    #[serde(default)]
    pub remote_url: String,
}

/// An application owned by exactly one project.
///
/// Created only after the owning project is confirmed to exist.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSpec {
    /// Application name, globally unique on the platform.
    pub name: String,

    /// Optional application key.
    #[serde(default, rename = "applicationKey")]
    pub application_key: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Repository class on the remote platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoKind {
    /// Stores artifacts produced internally, scoped to one stage.
    Local,
    /// Caching proxy for an external upstream source.
    Remote,
    /// Aggregate view over locals and the remote, with one default
    /// deployment member for uploads.
    Virtual,
}

impl std::fmt::Display for RepoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoKind::Local => write!(f, "local"),
            RepoKind::Remote => write!(f, "remote"),
            RepoKind::Virtual => write!(f, "virtual"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_spec_defaults_missing_lists() {
        let spec: ProjectSpec = serde_json::from_str(
            r#"{"project_key": "acme", "display_name": "Acme"}"#,
        )
        .unwrap();

        assert_eq!(spec.project_key, "acme");
        assert_eq!(spec.display_name, "Acme");
        assert_eq!(spec.description, "");
        assert!(spec.stages.is_empty());
        assert!(spec.package_types.is_empty());
        assert!(spec.applications.is_empty());
    }

    #[test]
    fn package_type_spec_defaults_remote_url() {
        let spec: PackageTypeSpec = serde_json::from_str(r#"{"name": "maven"}"#).unwrap();
        assert_eq!(spec.name, "maven");
        assert_eq!(spec.remote_url, "");
    }

    #[test]
    fn application_spec_uses_camel_case_key() {
        let spec: ApplicationSpec = serde_json::from_str(
            r#"{"name": "billing", "applicationKey": "bill", "description": "Billing service"}"#,
        )
        .unwrap();

        assert_eq!(spec.name, "billing");
        assert_eq!(spec.application_key, "bill");
        assert_eq!(spec.description, "Billing service");
    }

    #[test]
    fn application_spec_defaults_optional_fields() {
        let spec: ApplicationSpec = serde_json::from_str(r#"{"name": "billing"}"#).unwrap();
        assert_eq!(spec.application_key, "");
        assert_eq!(spec.description, "");
    }

    #[test]
    fn repo_kind_display() {
        assert_eq!(format!("{}", RepoKind::Local), "local");
        assert_eq!(format!("{}", RepoKind::Remote), "remote");
        assert_eq!(format!("{}", RepoKind::Virtual), "virtual");
    }
}
