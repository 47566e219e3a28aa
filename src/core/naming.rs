//! core::naming
//!
//! Deterministic repository naming.
//!
//! # Rules
//!
//! Repository names are globally unique on the platform, so they are derived
//! from the owning project, the package type, and the repository's role:
//!
//! ```text
//! lower(<project_key>-<package_name>-<role_suffix>)
//! ```
//!
//! where the role suffix is `<stage>-local`, `remote`, or `virtual`. The
//! derivation is a pure function of its inputs and lower-cases everything,
//! so re-runs with differently-cased configuration always resolve to the
//! same remote resource.

use crate::core::types::RepoKind;

/// The role a repository plays within a package type's tree.
///
/// Determines the trailing segment of the derived name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoRole {
    /// Stage-scoped local repository (suffix `<stage>-local`).
    Local { stage: String },
    /// The single caching proxy (suffix `remote`).
    Remote,
    /// The aggregate view (suffix `virtual`).
    Virtual,
}

impl RepoRole {
    /// The repository class this role maps to.
    pub fn kind(&self) -> RepoKind {
        match self {
            RepoRole::Local { .. } => RepoKind::Local,
            RepoRole::Remote => RepoKind::Remote,
            RepoRole::Virtual => RepoKind::Virtual,
        }
    }

    /// The name suffix for this role, lower-cased.
    fn suffix(&self) -> String {
        match self {
            RepoRole::Local { stage } => format!("{}-local", stage.to_lowercase()),
            RepoRole::Remote => "remote".to_string(),
            RepoRole::Virtual => "virtual".to_string(),
        }
    }
}

/// Derive the canonical repository name for a role within a project's
/// package-type tree.
///
/// # Example
///
/// ```
/// use quartermaster::core::naming::{repo_name, RepoRole};
///
/// let name = repo_name("acme", "Maven", &RepoRole::Local { stage: "DEV".into() });
/// assert_eq!(name, "acme-maven-dev-local");
///
/// let name = repo_name("acme", "maven", &RepoRole::Virtual);
/// assert_eq!(name, "acme-maven-virtual");
/// ```
pub fn repo_name(project_key: &str, package_name: &str, role: &RepoRole) -> String {
    format!(
        "{}-{}-{}",
        project_key.to_lowercase(),
        package_name.to_lowercase(),
        role.suffix()
    )
}
