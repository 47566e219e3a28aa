//! core::policy
//!
//! Package-type policy: the single source of truth for what the repository
//! tree of a package type looks like.
//!
//! # Design
//!
//! A raw configuration token (e.g., "python") resolves to a [`PackageType`]
//! with three facets:
//!
//! - the canonical type string the platform expects (e.g., "pypi"),
//! - a repository layout reference, defaulting to the generic layout for
//!   unknown types (unknown types are allowed, never an error),
//! - a structural [`Variant`]: which repositories exist for this type.
//!
//! The reconciler consults this table exclusively; it never special-cases a
//! package type directly.

/// Structural variant of a package type's repository tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// One local repo per stage, one remote, one virtual aggregating them.
    Full,
    /// One local repo per stage; no remote, no virtual.
    LocalOnly,
    /// Exactly one remote repo; no locals, no virtual.
    RemoteOnly,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Full => write!(f, "full"),
            Variant::LocalOnly => write!(f, "local-only"),
            Variant::RemoteOnly => write!(f, "remote-only"),
        }
    }
}

/// A resolved package type.
///
/// Known types are explicit variants; anything else falls through to
/// `Other`, which keeps the (lower-cased) raw token and degrades to generic
/// behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageType {
    Maven,
    Npm,
    Pypi,
    Docker,
    Go,
    Nuget,
    Cargo,
    Gems,
    Helm,
    MachineLearning,
    Vcs,
    Cocoapods,
    /// Unknown type; treated as generic.
    Other(String),
}

impl PackageType {
    /// Resolve a raw configuration token.
    ///
    /// Aliases map to their canonical type ("python" -> pypi, "golang" ->
    /// go, ...). Unknown tokens are accepted as [`PackageType::Other`].
    pub fn resolve(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "maven" | "java" => PackageType::Maven,
            "npm" | "node" | "nodejs" => PackageType::Npm,
            "pypi" | "python" => PackageType::Pypi,
            "docker" | "container" | "oci" => PackageType::Docker,
            "go" | "golang" => PackageType::Go,
            "nuget" | "dotnet" => PackageType::Nuget,
            "cargo" | "rust" => PackageType::Cargo,
            "gems" | "ruby" => PackageType::Gems,
            "helm" => PackageType::Helm,
            "machinelearning" | "ml" => PackageType::MachineLearning,
            "vcs" => PackageType::Vcs,
            "cocoapods" => PackageType::Cocoapods,
            other => PackageType::Other(other.to_string()),
        }
    }

    /// The canonical type string the platform expects in repository payloads.
    pub fn canonical(&self) -> &str {
        match self {
            PackageType::Maven => "maven",
            PackageType::Npm => "npm",
            PackageType::Pypi => "pypi",
            PackageType::Docker => "docker",
            PackageType::Go => "go",
            PackageType::Nuget => "nuget",
            PackageType::Cargo => "cargo",
            PackageType::Gems => "gems",
            PackageType::Helm => "helm",
            PackageType::MachineLearning => "machinelearning",
            PackageType::Vcs => "vcs",
            PackageType::Cocoapods => "cocoapods",
            PackageType::Other(raw) => raw,
        }
    }

    /// The repository layout reference for this type.
    ///
    /// Unknown types use the generic layout.
    pub fn layout_ref(&self) -> &'static str {
        match self {
            PackageType::Maven => "maven-2-default",
            PackageType::Npm => "npm-default",
            PackageType::Pypi => "simple-default",
            PackageType::Docker => "simple-default",
            PackageType::Go => "go-default",
            PackageType::Nuget => "nuget-default",
            PackageType::Cargo => "cargo-default",
            PackageType::Gems => "simple-default",
            PackageType::Helm => "simple-default",
            PackageType::MachineLearning
            | PackageType::Vcs
            | PackageType::Cocoapods
            | PackageType::Other(_) => "simple-default",
        }
    }

    /// Which repositories exist for this type.
    ///
    /// Machine-learning repositories hold only internally produced models
    /// (no upstream to proxy); VCS and CocoaPods exist on the platform only
    /// as proxies of an upstream. Everything else gets the full tree.
    pub fn variant(&self) -> Variant {
        match self {
            PackageType::MachineLearning => Variant::LocalOnly,
            PackageType::Vcs | PackageType::Cocoapods => Variant::RemoteOnly,
            _ => Variant::Full,
        }
    }
}
