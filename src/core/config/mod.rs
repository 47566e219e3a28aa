//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Quartermaster has two configuration inputs:
//!
//! - **Settings**: platform endpoint and access token, taken from CLI flags
//!   or the `QM_PLATFORM_URL` / `QM_ACCESS_TOKEN` environment variables
//! - **Project documents**: a directory of JSON files, each containing a
//!   `projects` list (see [`schema`])
//!
//! Both are resolved fully before any remote call is attempted; missing
//! required configuration is fatal up front.

pub mod schema;

pub use schema::ProjectsDocument;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::types::ProjectSpec;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no project documents (*.json) found in '{dir}'")]
    NoDocuments { dir: PathBuf },

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("platform URL not set (use --platform-url or QM_PLATFORM_URL)")]
    MissingPlatformUrl,

    #[error("access token not set (use --token or QM_ACCESS_TOKEN)")]
    MissingToken,
}

/// Resolved connection settings for the remote platform.
///
/// Constructed once at process entry and passed into the engine; there are
/// no ambient globals.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the platform (no trailing slash).
    pub base_url: String,
    /// Bearer token attached to every request.
    pub token: String,
}

impl Settings {
    /// Build settings from already-resolved flag/env values.
    ///
    /// # Errors
    ///
    /// Returns `MissingPlatformUrl` / `MissingToken` when a value is absent
    /// or empty, before any remote call is attempted.
    pub fn new(base_url: Option<String>, token: Option<String>) -> Result<Self, ConfigError> {
        let base_url = match base_url {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => return Err(ConfigError::MissingPlatformUrl),
        };
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(ConfigError::MissingToken),
        };
        Ok(Settings { base_url, token })
    }
}

/// Load every project spec from the `*.json` documents in a directory.
///
/// Files are read in sorted order so runs are deterministic regardless of
/// directory iteration order.
///
/// # Errors
///
/// - `NoDocuments` if the directory holds no `*.json` files
/// - `ReadError` / `ParseError` for unreadable or malformed documents
pub fn load_projects(dir: &Path) -> Result<Vec<ProjectSpec>, ConfigError> {
    let entries = fs::read_dir(dir).map_err(|source| ConfigError::ReadError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(ConfigError::NoDocuments {
            dir: dir.to_path_buf(),
        });
    }

    let mut projects = Vec::new();
    for path in files {
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;
        let doc: ProjectsDocument =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                message: e.to_string(),
            })?;
        projects.extend(doc.projects);
    }

    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_doc(dir: &Path, name: &str, contents: &str) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn settings_require_url_and_token() {
        assert!(matches!(
            Settings::new(None, Some("t".into())),
            Err(ConfigError::MissingPlatformUrl)
        ));
        assert!(matches!(
            Settings::new(Some("https://x".into()), None),
            Err(ConfigError::MissingToken)
        ));
        assert!(matches!(
            Settings::new(Some("".into()), Some("t".into())),
            Err(ConfigError::MissingPlatformUrl)
        ));
    }

    #[test]
    fn settings_trim_trailing_slash() {
        let s = Settings::new(Some("https://x.example/".into()), Some("t".into())).unwrap();
        assert_eq!(s.base_url, "https://x.example");
    }

    #[test]
    fn load_projects_concatenates_documents_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "b.json",
            r#"{"projects": [{"project_key": "beta", "display_name": "Beta"}]}"#,
        );
        write_doc(
            dir.path(),
            "a.json",
            r#"{"projects": [{"project_key": "alpha", "display_name": "Alpha"}]}"#,
        );

        let projects = load_projects(dir.path()).unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].project_key, "alpha");
        assert_eq!(projects[1].project_key, "beta");
    }

    #[test]
    fn load_projects_fails_on_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_projects(dir.path()),
            Err(ConfigError::NoDocuments { .. })
        ));
    }

    #[test]
    fn load_projects_ignores_non_json_files() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "notes.txt", "not json");
        write_doc(
            dir.path(),
            "p.json",
            r#"{"projects": [{"project_key": "acme", "display_name": "Acme"}]}"#,
        );

        let projects = load_projects(dir.path()).unwrap();
        assert_eq!(projects.len(), 1);
    }

    #[test]
    fn load_projects_surfaces_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "bad.json", "{not json");
        assert!(matches!(
            load_projects(dir.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
