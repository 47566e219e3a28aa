//! core::config::schema
//!
//! On-disk schema for project configuration documents.
//!
//! A configuration directory holds one or more JSON documents, each with a
//! top-level `projects` list of [`ProjectSpec`]s. Multiple documents are
//! concatenated in file order; there is no cross-document merging.

use serde::Deserialize;

use crate::core::types::ProjectSpec;

/// One configuration document.
///
/// # Example document
///
/// ```json
/// {
///   "projects": [
///     {
///       "project_key": "acme",
///       "display_name": "Acme",
///       "stages": ["DEV", "PROD"],
///       "package_types": [{"name": "maven"}],
///       "applications": [{"name": "acme-api"}]
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsDocument {
    /// Projects described by this document.
    #[serde(default)]
    pub projects: Vec<ProjectSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let doc: ProjectsDocument = serde_json::from_str(
            r#"{
                "projects": [{
                    "project_key": "acme",
                    "display_name": "Acme",
                    "stages": ["DEV", "PROD"],
                    "package_types": [{"name": "maven", "remote_url": "https://repo1.maven.org/maven2"}],
                    "applications": [{"name": "acme-api", "applicationKey": "api"}]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.projects.len(), 1);
        let p = &doc.projects[0];
        assert_eq!(p.project_key, "acme");
        assert_eq!(p.stages, vec!["DEV", "PROD"]);
        assert_eq!(p.package_types[0].remote_url, "https://repo1.maven.org/maven2");
        assert_eq!(p.applications[0].application_key, "api");
    }

    #[test]
    fn empty_document_has_no_projects() {
        let doc: ProjectsDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.projects.is_empty());
    }
}
