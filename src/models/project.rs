//! Project models and trait implementations.
//!
//! Projects surface through both API versions: the REST API lists
//! lightweight summaries per target, while the v1 API serves the detail
//! and settings documents the export is enriched from.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::SnykClient;
use crate::error::{Result, SnykError};
use crate::traits::{Get, List};

/// Origins that represent a source-control integration.
///
/// Projects from these origins carry repository-level settings (branch,
/// exclusion rules, PR checks) that the export merges into the row.
pub const SCM_ORIGINS: [&str; 6] = [
    "azure-repos",
    "bitbucket-cloud",
    "bitbucket-server",
    "github",
    "github-enterprise",
    "gitlab",
];

/// Separator for joining `key=value` tag filters into one query value.
pub const TAG_SEPARATOR: &str = ":";

/// Whether an origin names a recognized source-control platform.
#[must_use]
pub fn is_scm_origin(origin: &str) -> bool {
    SCM_ORIGINS.contains(&origin)
}

/// A project as returned by the REST listing: ID plus light attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// The project ID (a UUID).
    pub id: String,

    /// Summary attributes.
    #[serde(default)]
    pub attributes: ProjectSummaryAttributes,
}

/// The subset of listing attributes the exporter looks at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSummaryAttributes {
    /// Project name, e.g. `acme/widgets:package.json`.
    #[serde(default)]
    pub name: Option<String>,

    /// Integration origin.
    #[serde(default)]
    pub origin: Option<String>,

    /// Lifecycle status; listings are filtered to "active".
    #[serde(default)]
    pub status: Option<String>,
}

/// Query parameters for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectQuery {
    /// Restrict to projects of one target. `None` means org-wide.
    pub target_id: Option<String>,

    /// Tag filters in `key=value` form, joined with [`TAG_SEPARATOR`].
    pub tags: Vec<String>,
}

#[async_trait]
impl List for ProjectSummary {
    type Query = ProjectQuery;

    fn collection_path(org_id: &str) -> String {
        format!("orgs/{org_id}/projects")
    }

    fn query_params(query: &Self::Query) -> Vec<(&'static str, String)> {
        let mut params = vec![("status", "active".to_string())];

        if let Some(target_id) = &query.target_id {
            params.push(("targetId", target_id.clone()));
        }
        if !query.tags.is_empty() {
            params.push(("tags", query.tags.join(TAG_SEPARATOR)));
        }

        params
    }
}

/// Identifies one project within one organization, for v1 lookups.
#[derive(Debug, Clone)]
pub struct ProjectRef {
    /// The owning organization's ID.
    pub org_id: String,
    /// The project ID.
    pub project_id: String,
}

impl ProjectRef {
    /// Create a reference from an org ID and project ID.
    #[must_use]
    pub fn new(org_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            project_id: project_id.into(),
        }
    }

    fn detail_path(&self) -> String {
        format!(
            "org/{}/project/{}",
            urlencoding::encode(&self.org_id),
            urlencoding::encode(&self.project_id)
        )
    }

    fn settings_path(&self) -> String {
        format!("{}/settings", self.detail_path())
    }
}

/// Project detail from the v1 API, restricted to the exported fields.
///
/// The v1 document carries many more fields; deserialization drops
/// everything outside this allow-list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    /// Project name.
    pub name: String,

    /// Link to the project in the Snyk UI.
    #[serde(default)]
    pub browse_url: Option<String>,

    /// Project type, e.g. "npm" or "dockerfile".
    #[serde(rename = "type", default)]
    pub project_type: Option<String>,

    /// How often the project is re-tested, e.g. "daily".
    #[serde(default)]
    pub test_frequency: Option<String>,

    /// When the project was last tested.
    #[serde(default)]
    pub last_tested_date: Option<DateTime<Utc>>,

    /// Integration origin, e.g. "github" or "cli".
    pub origin: String,

    /// Open issue counts by severity.
    #[serde(rename = "issueCountsBySeverity", default)]
    pub issue_counts: IssueCounts,
}

impl ProjectDetail {
    /// Whether this project's origin is a recognized source-control
    /// platform and so carries repository settings.
    #[must_use]
    pub fn has_scm_settings(&self) -> bool {
        is_scm_origin(&self.origin)
    }
}

/// Open issue counts by severity for one project.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IssueCounts {
    #[serde(default)]
    pub low: u32,
    #[serde(default)]
    pub medium: u32,
    #[serde(default)]
    pub high: u32,
    #[serde(default)]
    pub critical: u32,
}

impl IssueCounts {
    /// Severity names paired with counts, in ascending severity order.
    #[must_use]
    pub fn by_severity(&self) -> [(&'static str, u32); 4] {
        [
            ("low", self.low),
            ("medium", self.medium),
            ("high", self.high),
            ("critical", self.critical),
        ]
    }
}

#[async_trait]
impl Get for ProjectDetail {
    type Id = ProjectRef;

    #[tracing::instrument(skip(client))]
    async fn get(client: &SnykClient, id: ProjectRef) -> Result<Self> {
        let response = client.get_v1(&id.detail_path()).await?;
        let detail: ProjectDetail = response.json().await.map_err(SnykError::HttpError)?;
        Ok(detail)
    }
}

/// Repository-level settings for a source-control-backed project.
///
/// The settings document is a flat object whose field set varies by
/// integration, so it is kept as an ordered map rather than a struct.
/// Iteration order (and thus column order in the export) is alphabetical.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectSettings(pub BTreeMap<String, serde_json::Value>);

impl ProjectSettings {
    /// Look up one settings field.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Iterate over settings fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }
}

#[async_trait]
impl Get for ProjectSettings {
    type Id = ProjectRef;

    #[tracing::instrument(skip(client))]
    async fn get(client: &SnykClient, id: ProjectRef) -> Result<Self> {
        let response = client.get_v1(&id.settings_path()).await?;
        let settings: ProjectSettings = response.json().await.map_err(SnykError::HttpError)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scm_origins() {
        assert!(is_scm_origin("github"));
        assert!(is_scm_origin("bitbucket-server"));
        assert!(!is_scm_origin("cli"));
        assert!(!is_scm_origin("docker-hub"));
    }

    #[test]
    fn test_project_query_always_filters_active() {
        let params = ProjectSummary::query_params(&ProjectQuery::default());
        assert_eq!(params, vec![("status", "active".to_string())]);
    }

    #[test]
    fn test_project_query_joins_tags() {
        let query = ProjectQuery {
            target_id: Some("t-1".to_string()),
            tags: vec!["env=prod".to_string(), "team=core".to_string()],
        };
        let params = ProjectSummary::query_params(&query);
        assert!(params.contains(&("targetId", "t-1".to_string())));
        assert!(params.contains(&("tags", "env=prod:team=core".to_string())));
    }

    #[test]
    fn test_detail_allow_list() {
        let detail: ProjectDetail = serde_json::from_str(
            r#"{"name": "acme/widgets:package.json",
                "browseUrl": "https://app.snyk.io/org/acme/project/p-1",
                "type": "npm",
                "testFrequency": "daily",
                "origin": "github",
                "readOnly": false,
                "totalDependencies": 42,
                "issueCountsBySeverity": {"low": 1, "medium": 2, "high": 3, "critical": 0}}"#,
        )
        .unwrap();
        assert_eq!(detail.project_type.as_deref(), Some("npm"));
        assert_eq!(detail.issue_counts.high, 3);
        assert!(detail.has_scm_settings());
    }

    #[test]
    fn test_missing_issue_counts_default_to_zero() {
        let detail: ProjectDetail =
            serde_json::from_str(r#"{"name": "img", "origin": "docker-hub"}"#).unwrap();
        assert_eq!(detail.issue_counts.critical, 0);
        assert!(!detail.has_scm_settings());
    }
}
