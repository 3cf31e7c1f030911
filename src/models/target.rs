//! Target model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::traits::List;

/// A monitored source repository ("target") tracked by the platform.
///
/// Targets group the projects that were scanned out of one repository
/// (or container image, CLI upload, etc.). The origin names the
/// integration the target was registered through and never changes for
/// the lifetime of an export run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// The target ID (a UUID).
    pub id: String,

    /// Target attributes.
    pub attributes: TargetAttributes,
}

/// Attributes of a target as returned by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAttributes {
    /// Human-readable name, e.g. `my-org/my-repo`.
    pub display_name: String,

    /// Integration type the target was registered through, e.g. "github".
    #[serde(default)]
    pub origin: Option<String>,

    /// Whether the underlying repository is private.
    #[serde(default)]
    pub is_private: bool,

    /// Remote URL of the repository, when known.
    #[serde(default)]
    pub remote_url: Option<String>,
}

impl Target {
    /// Human-readable name, copied onto each exported row as `repoName`.
    pub fn display_name(&self) -> &str {
        &self.attributes.display_name
    }
}

/// Query parameters for listing targets.
#[derive(Debug, Clone, Default)]
pub struct TargetQuery {
    /// Filter to one integration origin. `None` or `"all"` mean unfiltered.
    pub origin: Option<String>,
}

impl TargetQuery {
    /// Build a query from an integration-name argument, where the special
    /// value `"all"` means no filter.
    #[must_use]
    pub fn for_integration(integration: &str) -> Self {
        Self {
            origin: match integration {
                "all" => None,
                other => Some(other.to_string()),
            },
        }
    }
}

#[async_trait]
impl List for Target {
    type Query = TargetQuery;

    fn collection_path(org_id: &str) -> String {
        format!("orgs/{org_id}/targets")
    }

    fn query_params(query: &Self::Query) -> Vec<(&'static str, String)> {
        match query.origin.as_deref() {
            Some(origin) if origin != "all" => vec![("origin", origin.to_string())],
            _ => Vec::new(),
        }
    }
}
