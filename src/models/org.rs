//! Organization and group models.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::SnykClient;
use crate::error::{Result, SnykError};
use crate::traits::Get;

/// A Snyk organization.
///
/// Organizations are the billing/access scope that targets and projects
/// live under. An org optionally carries a back-reference to the group it
/// belongs to; groups themselves are never fetched directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Org {
    /// The organization ID (a UUID).
    pub id: String,

    /// Display name.
    pub name: String,

    /// URL slug, used to derive per-org export filenames.
    pub slug: String,

    /// The group this org belongs to, if any.
    #[serde(default)]
    pub group: Option<GroupRef>,
}

/// Back-reference from an organization to its owning group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRef {
    /// The group ID (a UUID).
    pub id: String,

    /// Group display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// v1 response wrapper for the org listing.
#[derive(Debug, Deserialize)]
struct OrgListResponse {
    orgs: Vec<Org>,
}

impl Org {
    /// List every organization visible to the caller's credentials.
    ///
    /// The v1 `orgs` listing is not paginated.
    #[tracing::instrument(skip(client))]
    pub async fn list_all(client: &SnykClient) -> Result<Vec<Org>> {
        let response = client.get_v1("orgs").await?;
        let data: OrgListResponse = response.json().await.map_err(SnykError::HttpError)?;
        Ok(data.orgs)
    }

    /// Resolve a group to its member organizations.
    ///
    /// The v1 listing has no server-side group filter, so this fetches the
    /// full org list and filters on each org's group back-reference.
    #[tracing::instrument(skip(client))]
    pub async fn in_group(client: &SnykClient, group_id: &str) -> Result<Vec<Org>> {
        let orgs = Self::list_all(client).await?;
        Ok(orgs
            .into_iter()
            .filter(|org| org.group.as_ref().is_some_and(|g| g.id == group_id))
            .collect())
    }
}

#[async_trait]
impl Get for Org {
    type Id = String; // Org ID

    /// Look up one organization by ID.
    ///
    /// The v1 API has no single-org lookup, so this lists and searches.
    #[tracing::instrument(skip(client))]
    async fn get(client: &SnykClient, id: String) -> Result<Self> {
        let orgs = Self::list_all(client).await?;
        orgs.into_iter()
            .find(|org| org.id == id)
            .ok_or(SnykError::NotFound {
                entity_type: "organization",
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_without_group_deserializes() {
        let org: Org = serde_json::from_str(
            r#"{"id": "o-1", "name": "Org One", "slug": "org-one"}"#,
        )
        .unwrap();
        assert_eq!(org.slug, "org-one");
        assert!(org.group.is_none());
    }

    #[test]
    fn test_org_group_backreference() {
        let org: Org = serde_json::from_str(
            r#"{"id": "o-1", "name": "Org One", "slug": "org-one",
                "group": {"id": "g-1", "name": "Group One"}}"#,
        )
        .unwrap();
        assert_eq!(org.group.unwrap().id, "g-1");
    }
}
