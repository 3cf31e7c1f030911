//! List trait for enumerating REST API collections.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::client::SnykClient;
use crate::error::Result;
use crate::pagination::{self, DEFAULT_LIMIT};

/// List entities from an organization-scoped REST collection.
///
/// Implementors describe the collection path and the query parameters
/// their query type contributes; the default [`List::list_all`] drives the
/// cursor-pagination loop and returns the complete, source-ordered set.
///
/// # Example
///
/// ```ignore
/// use snyk_export::{SnykClient, Target, TargetQuery, List};
///
/// let client = SnykClient::from_env()?;
/// let targets = Target::list_all(&client, "org-id", &TargetQuery::default()).await?;
/// ```
#[async_trait]
pub trait List: Sized + DeserializeOwned + Send {
    /// Query parameters for filtering.
    type Query: Default + Send + Sync;

    /// Collection path under the REST base, e.g. `orgs/{org_id}/targets`.
    fn collection_path(org_id: &str) -> String;

    /// Query parameters contributed by this query, excluding `limit`.
    fn query_params(query: &Self::Query) -> Vec<(&'static str, String)>;

    /// List all entities matching the query (fetches all pages).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails; no partial result is
    /// returned.
    async fn list_all(client: &SnykClient, org_id: &str, query: &Self::Query) -> Result<Vec<Self>> {
        let mut params = vec![("limit", DEFAULT_LIMIT.to_string())];
        params.extend(Self::query_params(query));

        pagination::fetch_all(client, &Self::collection_path(org_id), &params).await
    }
}
