//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::SnykClient;
use crate::error::Result;

/// Fetch a single entity by ID from the v1 API.
///
/// Implement this trait for entity types that can be fetched individually
/// by a unique identifier.
///
/// # Example
///
/// ```ignore
/// use snyk_export::{SnykClient, ProjectDetail, ProjectRef, Get};
///
/// let client = SnykClient::from_env()?;
/// let detail = ProjectDetail::get(&client, ProjectRef::new("org-id", "project-id")).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity (e.g., a UUID string or an org/project pair).
    type Id: Send;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(client: &SnykClient, id: Self::Id) -> Result<Self>;
}
