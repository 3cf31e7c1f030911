//! Pagination over Snyk REST API collection documents.
//!
//! The REST API returns JSON:API-style documents: a `data` array plus a
//! `links` object whose `next` member, when present, points at the next
//! page (with the cursor and `version` parameters already baked in).
//! [`fetch_all`] composes single-page fetches into full enumeration.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::client::SnykClient;
use crate::error::Result;

/// Default (and maximum) page size for REST collection requests.
pub const DEFAULT_LIMIT: u32 = 100;

/// Maximum pages to fetch (safety limit against a cyclic `next` link).
const MAX_PAGES: u32 = 1000;

/// A single page of a REST collection response.
#[derive(Debug, Deserialize)]
pub struct CollectionDocument<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Pagination links.
    #[serde(default)]
    pub links: Links,
}

/// Pagination links attached to a collection document.
#[derive(Debug, Default, Deserialize)]
pub struct Links {
    /// Path of the next page, absent on the final page.
    #[serde(default)]
    pub next: Option<String>,
}

/// Fetch every page of a REST collection, in source order.
///
/// The first page is requested with the given query parameters; subsequent
/// pages follow each document's `links.next` verbatim until the source
/// reports no further pages. Every item from every page is returned, with
/// no duplicates and no omissions; a failure fetching any page propagates
/// rather than returning a partial result.
#[tracing::instrument(skip(client, params))]
pub async fn fetch_all<T: DeserializeOwned>(
    client: &SnykClient,
    path: &str,
    params: &[(&str, String)],
) -> Result<Vec<T>> {
    let mut all_items = Vec::new();

    let response = client.get_rest(path, params).await?;
    let mut document: CollectionDocument<T> = response.json().await?;
    all_items.append(&mut document.data);

    let mut pages = 1;
    while let Some(next) = document.links.next.take() {
        pages += 1;
        if pages > MAX_PAGES {
            tracing::warn!("reached pagination limit of {MAX_PAGES} pages, stopping");
            break;
        }

        let response = client.get_rest_link(&next).await?;
        document = response.json().await?;
        all_items.append(&mut document.data);
    }

    tracing::debug!(items = all_items.len(), pages, path, "collection exhausted");
    Ok(all_items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_default_to_none() {
        let document: CollectionDocument<u32> =
            serde_json::from_str(r#"{"data": [1, 2, 3]}"#).unwrap();
        assert_eq!(document.data, vec![1, 2, 3]);
        assert!(document.links.next.is_none());
    }

    #[test]
    fn test_next_link_deserializes() {
        let document: CollectionDocument<u32> = serde_json::from_str(
            r#"{"data": [], "links": {"next": "/orgs/o1/targets?starting_after=abc"}}"#,
        )
        .unwrap();
        assert!(document.data.is_empty());
        assert_eq!(
            document.links.next.as_deref(),
            Some("/orgs/o1/targets?starting_after=abc")
        );
    }
}
