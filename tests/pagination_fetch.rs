//! Tests for exhaustive cursor pagination against a mocked REST API.

use snyk_export::{fetch_all, List, SnykClient, Target, TargetQuery};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SnykClient {
    SnykClient::new("test-token", &server.uri(), &server.uri()).unwrap()
}

fn items(range: std::ops::Range<u32>) -> Vec<serde_json::Value> {
    range
        .map(|i| serde_json::json!({"id": format!("item-{i}")}))
        .collect()
}

#[tokio::test]
async fn test_empty_collection_yields_empty_vec() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/o-1/widgets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let all: Vec<serde_json::Value> = fetch_all(&client, "orgs/o-1/widgets", &[]).await.unwrap();

    assert!(all.is_empty());
}

#[tokio::test]
async fn test_single_exact_page_stops_without_next() {
    let server = MockServer::start().await;

    // A full page whose document carries no next link: the source says done.
    let body = serde_json::json!({"data": items(0..2), "links": {}});
    Mock::given(method("GET"))
        .and(path("/orgs/o-1/widgets"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let all: Vec<serde_json::Value> =
        fetch_all(&client, "orgs/o-1/widgets", &[("limit", "2".to_string())])
            .await
            .unwrap();

    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_follows_next_links_across_three_pages() {
    let server = MockServer::start().await;

    let page1 = serde_json::json!({
        "data": items(0..2),
        "links": {"next": "/orgs/o-1/widgets?version=2024-10-15&limit=2&starting_after=c1"}
    });
    let page2 = serde_json::json!({
        "data": items(2..4),
        "links": {"next": "/orgs/o-1/widgets?version=2024-10-15&limit=2&starting_after=c2"}
    });
    // N = 2P + 1: final page is a partial one.
    let page3 = serde_json::json!({"data": items(4..5)});

    Mock::given(method("GET"))
        .and(path("/orgs/o-1/widgets"))
        .and(query_param_is_missing("starting_after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page1))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/o-1/widgets"))
        .and(query_param("starting_after", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page2))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/o-1/widgets"))
        .and(query_param("starting_after", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page3))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let all: Vec<serde_json::Value> =
        fetch_all(&client, "orgs/o-1/widgets", &[("limit", "2".to_string())])
            .await
            .unwrap();

    // Every item, in source order, no duplicates.
    let ids: Vec<&str> = all.iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["item-0", "item-1", "item-2", "item-3", "item-4"]);
}

#[tokio::test]
async fn test_page_failure_propagates() {
    let server = MockServer::start().await;

    let page1 = serde_json::json!({
        "data": items(0..2),
        "links": {"next": "/orgs/o-1/widgets?version=2024-10-15&starting_after=c1"}
    });
    Mock::given(method("GET"))
        .and(path("/orgs/o-1/widgets"))
        .and(query_param_is_missing("starting_after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page1))
        .mount(&server)
        .await;
    // Second page fails even after the client's retry.
    Mock::given(method("GET"))
        .and(path("/orgs/o-1/widgets"))
        .and(query_param("starting_after", "c1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result: snyk_export::Result<Vec<serde_json::Value>> =
        fetch_all(&client, "orgs/o-1/widgets", &[]).await;

    // No silently dropped partial page.
    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_sends_limit_and_version() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/o-1/targets"))
        .and(query_param("limit", "100"))
        .and(query_param("version", "2024-10-15"))
        .and(query_param_is_missing("origin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let targets = Target::list_all(&client, "o-1", &TargetQuery::default())
        .await
        .unwrap();

    assert!(targets.is_empty());
}
