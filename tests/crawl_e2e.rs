//! End-to-end crawl tests against a mock catalog API.

use catalog_walker::{CategoryCrawler, Config, LEAF_ITEM_LEVEL, RetryConfig};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.endpoints.tree_url = format!("{}/menu", server.uri());
    config.endpoints.search_url = format!("{}/search", server.uri());
    config.retry = RetryConfig {
        max_attempts: 5,
        backoff_base: Duration::from_millis(2),
    };
    config
}

/// The upstream main-menu shape: a JSON array of nodes whose children live
/// under `childs` and whose search hint is `searchQuery`.
fn menu_body() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 1,
            "name": "Root",
            "childs": [
                {"id": 2, "name": "A"},
                {"id": 3, "name": "B", "searchQuery": "shoes"}
            ]
        },
        {"id": 4, "name": "Other"}
    ])
}

fn shoes_search_body() -> serde_json::Value {
    serde_json::json!({
        "data": {
            "filters": [
                {"name": "Бренд", "items": [{"id": 100, "name": "Acme"}]},
                {"name": "Категория", "items": [{"id": 7, "name": "Sneakers"}]}
            ]
        }
    })
}

#[tokio::test]
async fn full_crawl_flattens_and_groups_by_root() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/menu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(menu_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "shoes"))
        .and(query_param("resultset", "filters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shoes_search_body()))
        .mount(&server)
        .await;

    let mut crawler = CategoryCrawler::new(test_config(&server)).unwrap();
    let grouped = crawler.crawl().await.unwrap();

    // Two roots appear; 3 hierarchy records + 1 leaf under "Root", 1 under "Other"
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped["Root"].len(), 4);
    assert_eq!(grouped["Other"].len(), 1);

    let root_bucket = &grouped["Root"];
    let find = |name: &str| {
        root_bucket
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
            .unwrap()
    };

    let root = find("Root");
    assert_eq!(root.level, 1);
    assert_eq!(root.parent, None);
    assert_eq!(root.root.as_deref(), Some("Root"));

    let b = find("B");
    assert_eq!(b.level, 2);
    assert_eq!(b.parent.as_deref(), Some("Root"));

    let leaf = find("Sneakers");
    assert_eq!(leaf.id, Some(7));
    assert_eq!(leaf.level, LEAF_ITEM_LEVEL);
    assert_eq!(leaf.parent.as_deref(), Some("B"));
    assert_eq!(leaf.root.as_deref(), Some("Root"));

    // Pre-order per lineage: B's record precedes the leaf it produced
    let pos = |name: &str| {
        root_bucket
            .iter()
            .position(|r| r.name.as_deref() == Some(name))
            .unwrap()
    };
    assert!(pos("Root") < pos("B"));
    assert!(pos("B") < pos("Sneakers"));
}

#[tokio::test]
async fn tree_fetch_recovers_from_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/menu"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(4)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/menu"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{"name": "Solo"}])),
        )
        .mount(&server)
        .await;

    let mut crawler = CategoryCrawler::new(test_config(&server)).unwrap();
    let grouped = crawler.crawl().await.unwrap();

    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped["Solo"].len(), 1);
    assert_eq!(
        server.received_requests().await.unwrap().len(),
        5,
        "4 failed tree attempts before the successful fifth"
    );
}

#[tokio::test]
async fn failed_search_branch_shrinks_output_without_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/menu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(menu_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut crawler = CategoryCrawler::new(test_config(&server)).unwrap();
    let grouped = crawler.crawl().await.unwrap();

    // The search branch contributes nothing; hierarchy records survive
    assert_eq!(grouped["Root"].len(), 3);
    assert_eq!(grouped["Other"].len(), 1);
}
