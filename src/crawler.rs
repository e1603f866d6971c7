//! Crawl entry point tying the fetcher, walker, and grouper together.

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::ResilientFetcher;
use crate::grouper::group_by_root;
use crate::types::{CategoryNode, GroupedRecords};
use crate::walker::TreeWalker;

/// One-shot catalog crawler.
///
/// Owns the transport session for the duration of a crawl: the session is
/// opened before the tree fetch, shared by every concurrent expansion task,
/// and closed on every exit path once the traversal fully completes.
///
/// # Example
///
/// ```no_run
/// use catalog_walker::{CategoryCrawler, Config};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut crawler = CategoryCrawler::new(Config::default())?;
///     let grouped = crawler.crawl().await?;
///     for (root, records) in &grouped {
///         println!("{root}: {} records", records.len());
///     }
///     Ok(())
/// }
/// ```
pub struct CategoryCrawler {
    config: Config,
    fetcher: ResilientFetcher,
}

impl CategoryCrawler {
    /// Create a crawler from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) when the configuration
    /// is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let fetcher = ResilientFetcher::new(&config);
        Ok(Self { config, fetcher })
    }

    /// Open the transport session manually.
    ///
    /// [`crawl`](Self::crawl) manages the session itself; this is only needed
    /// around standalone [`fetch_tree`](Self::fetch_tree) calls.
    pub fn connect(&mut self) -> Result<()> {
        self.fetcher.connect()
    }

    /// Close a manually opened transport session.
    pub fn disconnect(&mut self) {
        self.fetcher.disconnect();
    }

    /// Fetch the tree, expand every branch, and bucket the flattened records
    /// by root-category name.
    ///
    /// A tree fetch that exhausts its retries, or a tree body that does not
    /// look like a list of nodes, yields an empty map — branch-level failures
    /// never abort the run. Only a transport lifecycle bug (or client
    /// construction failure) returns an error.
    pub async fn crawl(&mut self) -> Result<GroupedRecords> {
        let started = std::time::Instant::now();

        self.fetcher.connect()?;
        let outcome = self.crawl_connected().await;
        // Release the session on every exit path before surfacing the outcome
        self.fetcher.disconnect();
        let grouped = outcome?;

        tracing::info!(
            roots = grouped.len(),
            records = grouped.values().map(Vec::len).sum::<usize>(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "crawl finished"
        );
        Ok(grouped)
    }

    async fn crawl_connected(&self) -> Result<GroupedRecords> {
        let tree = self.fetch_tree().await?;
        let walker = TreeWalker::new(&self.fetcher, &self.config);
        let records = walker.walk(&tree).await?;
        Ok(group_by_root(records))
    }

    /// Fetch the raw category tree once, without expanding it.
    ///
    /// During [`crawl`](Self::crawl) the tree is held only for the duration
    /// of one traversal and discarded afterwards. An unavailable or
    /// unrecognizable tree yields an empty list.
    ///
    /// # Errors
    ///
    /// [`Error::TransportNotConnected`](crate::Error::TransportNotConnected)
    /// when called outside a connected session.
    pub async fn fetch_tree(&self) -> Result<Vec<CategoryNode>> {
        let Some(body) = self
            .fetcher
            .fetch(&self.config.endpoints.tree_url, &[])
            .await?
        else {
            tracing::warn!("category tree unavailable, nothing to crawl");
            return Ok(Vec::new());
        };

        match serde_json::from_value(body) {
            Ok(nodes) => Ok(nodes),
            Err(e) => {
                tracing::warn!(error = %e, "category tree body is not a node list");
                Ok(Vec::new())
            }
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::error::Error;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn crawler_for(server: &MockServer) -> CategoryCrawler {
        let mut config = Config::default();
        config.endpoints.tree_url = format!("{}/menu", server.uri());
        config.endpoints.search_url = format!("{}/search", server.uri());
        config.retry = RetryConfig {
            max_attempts: 2,
            backoff_base: Duration::from_millis(1),
        };
        CategoryCrawler::new(config).unwrap()
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_up_front() {
        let mut config = Config::default();
        config.endpoints.tree_url = String::new();

        assert!(matches!(
            CategoryCrawler::new(config),
            Err(Error::Config { .. })
        ));
    }

    #[tokio::test]
    async fn unavailable_tree_yields_empty_map() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menu"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut crawler = crawler_for(&server);
        let grouped = crawler.crawl().await.unwrap();

        assert!(grouped.is_empty());
        assert!(
            !crawler.fetcher.is_connected(),
            "session must be released after the crawl"
        );
    }

    #[tokio::test]
    async fn unrecognizable_tree_body_yields_empty_map() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menu"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"not": "a list"})),
            )
            .mount(&server)
            .await;

        let mut crawler = crawler_for(&server);
        assert!(crawler.crawl().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn standalone_fetch_tree_requires_an_open_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menu"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"id": 1, "name": "Root"}])),
            )
            .mount(&server)
            .await;

        let mut crawler = crawler_for(&server);
        assert!(
            crawler.fetch_tree().await.is_err(),
            "fetching outside a session is a lifecycle bug"
        );

        crawler.connect().unwrap();
        let tree = crawler.fetch_tree().await.unwrap();
        crawler.disconnect();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name.as_deref(), Some("Root"));
    }

    #[tokio::test]
    async fn crawl_can_run_again_after_completion() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menu"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"id": 1, "name": "Root"}])),
            )
            .mount(&server)
            .await;

        let mut crawler = crawler_for(&server);
        let first = crawler.crawl().await.unwrap();
        let second = crawler.crawl().await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first["Root"].len(), second["Root"].len());
    }
}
