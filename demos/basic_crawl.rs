//! Basic crawl example
//!
//! This example demonstrates the core functionality of catalog-walker:
//! - Building a configuration (here: the defaults, with a lower request cap)
//! - Running one crawl against the live catalog API
//! - Consuming the per-root record buckets the way an exporter would

use catalog_walker::{CategoryCrawler, Config, HttpConfig, LEAF_ITEM_LEVEL};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing so retry warnings are visible
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_walker=info".into()),
        )
        .init();

    let config = Config {
        http: HttpConfig {
            max_concurrent_fetches: 16,
        },
        ..Default::default()
    };

    let mut crawler = CategoryCrawler::new(config)?;
    let grouped = crawler.crawl().await?;

    for (root, records) in &grouped {
        let leaf_items = records
            .iter()
            .filter(|r| r.level == LEAF_ITEM_LEVEL)
            .count();
        println!(
            "{root}: {} records ({} search-derived leaf items)",
            records.len(),
            leaf_items
        );
    }

    Ok(())
}
