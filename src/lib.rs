//! # catalog-walker
//!
//! Concurrent crawler for hierarchical product-category trees.
//!
//! Given a catalog API that serves a nested category tree — where some nodes
//! additionally resolve to flat search-result "leaf" items — this crate
//! expands every branch concurrently, survives transient upstream failures
//! with bounded retries, and flattens the whole tree into per-root record
//! sets ready for an exporter.
//!
//! ## Design Philosophy
//!
//! - **Failures are local** — a branch that stays unavailable after retries
//!   contributes nothing; its siblings and the rest of the tree are
//!   unaffected.
//! - **One shared session** — every concurrent expansion task reuses one HTTP
//!   transport, opened before the traversal and released on every exit path.
//! - **Bounded fan-in-flight** — logical tasks fan out per node without
//!   limit, but in-flight requests are capped by a tunable semaphore.
//! - **Library-first** — no CLI, no env vars, no persisted state; purely a
//!   Rust crate for embedding.
//!
//! ## Quick Start
//!
//! ```no_run
//! use catalog_walker::{CategoryCrawler, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut crawler = CategoryCrawler::new(Config::default())?;
//!     let grouped = crawler.crawl().await?;
//!
//!     for (root, records) in &grouped {
//!         println!("{root}: {} records", records.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Crawl entry point
pub mod crawler;
/// Error types
pub mod error;
/// Resilient HTTP fetch layer
pub mod fetcher;
/// Grouping of flat records into the export shape
pub mod grouper;
/// Leaf-item resolution via the search endpoint
pub mod resolver;
/// Core data types
pub mod types;
/// Concurrent tree walker
pub mod walker;

// Re-export commonly used types
pub use config::{Config, EndpointConfig, HttpConfig, RetryConfig, SearchConfig};
pub use crawler::CategoryCrawler;
pub use error::{Error, Result};
pub use fetcher::ResilientFetcher;
pub use grouper::group_by_root;
pub use resolver::LeafItemResolver;
pub use types::{CategoryNode, CategoryRecord, GroupedRecords, LEAF_ITEM_LEVEL};
pub use walker::TreeWalker;
