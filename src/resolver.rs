//! Leaf-item resolution via the search endpoint
//!
//! Some category nodes carry a `searchQuery` instead of (or in addition to)
//! child nodes. Running that query against the search endpoint returns a set
//! of filters, and the filter labeled as the category facet lists flat
//! "leaf" items belonging to the node. This module turns one search query
//! into normalized [`CategoryRecord`]s.

use crate::config::SearchConfig;
use crate::error::Result;
use crate::fetcher::ResilientFetcher;
use crate::types::{CategoryRecord, LEAF_ITEM_LEVEL};
use serde_json::Value;

/// Resolves a search query into category leaf records.
///
/// Borrows the shared fetcher; the walker creates one resolver per traversal
/// and calls it from many concurrent tasks.
pub struct LeafItemResolver<'a> {
    fetcher: &'a ResilientFetcher,
    search_url: &'a str,
    search: &'a SearchConfig,
}

impl<'a> LeafItemResolver<'a> {
    /// Create a resolver over the shared fetcher and search settings.
    pub fn new(fetcher: &'a ResilientFetcher, search_url: &'a str, search: &'a SearchConfig) -> Self {
        Self {
            fetcher,
            search_url,
            search,
        }
    }

    /// Fetch matching items for `query` and extract the category facet as
    /// leaf records.
    ///
    /// Returned records carry `level = LEAF_ITEM_LEVEL` and have `parent` and
    /// `root` unset — the resolver knows nothing about tree position, so the
    /// caller stamps lineage after the call.
    ///
    /// A fetch that comes back empty after retries, or a response without the
    /// expected facet, yields an empty vector. The only error that propagates
    /// is the fetcher's lifecycle misuse.
    pub async fn resolve_leaf_items(&self, query: &str) -> Result<Vec<CategoryRecord>> {
        let mut params = self.search.params.clone();
        params.push(("query".to_string(), query.to_string()));

        let Some(body) = self.fetcher.fetch(self.search_url, &params).await? else {
            return Ok(Vec::new());
        };

        let records = extract_category_items(&body, &self.search.category_facet_label);
        if records.is_empty() {
            tracing::debug!(query, "search response carried no category facet items");
        }
        Ok(records)
    }
}

/// Walk `data.filters`, select the facet whose `name` matches `facet_label`
/// exactly, and normalize its `items` into leaf records. Defensive access
/// throughout: any missing level of the shape yields an empty result.
fn extract_category_items(body: &Value, facet_label: &str) -> Vec<CategoryRecord> {
    let Some(filters) = body
        .get("data")
        .and_then(|d| d.get("filters"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for filter in filters {
        if filter.get("name").and_then(Value::as_str) != Some(facet_label) {
            continue;
        }
        let Some(items) = filter.get("items").and_then(Value::as_array) else {
            continue;
        };
        for item in items {
            records.push(CategoryRecord {
                id: item.get("id").and_then(Value::as_i64),
                name: item
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                level: LEAF_ITEM_LEVEL,
                parent: None,
                root: None,
            });
        }
    }
    records
}
