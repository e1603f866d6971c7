//! Concurrent tree walker
//!
//! Expands a category tree of a-priori-unknown depth and branching factor
//! into one flat record list. Each node contributes its own record first,
//! then fans out concurrently into (a) its child subtree and (b) leaf-item
//! resolution when it declares a search query — both may fire for the same
//! node. Siblings expand concurrently as well; a recursion frame joins all of
//! its tasks before returning.
//!
//! There is no shared mutable accumulator: every frame returns its own local
//! list and lists are merged at the join point, so the pre-order
//! ancestor-before-descendant ordering per lineage is structural and sibling
//! interleaving needs no synchronization. Failed expansions contribute
//! nothing; the rest of the tree is unaffected.

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::ResilientFetcher;
use crate::resolver::LeafItemResolver;
use crate::types::{CategoryNode, CategoryRecord};
use futures::FutureExt;
use futures::future::{self, BoxFuture};

/// Recursive expander over a borrowed fetcher and one traversal's settings.
pub struct TreeWalker<'a> {
    resolver: LeafItemResolver<'a>,
}

impl<'a> TreeWalker<'a> {
    /// Create a walker sharing the given transport session.
    pub fn new(fetcher: &'a ResilientFetcher, config: &'a Config) -> Self {
        Self {
            resolver: LeafItemResolver::new(fetcher, &config.endpoints.search_url, &config.search),
        }
    }

    /// Flatten the whole tree starting from its level-1 roots.
    ///
    /// Returns once every node at every depth, and every leaf resolution it
    /// triggered, has completed (successfully or via the empty-on-failure
    /// fallback). The only error is the fetcher's lifecycle misuse.
    pub async fn walk(&self, roots: &[CategoryNode]) -> Result<Vec<CategoryRecord>> {
        self.walk_nodes(roots, 1, None, None).await
    }

    /// Expand one generation of siblings concurrently and merge their local
    /// result lists. Boxed because the future recurses through itself.
    fn walk_nodes<'f>(
        &'f self,
        nodes: &'f [CategoryNode],
        level: u32,
        parent: Option<&'f str>,
        root: Option<&'f str>,
    ) -> BoxFuture<'f, Result<Vec<CategoryRecord>>> {
        async move {
            let branches = future::join_all(
                nodes
                    .iter()
                    .map(|node| self.expand_node(node, level, parent, root)),
            )
            .await;

            let mut records = Vec::new();
            for branch in branches {
                records.extend(branch?);
            }
            Ok(records)
        }
        .boxed()
    }

    /// Expand a single node: its own record, then children and leaf items
    /// concurrently. The self-record is placed before anything the node's
    /// descendants contribute.
    async fn expand_node<'f>(
        &'f self,
        node: &'f CategoryNode,
        level: u32,
        parent: Option<&'f str>,
        root: Option<&'f str>,
    ) -> Result<Vec<CategoryRecord>> {
        // The outermost call has no inherited root: the node is its own root.
        let current_root = root.or(node.name.as_deref());

        let mut records = vec![CategoryRecord {
            id: node.id,
            name: node.name.clone(),
            level,
            parent: parent.map(str::to_string),
            root: current_root.map(str::to_string),
        }];

        let children = async {
            if node.children.is_empty() {
                Ok(Vec::new())
            } else {
                self.walk_nodes(&node.children, level + 1, node.name.as_deref(), current_root)
                    .await
            }
        };

        let leaves = async {
            match node.search_query.as_deref() {
                Some(query) => {
                    let mut items = self.resolver.resolve_leaf_items(query).await?;
                    // The resolver has no knowledge of tree position; lineage
                    // is stamped here.
                    for item in &mut items {
                        item.parent = node.name.clone();
                        item.root = current_root.map(str::to_string);
                    }
                    Ok(items)
                }
                None => Ok(Vec::new()),
            }
        };

        let (children, leaves) = future::try_join(children, leaves).await?;
        records.extend(children);
        records.extend(leaves);
        Ok(records)
    }
}
