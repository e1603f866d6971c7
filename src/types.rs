//! Core data types: the upstream tree node and the flattened output record.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel `level` value for records synthesized from search resolution.
///
/// Leaf items are not part of the category hierarchy, so they carry this
/// out-of-band constant instead of a meaningful depth. The value is inherited
/// from the upstream export format and must stay stable for consumers that
/// key off it.
pub const LEAF_ITEM_LEVEL: u32 = 99;

/// One node of the upstream category tree, exactly as the catalog API
/// delivers it.
///
/// Every field is optional or defaulted: the API omits fields freely, and the
/// crawler does defensive access rather than schema validation. Unknown
/// upstream fields are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CategoryNode {
    /// Opaque upstream identifier, may be absent or null
    #[serde(default)]
    pub id: Option<i64>,

    /// Display name, may be absent
    #[serde(default)]
    pub name: Option<String>,

    /// Child nodes (the upstream field is spelled `childs`)
    #[serde(default, rename = "childs")]
    pub children: Vec<CategoryNode>,

    /// Search query whose results carry additional flat leaf items for this
    /// node, independent of whether it also has children
    #[serde(default, rename = "searchQuery")]
    pub search_query: Option<String>,
}

/// Flattened, immutable snapshot of one category or leaf item.
///
/// Records carry no back-reference to the source tree; once created they are
/// never mutated (the walker stamps `parent`/`root` on leaf records before
/// they enter the result list).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryRecord {
    /// Upstream identifier, carried through as-is
    pub id: Option<i64>,

    /// Display name, carried through as-is
    pub name: Option<String>,

    /// Depth from the level-1 root for hierarchy records, or
    /// [`LEAF_ITEM_LEVEL`] for search-derived leaf items
    pub level: u32,

    /// Name of the immediate parent node (`None` for level-1 roots)
    pub parent: Option<String>,

    /// Name of the level-1 ancestor this record's path originates from,
    /// stable across the whole subtree
    pub root: Option<String>,
}

/// The export-boundary shape: flat records bucketed by root-category name.
pub type GroupedRecords = HashMap<String, Vec<CategoryRecord>>;
