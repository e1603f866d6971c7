//! Partitioning of the flat record list into the export shape.

use crate::types::{CategoryRecord, GroupedRecords};

/// Bucket records by their `root` field.
///
/// Within a bucket, records keep the order they held in the flat list. Roots
/// that no record carries simply do not appear as keys; no empty buckets are
/// synthesized. Records without a root (a lineage whose level-1 node had no
/// name) are dropped with a warning — the upstream catalog always names its
/// top-level entries, so this only fires on malformed input.
pub fn group_by_root(records: Vec<CategoryRecord>) -> GroupedRecords {
    let mut grouped = GroupedRecords::new();
    for record in records {
        match record.root.clone() {
            Some(root) => grouped.entry(root).or_default().push(record),
            None => {
                tracing::warn!(name = ?record.name, "dropping record without a root category");
            }
        }
    }
    grouped
}
