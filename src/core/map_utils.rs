//! Grouping-map helpers shared by the outline builder and file indexes.

use std::hash::Hash;

use indexmap::IndexMap;

/// Append `value` to the bucket for `key`, creating the bucket on first
/// encounter. Buckets accumulate; callers that need fresh counts build a
/// fresh map per document version.
pub fn append_to_map<K, V>(map: &mut IndexMap<K, Vec<V>>, key: K, value: V)
where
    K: Hash + Eq,
{
    map.entry(key).or_default().push(value);
}

/// Sort a grouping map by its keys (stable lexicographic order).
///
/// Display order is a deliberate post-processing step, not an
/// accumulation-order guarantee.
pub fn sort_map_by_keys<K, V>(map: &mut IndexMap<K, V>)
where
    K: Hash + Eq + Ord,
{
    map.sort_keys();
}
