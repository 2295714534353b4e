//! Schema-less detail maps attached to nodes and edges
//!
//! Providers contribute heterogeneous optional fields (roles, dates, source
//! registry, address parts), so details stay an open JSON object rather than
//! a struct.

use serde_json::{Map, Value};

/// Open key/value map stored alongside every node and edge
pub type Details = Map<String, Value>;

/// Shallow-merge `incoming` into `existing`
///
/// Keys present in `incoming` overwrite the same keys in `existing`; all
/// other keys are preserved. Nested objects are replaced, not merged.
pub fn merge_details(existing: &mut Details, incoming: &Details) {
    for (key, value) in incoming {
        existing.insert(key.clone(), value.clone());
    }
}

/// Build a details map from `(key, value)` pairs, dropping `None` values
///
/// Optional provider fields that are absent are simply not written, so a
/// later sighting that lacks them does not erase what an earlier one stored.
pub fn details_from<I, K>(pairs: I) -> Details
where
    I: IntoIterator<Item = (K, Option<Value>)>,
    K: Into<String>,
{
    pairs
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k.into(), v)))
        .collect()
}
