use crate::config::FilterConfig;
use std::collections::{BTreeMap, HashMap};

/// Equality filter terms derived from the query string. Values are kept as
/// the raw strings received; interpreting them belongs to the accessor.
pub type FilterMap = BTreeMap<String, String>;

/// Query keys consumed by the pagination and sort resolvers; never treated as
/// filter terms.
pub const RESERVED_PARAMS: [&str; 3] = ["page", "limit", "sort"];

/// Derive the filter map for one request.
///
/// Disabled filtering yields an empty map regardless of the query string.
/// Otherwise every non-reserved key is included, unless a non-empty
/// allow-list is configured, in which case only listed keys pass.
#[must_use]
pub fn resolve_filter(params: &HashMap<String, String>, config: &FilterConfig) -> FilterMap {
    if !config.enabled {
        return FilterMap::new();
    }
    params
        .iter()
        .filter(|(key, _)| !RESERVED_PARAMS.contains(&key.as_str()))
        .filter(|(key, _)| config.allowed.is_empty() || config.allowed.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
