use crate::config::CrudOptions;
use crate::filter::{FilterMap, resolve_filter};
use crate::pagination::{PageWindow, resolve_window};
use crate::sort::{SortSpec, resolve_sort};
use std::collections::HashMap;

/// Everything a list request resolved to deriving from its query string:
/// read window, filter terms, and sort. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryIntent {
    pub window: PageWindow,
    pub filter: FilterMap,
    pub sort: SortSpec,
}

impl QueryIntent {
    #[must_use]
    pub fn resolve<D: Sync>(params: &HashMap<String, String>, options: &CrudOptions<D>) -> Self {
        Self {
            window: resolve_window(params, &options.pagination),
            filter: resolve_filter(params, &options.filter),
            sort: resolve_sort(params.get("sort").map(String::as_str), &options.sort),
        }
    }
}
