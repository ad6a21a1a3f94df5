//! Route configuration.
//!
//! Every option is an explicit struct field with an explicit default, merged
//! by Rust struct-update syntax rather than runtime presence checks. Each
//! section defaults independently, so overriding pagination leaves sort,
//! filter, hooks, and the rest untouched:
//!
//! ```rust,ignore
//! let options = CrudOptions {
//!     pagination: PaginationConfig { default_limit: 50, ..PaginationConfig::default() },
//!     ..CrudOptions::default()
//! };
//! ```
//!
//! Once handed to `crud_router` the configuration is immutable and shared by
//! the generated handlers for the life of the router.

use crate::hooks::{BodyValidator, CrudHooks, NoHooks};
use crate::middleware::MiddlewareChains;
use crate::sort::SortSpec;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Field-inclusion/exclusion mask passed through to the accessor untouched;
/// its semantics belong entirely to the store.
pub type Projection = BTreeMap<String, bool>;

/// Pagination settings for the list endpoint.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    pub enabled: bool,
    /// Page size used when the request carries no parseable `limit`.
    pub default_limit: u64,
    /// Upper cap applied to any requested `limit`.
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_limit: 20,
            max_limit: 100,
        }
    }
}

/// Sort settings for the list endpoint.
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// Applied when the request carries no `sort`, or a disallowed one.
    pub default: SortSpec,
    /// Fields accepted from the `sort` parameter. Empty means unrestricted.
    pub allowed: HashSet<String>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            default: SortSpec::descending("created_at"),
            allowed: HashSet::new(),
        }
    }
}

/// Filter settings for the list endpoint.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub enabled: bool,
    /// Query keys accepted as filter terms. Empty means unrestricted.
    pub allowed: HashSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed: HashSet::new(),
        }
    }
}

/// Full configuration for one set of generated routes, generic over the
/// accessor's document type so hooks can see persisted documents.
pub struct CrudOptions<D: Sync> {
    pub pagination: PaginationConfig,
    pub sort: SortConfig,
    pub filter: FilterConfig,
    /// Opaque projection handed to every read.
    pub projection: Projection,
    /// Relation-expansion fields, applied to reads in the order given.
    pub populate: Vec<String>,
    /// Global and per-operation middleware chains.
    pub middleware: MiddlewareChains,
    /// Optional create-body predicate; `None` skips validation entirely.
    pub validate_body: Option<Arc<dyn BodyValidator>>,
    /// Lifecycle hooks; `NoHooks` by default, every method a no-op.
    pub hooks: Arc<dyn CrudHooks<D>>,
}

impl<D: Send + Sync + 'static> Default for CrudOptions<D> {
    fn default() -> Self {
        Self {
            pagination: PaginationConfig::default(),
            sort: SortConfig::default(),
            filter: FilterConfig::default(),
            projection: Projection::new(),
            populate: Vec::new(),
            middleware: MiddlewareChains::default(),
            validate_body: None,
            hooks: Arc::new(NoHooks),
        }
    }
}
