//! Generate REST CRUD routers for axum.
//!
//! [`crud_router`] attaches five endpoints (list, get-one, create, update,
//! delete) for any [`ResourceAccessor`] under a base path, with pagination,
//! filtering, sorting, projection, relation expansion, per-operation
//! middleware, and lifecycle hooks configured through [`CrudOptions`].

pub mod config;
pub mod errors;
pub mod filter;
pub mod hooks;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod query;
pub mod routes;
pub mod sort;
pub mod traits;

pub use config::{CrudOptions, FilterConfig, PaginationConfig, Projection, SortConfig};
pub use errors::{BoxError, CrudError};
pub use filter::FilterMap;
pub use hooks::{BodyValidator, CrudHooks, NoHooks};
pub use middleware::{Flow, Middleware, MiddlewareChain, MiddlewareChains, Op, RequestContext};
pub use models::{DeleteResponse, ListResponse};
pub use pagination::{PageWindow, PaginationMeta};
pub use query::QueryIntent;
pub use routes::{CrudContext, crud_router};
pub use sort::{SortDirection, SortSpec};
pub use traits::{ResourceAccessor, ResourceQuery, UpdateOptions};
