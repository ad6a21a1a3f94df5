//! The accessor seam.
//!
//! Persistence is an external collaborator: the generated handlers only ever
//! talk to a [`ResourceAccessor`], which finds, counts, creates, updates, and
//! deletes documents, and hands out a chainable [`ResourceQuery`] for shaped
//! reads. Filter values, projections, and populate fields are passed through
//! opaquely; their interpretation belongs to the implementor.

use crate::config::Projection;
use crate::errors::BoxError;
use crate::filter::FilterMap;
use crate::sort::SortSpec;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Options for the update-by-id operation. The generated update handler
/// always requests the post-update document and the store's own validators.
#[derive(Debug, Clone, Copy)]
pub struct UpdateOptions {
    /// Return the document as it stands after the update.
    pub return_new: bool,
    /// Run the store's field-level validation during the update.
    pub run_validators: bool,
}

/// A read in the making: shaping operations chain by value, `exec`/`exec_one`
/// terminate it.
///
/// `skip` and `limit` are `i64` on purpose: a requested page size below 1 is
/// passed through un-floored (see [`crate::pagination::resolve_window`]) and
/// whatever a zero or negative window means is the store's decision.
#[async_trait]
pub trait ResourceQuery: Send + Sized {
    type Document;

    #[must_use]
    fn sort(self, spec: &SortSpec) -> Self;

    /// Resolve a reference field into its referenced record.
    #[must_use]
    fn populate(self, field: &str) -> Self;

    #[must_use]
    fn skip(self, n: i64) -> Self;

    #[must_use]
    fn limit(self, n: i64) -> Self;

    /// Execute, expecting any number of documents.
    async fn exec(self) -> Result<Vec<Self::Document>, BoxError>;

    /// Execute, expecting at most one document.
    async fn exec_one(self) -> Result<Option<Self::Document>, BoxError>;
}

/// The injected data-store abstraction the five handlers are generated over.
#[async_trait]
pub trait ResourceAccessor: Send + Sync + 'static {
    /// The persisted document shape returned to clients.
    type Document: Serialize + Send + Sync + 'static;
    type Query: ResourceQuery<Document = Self::Document>;

    /// Begin a filtered, projected read over all matching documents.
    fn find(&self, filter: &FilterMap, projection: &Projection) -> Self::Query;

    /// Begin a projected read of a single document by id.
    fn find_by_id(&self, id: &str, projection: &Projection) -> Self::Query;

    /// Count every document matching the filter, ignoring any window.
    async fn count_documents(&self, filter: &FilterMap) -> Result<u64, BoxError>;

    /// Persist a new document from the (possibly hook-mutated) request body.
    async fn create(&self, data: Value) -> Result<Self::Document, BoxError>;

    /// Update by id. `Ok(None)` means no document matched.
    async fn update_by_id(
        &self,
        id: &str,
        data: Value,
        options: UpdateOptions,
    ) -> Result<Option<Self::Document>, BoxError>;

    /// Delete by id. `Ok(None)` means no document matched.
    async fn delete_by_id(&self, id: &str) -> Result<Option<Self::Document>, BoxError>;
}
