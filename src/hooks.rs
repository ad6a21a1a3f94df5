//! Lifecycle hooks and body validation.
//!
//! Implement [`CrudHooks`] and override only the points you need; every
//! method defaults to a no-op, so absence costs nothing and no call site
//! branches on whether a hook exists. All hooks may suspend.
//!
//! A failing `before_*` hook aborts its operation before the store is
//! touched. This is also the supported way to veto a deletion (for example a
//! soft-delete scheme that marks the record elsewhere and then errors out of
//! `before_delete`); the request then surfaces the standard error envelope.
//! `after_*` hooks are informational: the operation has already happened, but
//! a failure there still surfaces as the handler's error envelope rather
//! than being swallowed.

use crate::errors::BoxError;
use crate::middleware::RequestContext;
use async_trait::async_trait;
use serde_json::Value;

/// Before/after callbacks around create, update, and delete, generic over the
/// accessor's document type.
#[async_trait]
pub trait CrudHooks<D: Sync>: Send + Sync {
    /// Runs after body validation, before persistence. May mutate the
    /// candidate document in place.
    async fn before_create(&self, ctx: &RequestContext, data: &mut Value) -> Result<(), BoxError> {
        let _ = (ctx, data);
        Ok(())
    }

    /// Runs after persistence with the stored document. Informational; the
    /// response body is the document either way.
    async fn after_create(&self, ctx: &RequestContext, doc: &D) -> Result<(), BoxError> {
        let _ = (ctx, doc);
        Ok(())
    }

    /// Runs before the update is applied. May mutate the candidate update
    /// data in place.
    async fn before_update(
        &self,
        ctx: &RequestContext,
        id: &str,
        data: &mut Value,
    ) -> Result<(), BoxError> {
        let _ = (ctx, id, data);
        Ok(())
    }

    /// Runs after the update with the post-update document.
    async fn after_update(&self, ctx: &RequestContext, doc: &D) -> Result<(), BoxError> {
        let _ = (ctx, doc);
        Ok(())
    }

    /// Runs before the deletion; an error here aborts it entirely.
    async fn before_delete(&self, ctx: &RequestContext, id: &str) -> Result<(), BoxError> {
        let _ = (ctx, id);
        Ok(())
    }

    /// Runs after the deletion. Informational.
    async fn after_delete(&self, ctx: &RequestContext, id: &str) -> Result<(), BoxError> {
        let _ = (ctx, id);
        Ok(())
    }
}

/// The default hook set: every method a no-op.
pub struct NoHooks;

#[async_trait]
impl<D: Send + Sync> CrudHooks<D> for NoHooks {}

/// Asynchronous create-body predicate. Returning `Ok(false)` rejects the
/// body with a 400 "Validation failed" before the accessor is ever called;
/// returning an error surfaces like any other create failure.
#[async_trait]
pub trait BodyValidator: Send + Sync {
    async fn validate(&self, body: &Value) -> Result<bool, BoxError>;
}

/// Plain synchronous predicates are validators too:
///
/// ```rust,ignore
/// options.validate_body = Some(Arc::new(|body: &Value| body.get("name").is_some()));
/// ```
#[async_trait]
impl<F> BodyValidator for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    async fn validate(&self, body: &Value) -> Result<bool, BoxError> {
        Ok(self(body))
    }
}
