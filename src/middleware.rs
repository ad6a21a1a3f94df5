//! Per-route middleware.
//!
//! A middleware is one step in an ordered chain with a uniform continue-or-
//! short-circuit contract. Chains are composed by concatenation: the global
//! chain runs first, then the operation-specific chain, then the handler. A
//! step that short-circuits produces the response itself and nothing after
//! it runs; a step that errors produces the standard error envelope.

use crate::errors::CrudError;
use async_trait::async_trait;
use axum::http::{Extensions, HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::sync::Arc;

/// What a middleware saw of the request, plus an extensions bag for handing
/// data onward to later middleware and to lifecycle hooks.
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// Raw query parameters as received.
    pub params: HashMap<String, String>,
    /// The `:id` path segment, where the route has one.
    pub id: Option<String>,
    pub extensions: Extensions,
}

impl RequestContext {
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        params: HashMap<String, String>,
        id: Option<String>,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            params,
            id,
            extensions: Extensions::new(),
        }
    }
}

/// Outcome of one middleware step.
pub enum Flow {
    /// Proceed to the next step, or to the handler.
    Continue,
    /// Respond immediately; the handler never runs.
    ShortCircuit(Response),
}

/// One request-processing step.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, ctx: &mut RequestContext) -> Result<Flow, CrudError>;
}

pub type MiddlewareChain = Vec<Arc<dyn Middleware>>;

/// The five generated operations, used to select the route-specific chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    List,
    GetOne,
    Create,
    Update,
    Delete,
}

/// One chain per operation plus a global chain prepended to every route.
#[derive(Default)]
pub struct MiddlewareChains {
    pub all: MiddlewareChain,
    pub list: MiddlewareChain,
    pub get_one: MiddlewareChain,
    pub create: MiddlewareChain,
    pub update: MiddlewareChain,
    pub delete: MiddlewareChain,
}

impl MiddlewareChains {
    #[must_use]
    pub fn route(&self, op: Op) -> &MiddlewareChain {
        match op {
            Op::List => &self.list,
            Op::GetOne => &self.get_one,
            Op::Create => &self.create,
            Op::Update => &self.update,
            Op::Delete => &self.delete,
        }
    }
}

/// Run the global chain then the operation's chain. `Err` carries the
/// response to send instead of reaching the handler.
///
/// # Errors
///
/// Returns the short-circuit response of the first step that ends the chain,
/// or the error envelope of the first step that fails.
pub async fn run_chain(
    chains: &MiddlewareChains,
    op: Op,
    ctx: &mut RequestContext,
) -> Result<(), Response> {
    for step in chains.all.iter().chain(chains.route(op).iter()) {
        match step.handle(ctx).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::ShortCircuit(response)) => return Err(response),
            Err(err) => return Err(err.into_response()),
        }
    }
    Ok(())
}
