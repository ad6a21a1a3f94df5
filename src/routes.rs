//! The five generated handlers and the router that binds them.
//!
//! Each handler is generic over the injected [`ResourceAccessor`] and shares
//! one immutable [`CrudOptions`] captured at registration time. Per request
//! the flow is: middleware (global chain, then route chain), then the handler
//! steps strictly in sequence - validate, before-hook, store operation,
//! after-hook, respond. Failures anywhere convert to the uniform error
//! envelope at this boundary.

use crate::config::CrudOptions;
use crate::errors::{BoxError, CrudError};
use crate::middleware::{Op, RequestContext, run_chain};
use crate::models::{DeleteResponse, ListResponse};
use crate::pagination::PaginationMeta;
use crate::query::QueryIntent;
use crate::traits::{ResourceAccessor, ResourceQuery, UpdateOptions};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const FETCH_MANY_FALLBACK: &str = "Failed to fetch documents";
const FETCH_ONE_FALLBACK: &str = "Failed to fetch document";
const CREATE_FALLBACK: &str = "Failed to create document";
const UPDATE_FALLBACK: &str = "Failed to update document";
const DELETE_FALLBACK: &str = "Failed to delete document";

/// Shared state captured by the generated handlers.
pub struct CrudContext<A: ResourceAccessor> {
    pub accessor: Arc<A>,
    pub options: Arc<CrudOptions<A::Document>>,
}

impl<A: ResourceAccessor> Clone for CrudContext<A> {
    fn clone(&self) -> Self {
        Self {
            accessor: Arc::clone(&self.accessor),
            options: Arc::clone(&self.options),
        }
    }
}

// Read and delete paths surface store failures as 500, write paths as 400.
fn read_failure(source: &BoxError, fallback: &str) -> CrudError {
    CrudError::store(StatusCode::INTERNAL_SERVER_ERROR, source, fallback)
}

fn write_failure(source: &BoxError, fallback: &str) -> CrudError {
    CrudError::store(StatusCode::BAD_REQUEST, source, fallback)
}

fn require_id(id: &str) -> Result<(), CrudError> {
    if id.trim().is_empty() {
        return Err(CrudError::MissingId);
    }
    Ok(())
}

/// List documents: `GET {base}/`.
pub async fn get_all<A: ResourceAccessor>(
    State(state): State<CrudContext<A>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut ctx = RequestContext::new(method, uri, headers, params, None);
    if let Err(response) = run_chain(&state.options.middleware, Op::List, &mut ctx).await {
        return response;
    }
    match list_documents(&state, &ctx).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn list_documents<A: ResourceAccessor>(
    state: &CrudContext<A>,
    ctx: &RequestContext,
) -> Result<Response, CrudError> {
    let options = &state.options;
    let intent = QueryIntent::resolve(&ctx.params, options);

    let mut query = state
        .accessor
        .find(&intent.filter, &options.projection)
        .sort(&intent.sort);
    for field in &options.populate {
        query = query.populate(field);
    }

    if options.pagination.enabled {
        let windowed = query.skip(intent.window.skip).limit(intent.window.limit);
        // Window read and total count are independent; run them concurrently
        // and wait for both.
        let (data, total) = tokio::try_join!(
            async {
                windowed
                    .exec()
                    .await
                    .map_err(|err| read_failure(&err, FETCH_MANY_FALLBACK))
            },
            async {
                state
                    .accessor
                    .count_documents(&intent.filter)
                    .await
                    .map_err(|err| read_failure(&err, FETCH_MANY_FALLBACK))
            },
        )?;
        Ok(Json(ListResponse {
            data,
            pagination: Some(PaginationMeta::new(total, intent.window)),
        })
        .into_response())
    } else {
        let data = query
            .exec()
            .await
            .map_err(|err| read_failure(&err, FETCH_MANY_FALLBACK))?;
        Ok(Json(ListResponse {
            data,
            pagination: None,
        })
        .into_response())
    }
}

/// Fetch one document: `GET {base}/{id}`.
pub async fn get_one<A: ResourceAccessor>(
    State(state): State<CrudContext<A>>,
    Path(id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut ctx = RequestContext::new(method, uri, headers, params, Some(id.clone()));
    if let Err(response) = run_chain(&state.options.middleware, Op::GetOne, &mut ctx).await {
        return response;
    }
    match fetch_document(&state, &id).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn fetch_document<A: ResourceAccessor>(
    state: &CrudContext<A>,
    id: &str,
) -> Result<Response, CrudError> {
    require_id(id)?;
    let mut query = state.accessor.find_by_id(id, &state.options.projection);
    for field in &state.options.populate {
        query = query.populate(field);
    }
    let doc = query
        .exec_one()
        .await
        .map_err(|err| read_failure(&err, FETCH_ONE_FALLBACK))?
        .ok_or(CrudError::NotFound)?;
    Ok(Json(doc).into_response())
}

/// Create a document: `POST {base}/`.
pub async fn create_one<A: ResourceAccessor>(
    State(state): State<CrudContext<A>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let mut ctx = RequestContext::new(method, uri, headers, params, None);
    if let Err(response) = run_chain(&state.options.middleware, Op::Create, &mut ctx).await {
        return response;
    }
    match create_document(&state, &ctx, body).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn create_document<A: ResourceAccessor>(
    state: &CrudContext<A>,
    ctx: &RequestContext,
    mut body: Value,
) -> Result<Response, CrudError> {
    let options = &state.options;
    if let Some(validator) = &options.validate_body {
        let valid = validator
            .validate(&body)
            .await
            .map_err(|err| write_failure(&err, CREATE_FALLBACK))?;
        if !valid {
            // Short-circuit: the accessor is never called.
            return Err(CrudError::ValidationFailed);
        }
    }
    options
        .hooks
        .before_create(ctx, &mut body)
        .await
        .map_err(|err| write_failure(&err, CREATE_FALLBACK))?;
    let doc = state
        .accessor
        .create(body)
        .await
        .map_err(|err| write_failure(&err, CREATE_FALLBACK))?;
    options
        .hooks
        .after_create(ctx, &doc)
        .await
        .map_err(|err| write_failure(&err, CREATE_FALLBACK))?;
    Ok((StatusCode::CREATED, Json(doc)).into_response())
}

/// Update a document: `PUT {base}/{id}`.
pub async fn update_one<A: ResourceAccessor>(
    State(state): State<CrudContext<A>>,
    Path(id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let mut ctx = RequestContext::new(method, uri, headers, params, Some(id.clone()));
    if let Err(response) = run_chain(&state.options.middleware, Op::Update, &mut ctx).await {
        return response;
    }
    match update_document(&state, &ctx, &id, body).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn update_document<A: ResourceAccessor>(
    state: &CrudContext<A>,
    ctx: &RequestContext,
    id: &str,
    mut body: Value,
) -> Result<Response, CrudError> {
    require_id(id)?;
    // No body validation here: updates may be partial, and the store runs its
    // own field-level validators during the update.
    let options = &state.options;
    options
        .hooks
        .before_update(ctx, id, &mut body)
        .await
        .map_err(|err| write_failure(&err, UPDATE_FALLBACK))?;
    let doc = state
        .accessor
        .update_by_id(
            id,
            body,
            UpdateOptions {
                return_new: true,
                run_validators: true,
            },
        )
        .await
        .map_err(|err| write_failure(&err, UPDATE_FALLBACK))?
        .ok_or(CrudError::NotFound)?;
    options
        .hooks
        .after_update(ctx, &doc)
        .await
        .map_err(|err| write_failure(&err, UPDATE_FALLBACK))?;
    Ok(Json(doc).into_response())
}

/// Delete a document: `DELETE {base}/{id}`.
pub async fn delete_one<A: ResourceAccessor>(
    State(state): State<CrudContext<A>>,
    Path(id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut ctx = RequestContext::new(method, uri, headers, params, Some(id.clone()));
    if let Err(response) = run_chain(&state.options.middleware, Op::Delete, &mut ctx).await {
        return response;
    }
    match delete_document(&state, &ctx, &id).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn delete_document<A: ResourceAccessor>(
    state: &CrudContext<A>,
    ctx: &RequestContext,
    id: &str,
) -> Result<Response, CrudError> {
    require_id(id)?;
    let options = &state.options;
    // A failing before-delete hook aborts the deletion entirely.
    options
        .hooks
        .before_delete(ctx, id)
        .await
        .map_err(|err| read_failure(&err, DELETE_FALLBACK))?;
    state
        .accessor
        .delete_by_id(id)
        .await
        .map_err(|err| read_failure(&err, DELETE_FALLBACK))?
        .ok_or(CrudError::NotFound)?;
    options
        .hooks
        .after_delete(ctx, id)
        .await
        .map_err(|err| read_failure(&err, DELETE_FALLBACK))?;
    Ok(Json(DeleteResponse::new(id)).into_response())
}

/// Bind the five CRUD routes for `accessor` under `base_route` and return the
/// resulting router, ready to merge into an application.
///
/// | Method | Path | Success |
/// |---|---|---|
/// | GET | `{base}/` | 200 `{data[, pagination]}` |
/// | GET | `{base}/{id}` | 200 document |
/// | POST | `{base}/` | 201 document |
/// | PUT | `{base}/{id}` | 200 document |
/// | DELETE | `{base}/{id}` | 200 `{success, message, id}` |
///
/// A `base_route` of `/` (or empty) mounts the routes at the root, since axum
/// does not nest there.
pub fn crud_router<A: ResourceAccessor>(
    base_route: &str,
    accessor: A,
    options: CrudOptions<A::Document>,
) -> Router {
    let state = CrudContext {
        accessor: Arc::new(accessor),
        options: Arc::new(options),
    };
    tracing::debug!(base_route, "registering CRUD routes");
    let routes = Router::new()
        .route("/", get(get_all::<A>).post(create_one::<A>))
        .route(
            "/{id}",
            get(get_one::<A>)
                .put(update_one::<A>)
                .delete(delete_one::<A>),
        )
        .with_state(state);
    let base = base_route.trim_end_matches('/');
    if base.is_empty() {
        routes
    } else {
        Router::new().nest(base, routes)
    }
}
