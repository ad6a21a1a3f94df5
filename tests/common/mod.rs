//! Shared test support: an in-memory [`ResourceAccessor`] with call counters
//! and failure injection, plus app/request helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use crudgen::{
    BoxError, CrudOptions, FilterMap, Projection, ResourceAccessor, ResourceQuery, SortSpec,
    UpdateOptions, crud_router,
};
use serde_json::{Value, json};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

/// Backing store shared between the accessor handed to the router and the
/// test body, so tests can seed data and assert on call counts.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<Vec<Value>>,
    /// field name -> referenced id -> referenced document.
    related: Mutex<HashMap<String, HashMap<String, Value>>>,
    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub last_update_options: Mutex<Option<UpdateOptions>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, docs: impl IntoIterator<Item = Value>) {
        self.docs.lock().unwrap().extend(docs);
    }

    pub fn insert_related(&self, field: &str, id: &str, doc: Value) {
        self.related
            .lock()
            .unwrap()
            .entry(field.to_string())
            .or_default()
            .insert(id.to_string(), doc);
    }

    pub fn doc_count(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(AtomicOrdering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(AtomicOrdering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(AtomicOrdering::SeqCst)
    }
}

pub struct MemoryAccessor {
    pub store: Arc<MemoryStore>,
}

fn matches(doc: &Value, filter: &FilterMap) -> bool {
    filter.iter().all(|(key, expected)| match doc.get(key) {
        Some(Value::String(actual)) => actual == expected,
        Some(other) => other.to_string() == *expected,
        None => false,
    })
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn apply_projection(doc: &mut Value, projection: &Projection) {
    if projection.is_empty() {
        return;
    }
    let Some(map) = doc.as_object_mut() else {
        return;
    };
    let include_mode = projection.values().any(|keep| *keep);
    if include_mode {
        map.retain(|key, _| key == "id" || projection.get(key).copied().unwrap_or(false));
    } else {
        map.retain(|key, _| projection.get(key).copied().unwrap_or(true));
    }
}

pub struct MemoryQuery {
    store: Arc<MemoryStore>,
    filter: FilterMap,
    projection: Projection,
    by_id: Option<String>,
    sort: Option<SortSpec>,
    populate: Vec<String>,
    skip: Option<i64>,
    limit: Option<i64>,
}

impl MemoryQuery {
    fn shape(&self, doc: &mut Value) {
        for field in &self.populate {
            let Some(ref_id) = doc.get(field).and_then(Value::as_str).map(str::to_string) else {
                continue;
            };
            let related = self.store.related.lock().unwrap();
            if let Some(expanded) = related.get(field).and_then(|by_id| by_id.get(&ref_id)) {
                doc[field] = expanded.clone();
            }
        }
        apply_projection(doc, &self.projection);
    }
}

#[async_trait]
impl ResourceQuery for MemoryQuery {
    type Document = Value;

    fn sort(mut self, spec: &SortSpec) -> Self {
        self.sort = Some(spec.clone());
        self
    }

    fn populate(mut self, field: &str) -> Self {
        self.populate.push(field.to_string());
        self
    }

    fn skip(mut self, n: i64) -> Self {
        self.skip = Some(n);
        self
    }

    fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    async fn exec(self) -> Result<Vec<Value>, BoxError> {
        if self.store.fail_reads.load(AtomicOrdering::SeqCst) {
            return Err("storage offline".to_string().into());
        }
        let mut matched: Vec<Value> = {
            let docs = self.store.docs.lock().unwrap();
            docs.iter().filter(|doc| matches(doc, &self.filter)).cloned().collect()
        };
        if let Some(spec) = &self.sort {
            matched.sort_by(|a, b| {
                let ord = compare_values(
                    a.get(&spec.field).unwrap_or(&Value::Null),
                    b.get(&spec.field).unwrap_or(&Value::Null),
                );
                if spec.is_descending() { ord.reverse() } else { ord }
            });
        }
        if let Some(skip) = self.skip {
            let skip = usize::try_from(skip).unwrap_or(0);
            matched = matched.into_iter().skip(skip).collect();
        }
        if let Some(limit) = self.limit {
            // A window below 1 yields nothing, mirroring a real store handed
            // a non-positive page size.
            matched.truncate(usize::try_from(limit).unwrap_or(0));
        }
        let mut shaped = matched;
        for doc in &mut shaped {
            self.shape(doc);
        }
        Ok(shaped)
    }

    async fn exec_one(self) -> Result<Option<Value>, BoxError> {
        if self.store.fail_reads.load(AtomicOrdering::SeqCst) {
            return Err("storage offline".to_string().into());
        }
        let found = {
            let docs = self.store.docs.lock().unwrap();
            docs.iter()
                .find(|doc| doc.get("id").and_then(Value::as_str) == self.by_id.as_deref())
                .cloned()
        };
        Ok(found.map(|mut doc| {
            self.shape(&mut doc);
            doc
        }))
    }
}

#[async_trait]
impl ResourceAccessor for MemoryAccessor {
    type Document = Value;
    type Query = MemoryQuery;

    fn find(&self, filter: &FilterMap, projection: &Projection) -> MemoryQuery {
        MemoryQuery {
            store: Arc::clone(&self.store),
            filter: filter.clone(),
            projection: projection.clone(),
            by_id: None,
            sort: None,
            populate: Vec::new(),
            skip: None,
            limit: None,
        }
    }

    fn find_by_id(&self, id: &str, projection: &Projection) -> MemoryQuery {
        MemoryQuery {
            store: Arc::clone(&self.store),
            filter: FilterMap::new(),
            projection: projection.clone(),
            by_id: Some(id.to_string()),
            sort: None,
            populate: Vec::new(),
            skip: None,
            limit: None,
        }
    }

    async fn count_documents(&self, filter: &FilterMap) -> Result<u64, BoxError> {
        if self.store.fail_reads.load(AtomicOrdering::SeqCst) {
            return Err("storage offline".to_string().into());
        }
        let docs = self.store.docs.lock().unwrap();
        Ok(docs.iter().filter(|doc| matches(doc, filter)).count() as u64)
    }

    async fn create(&self, mut data: Value) -> Result<Value, BoxError> {
        self.store.create_calls.fetch_add(1, AtomicOrdering::SeqCst);
        let Some(map) = data.as_object_mut() else {
            return Err("document body must be an object".to_string().into());
        };
        if !map.contains_key("id") {
            map.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
        }
        self.store.docs.lock().unwrap().push(data.clone());
        Ok(data)
    }

    async fn update_by_id(
        &self,
        id: &str,
        data: Value,
        options: UpdateOptions,
    ) -> Result<Option<Value>, BoxError> {
        self.store.update_calls.fetch_add(1, AtomicOrdering::SeqCst);
        *self.store.last_update_options.lock().unwrap() = Some(options);
        let Some(changes) = data.as_object() else {
            return Err("update body must be an object".to_string().into());
        };
        let mut docs = self.store.docs.lock().unwrap();
        let Some(doc) = docs
            .iter_mut()
            .find(|doc| doc.get("id").and_then(Value::as_str) == Some(id))
        else {
            return Ok(None);
        };
        if let Some(target) = doc.as_object_mut() {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(Some(doc.clone()))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Value>, BoxError> {
        self.store.delete_calls.fetch_add(1, AtomicOrdering::SeqCst);
        let mut docs = self.store.docs.lock().unwrap();
        let position = docs
            .iter()
            .position(|doc| doc.get("id").and_then(Value::as_str) == Some(id));
        Ok(position.map(|index| docs.remove(index)))
    }
}

/// Mount the CRUD routes for a shared store under `/api/items`.
pub fn setup_app(store: &Arc<MemoryStore>, options: CrudOptions<Value>) -> Router {
    crud_router(
        "/api/items",
        MemoryAccessor {
            store: Arc::clone(store),
        },
        options,
    )
}

/// Seed `count` documents with predictable ids, names, ages, roles, and
/// creation timestamps.
pub fn seed_people(store: &MemoryStore, count: usize) {
    store.seed((0..count).map(|index| {
        json!({
            "id": format!("person-{index:03}"),
            "name": format!("Person {index:03}"),
            "age": 20 + (index % 50),
            "role": if index % 2 == 0 { "admin" } else { "member" },
            "created_at": index,
        })
    }));
}

/// Fire one request at the app and decode the JSON response.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
