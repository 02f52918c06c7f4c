//! Shared test fixtures: an in-process stub of the catalog HTTP endpoint and a
//! scripted in-memory `CatalogSource`.

use crate::catalog::client::{CatalogError, CatalogSource};
use crate::catalog::query::SearchRequest;
use crate::catalog::types::CatalogSearchResponse;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

pub fn catalog_body(titles_and_authors: &[(&str, &str)]) -> Value {
    let docs: Vec<Value> = titles_and_authors
        .iter()
        .enumerate()
        .map(|(i, (title, author))| {
            json!({
                "key": format!("/works/OL{}W", i + 1),
                "title": title,
                "author_name": [author],
            })
        })
        .collect();

    json!({
        "numFound": docs.len(),
        "start": 0,
        "numFoundExact": true,
        "docs": docs,
    })
}

/// Queued responses for the stub endpoint. The last one repeats forever.
pub struct StubCatalog {
    responses: Mutex<VecDeque<(StatusCode, Value)>>,
    pub requests: Mutex<Vec<HashMap<String, String>>>,
}

impl StubCatalog {
    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

async fn stub_search(
    State(stub): State<Arc<StubCatalog>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    stub.requests.lock().await.push(params);

    let mut responses = stub.responses.lock().await;
    let next = if responses.len() > 1 {
        responses.pop_front()
    } else {
        responses.front().cloned()
    };
    let (status, body) = next.unwrap_or((StatusCode::OK, catalog_body(&[])));
    (status, Json(body))
}

/// Starts the stub catalog on an ephemeral port and returns its search URL.
pub async fn spawn_stub_catalog(responses: Vec<(StatusCode, Value)>) -> (String, Arc<StubCatalog>) {
    let stub = Arc::new(StubCatalog {
        responses: Mutex::new(responses.into()),
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/search.json", get(stub_search))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/search.json", addr), stub)
}

/// In-memory source answering by query string, with an optional delay per query.
#[derive(Default)]
pub struct ScriptedSource {
    answers: HashMap<String, (Duration, Option<Value>)>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, query: &str, body: Value) -> Self {
        self.answers
            .insert(query.to_string(), (Duration::ZERO, Some(body)));
        self
    }

    pub fn answer_after(mut self, query: &str, delay: Duration, body: Value) -> Self {
        self.answers.insert(query.to_string(), (delay, Some(body)));
        self
    }

    pub fn fail(mut self, query: &str) -> Self {
        self.answers.insert(query.to_string(), (Duration::ZERO, None));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn search(&self, request: &SearchRequest) -> Result<CatalogSearchResponse, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.answers.get(&request.query) {
            Some((delay, body)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                match body {
                    Some(body) => serde_json::from_value(body.clone())
                        .map_err(|e| CatalogError::Decode(e.to_string())),
                    None => Err(CatalogError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
                }
            }
            None => Ok(CatalogSearchResponse::default()),
        }
    }
}
