use super::cards::{BookCard, CardOptions};
use super::registry::{SessionId, SessionRegistry};
use super::session::SearchSession;
use super::state::{QueryKey, SearchState};
use super::suggestions::{
    MAX_SUGGESTIONS, SEARCH_CATEGORIES, category, featured, filter_suggestions,
};
use crate::catalog::query::SearchScope;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::{Json, Router, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Header carrying the session id; the `session` query parameter takes precedence.
pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub card_options: Arc<CardOptions>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub scope: Option<String>,
    pub session: Option<String>,
}

#[derive(Deserialize)]
pub struct SessionParams {
    pub session: Option<String>,
}

#[derive(Deserialize)]
pub struct SuggestionParams {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct CategoryParams {
    pub name: Option<String>,
}

/// What the results area of one client should show.
#[derive(Debug, Serialize)]
pub struct SearchView {
    pub session: SessionId,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub cards: Vec<BookCard>,
}

impl SearchView {
    pub fn new(session: SessionId, state: &SearchState, options: &CardOptions) -> Self {
        let (total, message) = match state {
            SearchState::Success { total, .. } => (Some(*total), None),
            SearchState::Empty { .. } => (Some(0), None),
            SearchState::Error { message, .. } => (None, Some(message.clone())),
            SearchState::Idle | SearchState::Loading { .. } => (None, None),
        };

        Self {
            session,
            state: state.name(),
            query: state.query().cloned(),
            total,
            message,
            cards: state
                .books()
                .iter()
                .map(|book| BookCard::from_book(book, options))
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub query: String,
    pub suggestions: Vec<&'static str>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", get(handle_search))
        .route("/api/retry", post(handle_retry))
        .route("/api/clear", post(handle_clear))
        .route("/api/state", get(handle_state))
        .route("/api/suggestions", get(handle_suggestions))
        .route("/api/suggestions/categories", get(handle_categories))
        .route("/api/health", get(handle_health))
        .with_state(state)
}

fn requested_session(headers: &HeaderMap, param: Option<String>) -> Option<SessionId> {
    param
        .or_else(|| {
            headers
                .get(SESSION_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .map(SessionId)
}

fn existing_session(
    app: &AppState,
    headers: &HeaderMap,
    param: Option<String>,
) -> Result<(SessionId, Arc<SearchSession>), (StatusCode, String)> {
    let id = requested_session(headers, param)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "missing session id".to_string()))?;
    let session = app
        .sessions
        .get(&id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown session {}", id)))?;
    Ok((id, session))
}

/// Searches within the caller's session, starting a new session when the
/// request carries no known id. The id is returned in the view.
pub async fn handle_search(
    State(app): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchView>, (StatusCode, String)> {
    let scope = match params.scope.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw
            .parse::<SearchScope>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        _ => SearchScope::All,
    };

    let requested = requested_session(&headers, params.session);
    let (id, session) = app.sessions.resolve(requested.as_ref());

    let state = session.submit(&params.q, scope).await;
    Ok(Json(SearchView::new(id, &state, &app.card_options)))
}

pub async fn handle_retry(
    State(app): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SessionParams>,
) -> Result<Json<SearchView>, (StatusCode, String)> {
    let (id, session) = existing_session(&app, &headers, params.session)?;
    match session.retry().await {
        Some(state) => Ok(Json(SearchView::new(id, &state, &app.card_options))),
        None => Err((StatusCode::CONFLICT, "nothing to retry".to_string())),
    }
}

pub async fn handle_clear(
    State(app): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SessionParams>,
) -> Result<Json<SearchView>, (StatusCode, String)> {
    let (id, session) = existing_session(&app, &headers, params.session)?;
    session.clear().await;
    Ok(Json(SearchView::new(id, &SearchState::Idle, &app.card_options)))
}

pub async fn handle_state(
    State(app): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SessionParams>,
) -> Result<Json<SearchView>, (StatusCode, String)> {
    let (id, session) = existing_session(&app, &headers, params.session)?;
    let state = session.state().await;
    Ok(Json(SearchView::new(id, &state, &app.card_options)))
}

pub async fn handle_suggestions(Query(params): Query<SuggestionParams>) -> Json<SuggestionsResponse> {
    let query = params.q.unwrap_or_default();
    let suggestions = if query.trim().is_empty() {
        featured(MAX_SUGGESTIONS)
    } else {
        filter_suggestions(&query, MAX_SUGGESTIONS)
    };

    Json(SuggestionsResponse { query, suggestions })
}

/// All suggestion groups, or a single one with `?name=`.
pub async fn handle_categories(
    Query(params): Query<CategoryParams>,
) -> Result<Json<BTreeMap<String, &'static [&'static str]>>, (StatusCode, String)> {
    match params.name {
        Some(name) => {
            let entries = category(&name)
                .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown category {}", name)))?;
            Ok(Json(BTreeMap::from([(name, entries)])))
        }
        None => Ok(Json(
            SEARCH_CATEGORIES
                .iter()
                .map(|(group, entries)| (group.to_string(), *entries))
                .collect(),
        )),
    }
}

pub async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
