//! Notion proxy handlers.
//!
//! Thin wrappers: every response is HTTP 200 carrying an [`Envelope`].
//! Bodies that are not JSON objects are rejected as invalid input without
//! calling upstream.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use concierge_core::envelope::{Envelope, ErrorKind};
use concierge_core::notion::duplicate::DuplicateResult;
use serde_json::Value;

use crate::AppState;
use crate::middleware::session::WorkspaceSession;
use crate::models::{ListQuery, SearchRequest};
use crate::services::notion::NotionActions;

type Reply = Json<Envelope<Value>>;

fn actions(state: &AppState, session: &WorkspaceSession) -> NotionActions {
    NotionActions::for_session(state, session)
}

/// A JSON object body, or the failure envelope to return instead.
fn object_body(body: &Bytes) -> Result<Value, Reply> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) if value.is_object() => Ok(value),
        _ => Err(Json(Envelope::fail(
            ErrorKind::InvalidInput,
            "Request body must be a JSON object",
        ))),
    }
}

fn search_text(query: &ListQuery) -> Option<&str> {
    query.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
}

// ---------------------------------------------------------------------------
// Databases
// ---------------------------------------------------------------------------

/// `GET /api/notion/databases` (`?q=` searches by title).
pub async fn list_databases_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    Query(query): Query<ListQuery>,
) -> Reply {
    let actions = actions(&state, &session);
    Json(match search_text(&query) {
        Some(text) => actions.search_databases(text).await,
        None => actions.list_databases().await,
    })
}

pub async fn create_database_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    body: Bytes,
) -> Reply {
    let body = match object_body(&body) {
        Ok(body) => body,
        Err(reply) => return reply,
    };
    Json(actions(&state, &session).create_database(&body).await)
}

pub async fn get_database_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    Path(id): Path<String>,
) -> Reply {
    Json(actions(&state, &session).get_database(&id).await)
}

pub async fn update_database_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    Path(id): Path<String>,
    body: Bytes,
) -> Reply {
    let body = match object_body(&body) {
        Ok(body) => body,
        Err(reply) => return reply,
    };
    Json(actions(&state, &session).update_database(&id, &body).await)
}

pub async fn archive_database_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    Path(id): Path<String>,
) -> Reply {
    Json(actions(&state, &session).archive_database(&id).await)
}

pub async fn duplicate_database_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    Path(id): Path<String>,
) -> Json<Envelope<DuplicateResult>> {
    Json(actions(&state, &session).duplicate_database(&id).await)
}

pub async fn database_children_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Reply {
    Json(
        actions(&state, &session)
            .list_database_children(&id, query.cursor.as_deref())
            .await,
    )
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// `GET /api/notion/pages` (`?q=` searches by title).
pub async fn list_pages_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    Query(query): Query<ListQuery>,
) -> Reply {
    let actions = actions(&state, &session);
    Json(match search_text(&query) {
        Some(text) => actions.search_pages(text).await,
        None => actions.list_pages().await,
    })
}

pub async fn create_page_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    body: Bytes,
) -> Reply {
    let body = match object_body(&body) {
        Ok(body) => body,
        Err(reply) => return reply,
    };
    Json(actions(&state, &session).create_page(&body).await)
}

pub async fn get_page_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    Path(id): Path<String>,
) -> Reply {
    Json(actions(&state, &session).get_page(&id).await)
}

/// `PATCH /api/notion/pages/{id}`: a bare property map is wrapped as `{properties}`.
pub async fn update_page_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    Path(id): Path<String>,
    body: Bytes,
) -> Reply {
    let body = match object_body(&body) {
        Ok(body) => body,
        Err(reply) => return reply,
    };
    let body = if is_page_update(&body) {
        body
    } else {
        serde_json::json!({ "properties": body })
    };
    Json(actions(&state, &session).update_page(&id, &body).await)
}

pub async fn archive_page_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    Path(id): Path<String>,
) -> Reply {
    Json(actions(&state, &session).archive_page(&id).await)
}

pub async fn duplicate_page_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    Path(id): Path<String>,
) -> Json<Envelope<DuplicateResult>> {
    Json(actions(&state, &session).duplicate_page(&id).await)
}

pub async fn page_children_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Reply {
    Json(
        actions(&state, &session)
            .list_page_children(&id, query.cursor.as_deref())
            .await,
    )
}

/// Top-level keys accepted by `PATCH /pages/{id}`.
const PAGE_UPDATE_KEYS: &[&str] = &["properties", "archived", "in_trash", "icon", "cover"];

fn is_page_update(body: &Value) -> bool {
    body.as_object()
        .is_some_and(|map| map.keys().any(|k| PAGE_UPDATE_KEYS.contains(&k.as_str())))
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// `POST /api/notion/search`: databases and pages; an empty body lists everything.
pub async fn search_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
    body: Bytes,
) -> Reply {
    let request: SearchRequest = serde_json::from_slice(&body).unwrap_or_default();
    Json(
        actions(&state, &session)
            .search(request.query.as_deref())
            .await,
    )
}
