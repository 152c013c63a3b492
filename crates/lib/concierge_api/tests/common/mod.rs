//! Shared fixtures: an in-memory Notion workspace, a recording mailer and a
//! state wired to a manual clock.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::{TimeZone, Utc};
use concierge_api::config::ApiConfig;
use concierge_api::{AppState, router};
use concierge_core::cache::ResponseCache;
use concierge_core::clock::ManualClock;
use concierge_core::mail::{EmailMessage, MailClient, MailError};
use concierge_core::notion::{NotionApi, NotionConnector, NotionError, NotionResult, SearchQuery};
use concierge_core::session::JwtSessionCodec;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tower::ServiceExt;

pub const VALID_KEY: &str = "secret_abc123";
pub const SESSION_SECRET: &str = "test-session-secret";

/// Upstream state shared by every client the fake connector hands out.
#[derive(Default)]
pub struct FakeWorkspace {
    valid_keys: Mutex<HashSet<String>>,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<String>>,
    created_pages: Mutex<Vec<Value>>,
    created_databases: Mutex<Vec<Value>>,
    more_rows: AtomicBool,
}

impl FakeWorkspace {
    pub fn new() -> Arc<Self> {
        let ws = Arc::new(Self::default());
        ws.allow_key(VALID_KEY);
        ws
    }

    pub fn allow_key(&self, key: &str) {
        self.valid_keys.lock().unwrap().insert(key.to_string());
    }

    /// Make `op` (e.g. `"create_page"`) fail with an upstream outage.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Database queries report a further page of rows.
    pub fn paginate_rows(&self) {
        self.more_rows.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == op).count()
    }

    pub fn created_pages(&self) -> Vec<Value> {
        self.created_pages.lock().unwrap().clone()
    }

    pub fn created_databases(&self) -> Vec<Value> {
        self.created_databases.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str) -> NotionResult<()> {
        self.calls.lock().unwrap().push(op.to_string());
        if self.failing.lock().unwrap().contains(op) {
            return Err(NotionError::UpstreamUnavailable(format!("{op} unavailable")));
        }
        Ok(())
    }
}

pub struct FakeConnector(pub Arc<FakeWorkspace>);

impl NotionConnector for FakeConnector {
    fn connect(&self, api_key: &str) -> Arc<dyn NotionApi> {
        Arc::new(FakeNotion {
            key: api_key.to_string(),
            ws: Arc::clone(&self.0),
        })
    }
}

struct FakeNotion {
    key: String,
    ws: Arc<FakeWorkspace>,
}

impl FakeNotion {
    fn authorize(&self) -> NotionResult<()> {
        if self.ws.valid_keys.lock().unwrap().contains(&self.key) {
            Ok(())
        } else {
            Err(NotionError::Unauthorized("API token is invalid.".into()))
        }
    }

    fn call(&self, op: &'static str) -> NotionResult<()> {
        self.ws.record(op)?;
        self.authorize()
    }
}

#[async_trait]
impl NotionApi for FakeNotion {
    async fn me(&self) -> NotionResult<Value> {
        self.call("me")?;
        Ok(json!({"object": "user", "id": "bot-1", "type": "bot", "name": "Concierge"}))
    }

    async fn search(&self, query: &SearchQuery) -> NotionResult<Value> {
        self.call("search")?;
        let q = query.query.clone().unwrap_or_default();
        Ok(json!({"object": "list", "results": [sample_database()], "query": q}))
    }

    async fn retrieve_database(&self, id: &str) -> NotionResult<Value> {
        self.call("retrieve_database")?;
        if id == "missing" {
            return Err(NotionError::NotFound("Could not find database".into()));
        }
        Ok(sample_database())
    }

    async fn create_database(&self, body: &Value) -> NotionResult<Value> {
        self.call("create_database")?;
        self.ws.created_databases.lock().unwrap().push(body.clone());
        Ok(json!({"object": "database", "id": "db-new"}))
    }

    async fn update_database(&self, id: &str, body: &Value) -> NotionResult<Value> {
        self.call("update_database")?;
        Ok(json!({"object": "database", "id": id, "archived": body["archived"]}))
    }

    async fn query_database(&self, _id: &str, _body: &Value) -> NotionResult<Value> {
        self.call("query_database")?;
        let has_more = self.ws.more_rows.load(Ordering::SeqCst);
        Ok(json!({
            "object": "list",
            "results": [{"id": "row-1"}, {"id": "row-2"}],
            "has_more": has_more,
        }))
    }

    async fn retrieve_page(&self, id: &str) -> NotionResult<Value> {
        self.call("retrieve_page")?;
        Ok(sample_page(id))
    }

    async fn create_page(&self, body: &Value) -> NotionResult<Value> {
        self.call("create_page")?;
        self.ws.created_pages.lock().unwrap().push(body.clone());
        Ok(json!({"object": "page", "id": "page-new"}))
    }

    async fn update_page(&self, id: &str, body: &Value) -> NotionResult<Value> {
        self.call("update_page")?;
        Ok(json!({"object": "page", "id": id, "patch": body}))
    }

    async fn list_block_children(&self, _id: &str, _cursor: Option<&str>) -> NotionResult<Value> {
        self.call("list_block_children")?;
        Ok(json!({
            "object": "list",
            "results": [
                {"id": "b1", "type": "paragraph", "paragraph": {"rich_text": []}},
                {"id": "b2", "type": "child_page", "child_page": {"title": "Nested"}},
            ],
            "has_more": false,
        }))
    }
}

pub fn sample_database() -> Value {
    json!({
        "object": "database",
        "id": "db1",
        "parent": {"type": "page_id", "page_id": "root-page"},
        "title": [{"type": "text", "text": {"content": "Clinics"}, "plain_text": "Clinics"}],
        "properties": {
            "Name": {"id": "title", "type": "title", "title": {}},
            "Stage": {"id": "s1", "type": "status", "status": {}},
        },
    })
}

pub fn sample_page(id: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "parent": {"type": "database_id", "database_id": "db1"},
        "properties": {
            "Name": {
                "id": "title",
                "type": "title",
                "title": [{"type": "text", "text": {"content": "Seoul clinic"}, "plain_text": "Seoul clinic"}],
            },
            "Created": {"id": "c1", "type": "created_time", "created_time": "2026-01-01T00:00:00.000Z"},
        },
    })
}

/// Records every email; optionally fails them all.
#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

impl FakeMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailClient for FakeMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Provider("503 Service Unavailable".into()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    fn from_address(&self) -> &str {
        "Concierge <noreply@example.com>"
    }
}

/// Everything a test needs to drive the router and inspect side effects.
pub struct Harness {
    pub state: AppState,
    pub workspace: Arc<FakeWorkspace>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_mailer(None)
    }

    pub fn with_mailer(mailer: Option<Arc<FakeMailer>>) -> Self {
        let mut config = ApiConfig::local(SESSION_SECRET);
        config.site.contact_email = "hello@concierge.example".into();
        Self::build(config, mailer)
    }

    pub fn build(config: ApiConfig, mailer: Option<Arc<FakeMailer>>) -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        ));
        let workspace = FakeWorkspace::new();
        let state = AppState {
            sessions: Arc::new(JwtSessionCodec::with_clock(
                config.session_secret.clone(),
                clock.clone(),
            )),
            notion: Arc::new(FakeConnector(Arc::clone(&workspace))),
            mailer: mailer.map(|m| m as Arc<dyn MailClient>),
            cache: Arc::new(RwLock::new(ResponseCache::new())),
            config,
        };
        Self {
            state,
            workspace,
            clock,
        }
    }

    pub fn app(&self) -> Router {
        router(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app().oneshot(request).await.expect("request")
    }

    /// Log in with `key` and return the `name=value` cookie pair, if one was set.
    pub async fn login(&self, key: &str) -> Option<String> {
        let resp = self
            .send(json_request("POST", "/api/auth/session", &json!({"apiKey": key}), None))
            .await;
        session_cookie_pair(&resp)
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// The `notion-auth-token=...` pair from a response's `Set-Cookie`, if present.
pub fn session_cookie_pair(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("notion-auth-token="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn set_cookie_headers(resp: &Response<Body>) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}
