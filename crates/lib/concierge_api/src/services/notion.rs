//! Notion proxy actions.
//!
//! Each action is one upstream call (duplicates: two reads and a write)
//! wrapped in an [`Envelope`]. Reads go through the response cache;
//! any successful mutation revalidates every cached read of the session.

use std::future::Future;
use std::sync::Arc;

use concierge_core::cache::ResponseCache;
use concierge_core::envelope::Envelope;
use concierge_core::notion::duplicate::{self, DuplicateResult};
use concierge_core::notion::{NotionApi, NotionError, NotionResult, ObjectKind, SearchQuery};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::AppState;
use crate::middleware::session::WorkspaceSession;
use crate::models::WorkspaceOverview;
use crate::services::session::cache_scope;

/// Cache paths of workspace reads.
pub mod paths {
    pub const WORKSPACE: &str = "/workspace";
    pub const DATABASES: &str = "/workspace/databases";
    pub const PAGES: &str = "/workspace/pages";

    /// Notion accepts ids with or without dashes, in any case.
    pub fn normalize_id(id: &str) -> String {
        id.trim()
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }

    pub fn database(id: &str) -> String {
        format!("{DATABASES}/{}", normalize_id(id))
    }

    pub fn database_children(id: &str) -> String {
        format!("{}/children", database(id))
    }

    pub fn page(id: &str) -> String {
        format!("{PAGES}/{}", normalize_id(id))
    }

    pub fn page_children(id: &str) -> String {
        format!("{}/children", page(id))
    }
}

/// Proxy actions bound to one session.
pub struct NotionActions {
    api: Arc<dyn NotionApi>,
    cache: Arc<RwLock<ResponseCache>>,
    scope: String,
}

impl NotionActions {
    pub fn for_session(state: &AppState, session: &WorkspaceSession) -> Self {
        Self {
            api: state.notion.connect(session.api_key()),
            cache: Arc::clone(&state.cache),
            scope: cache_scope(session.api_key()),
        }
    }

    async fn cached_read(
        &self,
        action: &'static str,
        path: &str,
        variant: &str,
        fetch: impl Future<Output = NotionResult<Value>>,
    ) -> Envelope<Value> {
        if let Some(hit) = self.cache.read().await.get(&self.scope, path, variant) {
            debug!(action, path, "serving cached read");
            return Envelope::ok(hit);
        }
        match fetch.await {
            Ok(value) => {
                self.cache
                    .write()
                    .await
                    .set(&self.scope, path, variant, value.clone());
                Envelope::ok(value)
            }
            Err(e) => failed(action, e),
        }
    }

    async fn mutation<T>(&self, action: &'static str, result: NotionResult<T>) -> Envelope<T> {
        match result {
            Ok(value) => {
                self.revalidate(action).await;
                Envelope::ok(value)
            }
            Err(e) => failed(action, e),
        }
    }

    /// Drop every cached read of this session.
    ///
    /// A page edit can change search results and the row list of its parent
    /// database, neither of which is addressable from the page id alone.
    async fn revalidate(&self, action: &'static str) {
        self.cache
            .write()
            .await
            .revalidate(&self.scope, &[paths::WORKSPACE]);
        debug!(action, "revalidated workspace reads");
    }

    // -----------------------------------------------------------------------
    // Databases
    // -----------------------------------------------------------------------

    pub async fn list_databases(&self) -> Envelope<Value> {
        let query = SearchQuery::of(ObjectKind::Database);
        self.cached_read("list_databases", paths::DATABASES, "", self.api.search(&query))
            .await
    }

    pub async fn search_databases(&self, text: &str) -> Envelope<Value> {
        let query = SearchQuery::of(ObjectKind::Database).with_query(Some(text.to_string()));
        let variant = format!("q={text}");
        self.cached_read(
            "search_databases",
            paths::DATABASES,
            &variant,
            self.api.search(&query),
        )
        .await
    }

    pub async fn get_database(&self, id: &str) -> Envelope<Value> {
        self.cached_read(
            "get_database",
            &paths::database(id),
            "",
            self.api.retrieve_database(id),
        )
        .await
    }

    pub async fn create_database(&self, body: &Value) -> Envelope<Value> {
        let result = self.api.create_database(body).await;
        self.mutation("create_database", result).await
    }

    pub async fn update_database(&self, id: &str, body: &Value) -> Envelope<Value> {
        let result = self.api.update_database(id, body).await;
        self.mutation("update_database", result).await
    }

    pub async fn archive_database(&self, id: &str) -> Envelope<Value> {
        let result = self.api.update_database(id, &json!({"archived": true})).await;
        self.mutation("archive_database", result).await
    }

    /// Rows of a database.
    pub async fn list_database_children(&self, id: &str, cursor: Option<&str>) -> Envelope<Value> {
        let mut body = json!({"page_size": 100});
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }
        self.cached_read(
            "list_database_children",
            &paths::database_children(id),
            cursor.unwrap_or_default(),
            self.api.query_database(id, &body),
        )
        .await
    }

    /// Copy a database's schema under the same parent page.
    pub async fn duplicate_database(&self, id: &str) -> Envelope<DuplicateResult> {
        let result = async {
            let database = self.api.retrieve_database(id).await?;
            let rows = self.api.query_database(id, &json!({"page_size": 100})).await?;
            let row_count = rows
                .get("results")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            let plan = duplicate::database_copy(&database, row_count)?;
            let created = self.api.create_database(&plan.body).await?;
            Ok::<_, NotionError>(plan.into_result(created).with_more_children(has_more(&rows)))
        }
        .await;

        match result {
            Ok(copy) => {
                self.revalidate("duplicate_database").await;
                Envelope::ok(copy)
            }
            Err(e) => duplicate_failed("database", e),
        }
    }

    // -----------------------------------------------------------------------
    // Pages
    // -----------------------------------------------------------------------

    pub async fn list_pages(&self) -> Envelope<Value> {
        let query = SearchQuery::of(ObjectKind::Page);
        self.cached_read("list_pages", paths::PAGES, "", self.api.search(&query))
            .await
    }

    pub async fn search_pages(&self, text: &str) -> Envelope<Value> {
        let query = SearchQuery::of(ObjectKind::Page).with_query(Some(text.to_string()));
        let variant = format!("q={text}");
        self.cached_read("search_pages", paths::PAGES, &variant, self.api.search(&query))
            .await
    }

    pub async fn get_page(&self, id: &str) -> Envelope<Value> {
        self.cached_read("get_page", &paths::page(id), "", self.api.retrieve_page(id))
            .await
    }

    pub async fn create_page(&self, body: &Value) -> Envelope<Value> {
        let result = self.api.create_page(body).await;
        self.mutation("create_page", result).await
    }

    /// Update page properties (or any other page field the body carries).
    pub async fn update_page(&self, id: &str, body: &Value) -> Envelope<Value> {
        let result = self.api.update_page(id, body).await;
        self.mutation("update_page", result).await
    }

    pub async fn archive_page(&self, id: &str) -> Envelope<Value> {
        let result = self.api.update_page(id, &json!({"archived": true})).await;
        self.mutation("archive_page", result).await
    }

    /// Content blocks of a page.
    pub async fn list_page_children(&self, id: &str, cursor: Option<&str>) -> Envelope<Value> {
        self.cached_read(
            "list_page_children",
            &paths::page_children(id),
            cursor.unwrap_or_default(),
            self.api.list_block_children(id, cursor),
        )
        .await
    }

    /// Copy a page, its properties and its top-level blocks.
    pub async fn duplicate_page(&self, id: &str) -> Envelope<DuplicateResult> {
        let result = async {
            let page = self.api.retrieve_page(id).await?;
            let children = self.api.list_block_children(id, None).await?;
            let blocks = children
                .get("results")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let plan = duplicate::page_copy(&page, &blocks)?;
            let created = self.api.create_page(&plan.body).await?;
            Ok::<_, NotionError>(plan.into_result(created).with_more_children(has_more(&children)))
        }
        .await;

        match result {
            Ok(copy) => {
                self.revalidate("duplicate_page").await;
                Envelope::ok(copy)
            }
            Err(e) => duplicate_failed("page", e),
        }
    }

    // -----------------------------------------------------------------------
    // Workspace
    // -----------------------------------------------------------------------

    /// Search across databases and pages.
    pub async fn search(&self, text: Option<&str>) -> Envelope<Value> {
        let query = SearchQuery::default().with_query(text.map(str::to_string));
        let variant = format!("search:{}", text.unwrap_or_default());
        self.cached_read("search", paths::WORKSPACE, &variant, self.api.search(&query))
            .await
    }

    /// Bot user plus shared databases, for the workspace landing page.
    pub async fn overview(&self) -> Envelope<WorkspaceOverview> {
        let bot = match self
            .cached_read("overview", paths::WORKSPACE, "me", self.api.me())
            .await
            .into_result()
        {
            Ok(bot) => bot,
            Err((kind, message)) => return Envelope::fail(kind, message),
        };
        self.list_databases()
            .await
            .map(|databases| WorkspaceOverview { bot, databases })
    }
}

/// `has_more` of a Notion list response.
fn has_more(list: &Value) -> bool {
    list.get("has_more").and_then(Value::as_bool).unwrap_or(false)
}

fn failed<T>(action: &'static str, e: NotionError) -> Envelope<T> {
    warn!(action, kind = ?e.kind(), error = %e, "notion action failed");
    Envelope::from(Err(e))
}

/// Same kind, with the failed step prefixed by what was being copied.
fn duplicate_failed<T>(what: &str, e: NotionError) -> Envelope<T> {
    warn!(what, kind = ?e.kind(), error = %e, "duplicate failed");
    Envelope::fail(e.kind(), format!("Failed to duplicate {what}: {e}"))
}
