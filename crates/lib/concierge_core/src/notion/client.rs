//! reqwest-backed Notion REST client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{
    NOTION_VERSION, NotionApi, NotionConnector, NotionError,
    NotionResult, SearchQuery,
};

/// Per-request timeout for upstream calls.
const REQUEST_TIMEOUT_SECS: u64 = 20;

/// Shape of a Notion error body.
#[derive(Deserialize)]
struct NotionErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Creates [`HttpNotionClient`]s that share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpNotionConnector {
    http: Client,
    base_url: String,
}

impl HttpNotionConnector {
    pub fn new(base_url: impl Into<String>) -> NotionResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> NotionResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotionError::Unknown(format!("HTTP client init failed: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl NotionConnector for HttpNotionConnector {
    fn connect(&self, api_key: &str) -> Arc<dyn NotionApi> {
        Arc::new(HttpNotionClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            api_key: api_key.to_string(),
        })
    }
}

/// Notion client bound to one integration key.
#[derive(Clone)]
pub struct HttpNotionClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for HttpNotionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpNotionClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpNotionClient {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn send(&self, builder: RequestBuilder) -> NotionResult<Value> {
        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                NotionError::UpstreamUnavailable(format!("request failed: {e}"))
            } else {
                NotionError::Unknown(format!("request failed: {e}"))
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<NotionErrorBody>(&body) {
                Ok(NotionErrorBody {
                    message: Some(message),
                    ..
                }) => message,
                Ok(NotionErrorBody {
                    code: Some(code), ..
                }) => code,
                _ if body.is_empty() => status.to_string(),
                _ => body,
            };
            debug!(status = status.as_u16(), %message, "notion request rejected");
            return Err(NotionError::from_status(status.as_u16(), message));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| NotionError::Unknown(format!("response parse error: {e}")))
    }

    async fn get(&self, path: &str) -> NotionResult<Value> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn post(&self, path: &str, body: &Value) -> NotionResult<Value> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn patch(&self, path: &str, body: &Value) -> NotionResult<Value> {
        self.send(self.request(Method::PATCH, path).json(body)).await
    }
}

/// Reject ids that would escape the intended path segment.
fn segment(id: &str) -> NotionResult<&str> {
    let id = id.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(NotionError::InvalidInput(format!("invalid Notion id: {id:?}")));
    }
    Ok(id)
}

#[async_trait]
impl NotionApi for HttpNotionClient {
    async fn me(&self) -> NotionResult<Value> {
        self.get("/users/me").await
    }

    async fn search(&self, query: &SearchQuery) -> NotionResult<Value> {
        let body = serde_json::to_value(query)
            .map_err(|e| NotionError::InvalidInput(format!("search query: {e}")))?;
        self.post("/search", &body).await
    }

    async fn retrieve_database(&self, id: &str) -> NotionResult<Value> {
        self.get(&format!("/databases/{}", segment(id)?)).await
    }

    async fn create_database(&self, body: &Value) -> NotionResult<Value> {
        self.post("/databases", body).await
    }

    async fn update_database(&self, id: &str, body: &Value) -> NotionResult<Value> {
        self.patch(&format!("/databases/{}", segment(id)?), body)
            .await
    }

    async fn query_database(&self, id: &str, body: &Value) -> NotionResult<Value> {
        self.post(&format!("/databases/{}/query", segment(id)?), body)
            .await
    }

    async fn retrieve_page(&self, id: &str) -> NotionResult<Value> {
        self.get(&format!("/pages/{}", segment(id)?)).await
    }

    async fn create_page(&self, body: &Value) -> NotionResult<Value> {
        self.post("/pages", body).await
    }

    async fn update_page(&self, id: &str, body: &Value) -> NotionResult<Value> {
        self.patch(&format!("/pages/{}", segment(id)?), body).await
    }

    async fn list_block_children(
        &self,
        id: &str,
        start_cursor: Option<&str>,
    ) -> NotionResult<Value> {
        let mut builder = self.request(
            Method::GET,
            &format!("/blocks/{}/children", segment(id)?),
        );
        builder = builder.query(&[("page_size", "100")]);
        if let Some(cursor) = start_cursor {
            builder = builder.query(&[("start_cursor", cursor)]);
        }
        self.send(builder).await
    }
}
