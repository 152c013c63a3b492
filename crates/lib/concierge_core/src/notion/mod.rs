//! Notion API access.
//!
//! Databases, pages and blocks are passed through as raw JSON; this module
//! only owns transport, error classification and the duplicate helpers.

pub mod client;
pub mod duplicate;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::envelope::ErrorKind;

pub use client::{HttpNotionClient, HttpNotionConnector};

/// Notion API version header value.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Default Notion REST base URL.
pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";

pub type NotionResult<T> = Result<T, NotionError>;

/// Upstream failures, classified so callers can branch on the kind.
#[derive(Debug, Error)]
pub enum NotionError {
    #[error("Notion is unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Notion request failed: {0}")]
    Unknown(String),
}

impl NotionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotionError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            NotionError::NotFound(_) => ErrorKind::NotFound,
            NotionError::InvalidInput(_) => ErrorKind::InvalidInput,
            NotionError::Unauthorized(_) => ErrorKind::Unauthorized,
            NotionError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Classify a non-success HTTP response. `message` is the upstream's
    /// own explanation, kept as context.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 | 409 | 422 => NotionError::InvalidInput(message),
            401 | 403 => NotionError::Unauthorized(message),
            404 => NotionError::NotFound(message),
            429 | 500..=599 => NotionError::UpstreamUnavailable(message),
            _ => NotionError::Unknown(format!("HTTP {status}: {message}")),
        }
    }
}

/// Object type filter for `/search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Database,
    Page,
}

/// Parameters for `POST /search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_filter")]
    pub filter: Option<ObjectKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl SearchQuery {
    pub fn of(kind: ObjectKind) -> Self {
        Self {
            filter: Some(kind),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query.filter(|q| !q.trim().is_empty());
        self
    }
}

fn serialize_filter<S>(kind: &Option<ObjectKind>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match kind {
        Some(kind) => {
            #[derive(Serialize)]
            struct Filter {
                property: &'static str,
                value: ObjectKind,
            }
            Filter {
                property: "object",
                value: *kind,
            }
            .serialize(serializer)
        }
        None => serializer.serialize_none(),
    }
}

/// Operations used against one Notion integration.
#[async_trait]
pub trait NotionApi: Send + Sync {
    /// `GET /users/me`: the bot user behind the key.
    async fn me(&self) -> NotionResult<Value>;

    async fn search(&self, query: &SearchQuery) -> NotionResult<Value>;

    async fn retrieve_database(&self, id: &str) -> NotionResult<Value>;
    async fn create_database(&self, body: &Value) -> NotionResult<Value>;
    async fn update_database(&self, id: &str, body: &Value) -> NotionResult<Value>;
    async fn query_database(&self, id: &str, body: &Value) -> NotionResult<Value>;

    async fn retrieve_page(&self, id: &str) -> NotionResult<Value>;
    async fn create_page(&self, body: &Value) -> NotionResult<Value>;
    async fn update_page(&self, id: &str, body: &Value) -> NotionResult<Value>;

    async fn list_block_children(&self, id: &str, start_cursor: Option<&str>)
    -> NotionResult<Value>;
}

/// Builds a [`NotionApi`] bound to one integration key.
pub trait NotionConnector: Send + Sync {
    fn connect(&self, api_key: &str) -> Arc<dyn NotionApi>;
}
