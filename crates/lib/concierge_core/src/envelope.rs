//! Uniform `{success, data, error}` response wrapper for proxy operations.
//!
//! A failed envelope also carries an [`ErrorKind`] so callers can branch
//! without matching on the message text.

use serde::{Deserialize, Serialize};

use crate::notion::NotionError;

/// Message used when a failure carries no text of its own.
const FALLBACK_ERROR: &str = "Unknown error";

/// Closed set of failure categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UpstreamUnavailable,
    NotFound,
    InvalidInput,
    Unauthorized,
    Unknown,
}

/// `{success, data, error}`: exactly one of `data` / `error` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    pub fn fail(kind: ErrorKind, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = FALLBACK_ERROR.to_string();
        }
        Self {
            success: false,
            data: None,
            error: Some(message),
            error_kind: Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            error_kind: self.error_kind,
        }
    }

    /// Converts back into a `Result`, pairing the kind with the message on failure.
    pub fn into_result(self) -> Result<T, (ErrorKind, String)> {
        match self.data {
            Some(data) if self.success => Ok(data),
            _ => Err((
                self.error_kind.unwrap_or(ErrorKind::Unknown),
                self.error.unwrap_or_else(|| FALLBACK_ERROR.to_string()),
            )),
        }
    }
}

impl<T> From<Result<T, NotionError>> for Envelope<T> {
    fn from(result: Result<T, NotionError>) -> Self {
        match result {
            Ok(data) => Envelope::ok(data),
            Err(e) => Envelope::fail(e.kind(), e.to_string()),
        }
    }
}
