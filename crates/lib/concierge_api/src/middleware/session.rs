//! Session gate: protects workspace pages and the Notion proxy API.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::AppState;
use crate::error::AppError;
use crate::services::session::read_session;

/// Page prefixes; unauthenticated requests are redirected to setup.
pub const PROTECTED_PAGE_PREFIXES: &[&str] = &["/workspace"];

/// API prefixes; unauthenticated requests get 401 JSON.
pub const PROTECTED_API_PREFIXES: &[&str] = &["/api/notion"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    Public,
    Page,
    Api,
}

fn has_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Which protection applies to `path`.
pub fn protection_for(path: &str) -> Protection {
    if PROTECTED_API_PREFIXES.iter().any(|p| has_prefix(path, p)) {
        Protection::Api
    } else if PROTECTED_PAGE_PREFIXES.iter().any(|p| has_prefix(path, p)) {
        Protection::Page
    } else {
        Protection::Public
    }
}

/// Authenticated session, inserted into request extensions by [`session_gate`].
#[derive(Clone)]
pub struct WorkspaceSession {
    api_key: String,
}

impl WorkspaceSession {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for WorkspaceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceSession").finish_non_exhaustive()
    }
}

/// Axum middleware: for protected prefixes, reads the session cookie and
/// injects [`WorkspaceSession`], or redirects / rejects when there is none.
pub async fn session_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let protection = protection_for(request.uri().path());
    if protection == Protection::Public {
        return next.run(request).await;
    }

    let jar = CookieJar::from_headers(request.headers());
    match read_session(&state, &jar) {
        Some(api_key) => {
            request
                .extensions_mut()
                .insert(WorkspaceSession::new(api_key));
            next.run(request).await
        }
        None if protection == Protection::Page => {
            Redirect::temporary(&state.config.setup_path).into_response()
        }
        None => AppError::Unauthorized("Unauthorized".into()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_match_whole_segments() {
        assert_eq!(protection_for("/workspace"), Protection::Page);
        assert_eq!(protection_for("/workspace/databases/abc"), Protection::Page);
        assert_eq!(protection_for("/workspaces"), Protection::Public);
        assert_eq!(protection_for("/api/notion/pages"), Protection::Api);
        assert_eq!(protection_for("/api/notionx"), Protection::Public);
        assert_eq!(protection_for("/api/inquiry"), Protection::Public);
        assert_eq!(protection_for("/"), Protection::Public);
    }

    #[test]
    fn debug_does_not_leak_key() {
        let session = WorkspaceSession::new("secret_abc123");
        assert!(!format!("{session:?}").contains("secret_abc123"));
    }
}
