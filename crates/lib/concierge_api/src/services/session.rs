//! Session service: issue, read and destroy the Notion session.
//!
//! Every failure while reading collapses to "no session". Issuing only ever
//! reports "invalid credential", whatever the upstream said.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use concierge_core::session::SessionError;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::AppState;
use crate::error::AppResult;
use crate::services::cookies::{SESSION_COOKIE, clear_session_cookie, session_cookie};

/// Verify `api_key` upstream and build the session cookie for it.
pub async fn issue_session(state: &AppState, api_key: &str) -> AppResult<Cookie<'static>> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(SessionError::InvalidCredential.into());
    }

    if let Err(e) = state.notion.connect(api_key).me().await {
        warn!(kind = ?e.kind(), "integration key verification failed");
        return Err(SessionError::InvalidCredential.into());
    }

    let sealed = state.sessions.seal(api_key)?;
    info!(expires_at = %sealed.expires_at, "session issued");
    Ok(session_cookie(&sealed.token, state.config.production))
}

/// The integration key of a valid session cookie, if any.
pub fn read_session(state: &AppState, jar: &CookieJar) -> Option<String> {
    let token = jar.get(SESSION_COOKIE)?.value();
    if token.is_empty() {
        return None;
    }
    state.sessions.open(token)
}

/// Clear the session cookie and drop the session's cached reads.
pub async fn destroy_session(state: &AppState, jar: CookieJar) -> CookieJar {
    if let Some(api_key) = read_session(state, &jar) {
        state.cache.write().await.clear_scope(&cache_scope(&api_key));
        info!("session destroyed");
    }
    jar.add(clear_session_cookie(state.config.production))
}

/// Cache scope for a session: SHA-256 of its key, so keys never sit in cache maps.
pub fn cache_scope(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    format!("{:x}", hasher.finalize())
}
