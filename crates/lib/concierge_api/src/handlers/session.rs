//! Session request handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{CreateSessionRequest, SessionStatusResponse, SuccessResponse};
use crate::services::session;

/// `POST /api/auth/session`: verify an integration key and set the session cookie.
///
/// A body without a usable key is treated like an invalid key.
pub async fn create_session_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> AppResult<(CookieJar, Json<SuccessResponse>)> {
    let api_key = serde_json::from_slice::<CreateSessionRequest>(&body)
        .map(|req| req.api_key)
        .unwrap_or_default();
    let cookie = session::issue_session(&state, &api_key).await?;
    Ok((jar.add(cookie), Json(SuccessResponse { success: true })))
}

/// `GET /api/auth/session`: whether the request carries a valid session.
pub async fn session_status_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Json<SessionStatusResponse> {
    Json(SessionStatusResponse {
        authenticated: session::read_session(&state, &jar).is_some(),
    })
}

/// `DELETE /api/auth/session` and `POST /api/auth/logout`.
pub async fn delete_session_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    let jar = session::destroy_session(&state, jar).await;
    (jar, Json(SuccessResponse { success: true }))
}
