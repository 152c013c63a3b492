//! Cookie service: build and clear the httpOnly session cookie.

use axum_extra::extract::cookie::{Cookie, SameSite};
use concierge_core::session::SESSION_TTL_DAYS;
use time::Duration;

/// Cookie name for the session token.
pub const SESSION_COOKIE: &str = "notion-auth-token";

/// Build the session cookie (7 days). `secure` is set in production.
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Build an expired cookie to clear the session.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), String::new()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}
