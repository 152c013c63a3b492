//! Session tokens wrapping the upstream integration key.
//!
//! A session is a signed, time-boxed token carrying exactly one secret.
//! Callers only see two outcomes when reading: the secret, or nothing.
//! Expired, tampered and foreign tokens are deliberately indistinguishable.

pub mod secret;
pub mod token;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

pub use secret::resolve_session_secret;
pub use token::JwtSessionCodec;

/// Session lifetime: 7 days.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Session lifetime as a [`Duration`].
pub fn session_ttl() -> Duration {
    Duration::days(SESSION_TTL_DAYS)
}

/// Session errors. Only raised when issuing; reading never fails.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid credential")]
    InvalidCredential,

    #[error("Token error: {0}")]
    Token(String),

    #[error("Encryption error: {0}")]
    Encryption(String),
}

/// A freshly sealed session token.
#[derive(Debug, Clone)]
pub struct SealedSession {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens.
///
/// Implementations own the algorithm and the key material; call sites only
/// hand over the secret to wrap and get it back from a valid token.
pub trait SessionCodec: Send + Sync {
    /// Wrap `secret` in a new token valid for [`SESSION_TTL_DAYS`].
    fn seal(&self, secret: &str) -> Result<SealedSession, SessionError>;

    /// Return the wrapped secret if the token is authentic and unexpired.
    fn open(&self, token: &str) -> Option<String>;
}
