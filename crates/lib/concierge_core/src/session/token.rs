//! HS256 JWT session codec.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::secret::{decrypt, encrypt};
use super::{SealedSession, SessionCodec, SessionError, session_ttl};
use crate::clock::{Clock, SystemClock};

/// Fixed subject for every session token.
const SESSION_SUBJECT: &str = "notion-session";

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    /// Encrypted integration key.
    key: String,
    iat: i64,
    exp: i64,
}

/// Session codec signing with HS256 and encrypting the key with AES-256-GCM.
///
/// Expiry is checked against the injected [`Clock`], not the JWT library's
/// own wall-clock validation.
pub struct JwtSessionCodec {
    secret: String,
    clock: Arc<dyn Clock>,
}

impl JwtSessionCodec {
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret: secret.into(),
            clock,
        }
    }
}

impl std::fmt::Debug for JwtSessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionCodec").finish_non_exhaustive()
    }
}

impl SessionCodec for JwtSessionCodec {
    fn seal(&self, secret: &str) -> Result<SealedSession, SessionError> {
        let issued_at = self.clock.now();
        let expires_at = issued_at + session_ttl();
        let claims = SessionClaims {
            sub: SESSION_SUBJECT.to_string(),
            key: encrypt(secret, &self.secret)?,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| SessionError::Token(format!("jwt encode: {e}")))?;

        Ok(SealedSession {
            token,
            issued_at,
            expires_at,
        })
    }

    fn open(&self, token: &str) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = match decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!(error = %e, "rejecting session token");
                return None;
            }
        };

        if claims.sub != SESSION_SUBJECT {
            return None;
        }
        if claims.exp <= self.clock.now().timestamp() {
            debug!("rejecting expired session token");
            return None;
        }

        decrypt(&claims.key, &self.secret).ok()
    }
}
