//! Signing-secret resolution and AES-256-GCM sealing of the wrapped key.
//!
//! The integration key travels inside the session cookie, so it is encrypted
//! before being signed. Output is base64 `nonce || ciphertext || tag`.

use std::path::PathBuf;

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::distr::Alphanumeric;
use rand::{Rng, RngCore, rng};
use sha2::{Digest, Sha256};
use tracing::info;

use super::SessionError;

/// Nonce size for AES-256-GCM (12 bytes).
const NONCE_SIZE: usize = 12;
/// AES-256 key size (32 bytes).
const KEY_SIZE: usize = 32;
/// GCM tag size (16 bytes).
const TAG_SIZE: usize = 16;

/// Derive a 32-byte key from a passphrase using SHA-256.
fn derive_key(passphrase: &str) -> [u8; KEY_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(b"concierge-session:");
    hasher.update(passphrase.as_bytes());
    let result = hasher.finalize();
    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&result);
    key
}

/// Encrypt `plaintext` under a key derived from `passphrase`.
pub fn encrypt(plaintext: &str, passphrase: &str) -> Result<String, SessionError> {
    let key_bytes = derive_key(passphrase);
    let cipher = Aes256Gcm::new_from_slice(&key_bytes)
        .map_err(|e| SessionError::Encryption(format!("key init failed: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| SessionError::Encryption(format!("encryption failed: {e}")))?;

    let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    combined.extend_from_slice(&nonce_bytes);
    combined.extend_from_slice(&ciphertext);
    Ok(URL_SAFE_NO_PAD.encode(&combined))
}

/// Reverse of [`encrypt`].
pub fn decrypt(encoded: &str, passphrase: &str) -> Result<String, SessionError> {
    let combined = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| SessionError::Encryption(format!("base64 decode failed: {e}")))?;

    if combined.len() < NONCE_SIZE + TAG_SIZE {
        return Err(SessionError::Encryption("ciphertext too short".into()));
    }

    let key_bytes = derive_key(passphrase);
    let cipher = Aes256Gcm::new_from_slice(&key_bytes)
        .map_err(|e| SessionError::Encryption(format!("key init failed: {e}")))?;

    let nonce = Nonce::from_slice(&combined[..NONCE_SIZE]);
    let plaintext = cipher
        .decrypt(nonce, &combined[NONCE_SIZE..])
        .map_err(|e| SessionError::Encryption(format!("decryption failed: {e}")))?;

    String::from_utf8(plaintext)
        .map_err(|e| SessionError::Encryption(format!("utf-8 decode failed: {e}")))
}

/// Resolve the session signing secret: `SESSION_SECRET` → `JWT_SECRET` → persisted file.
pub fn resolve_session_secret() -> String {
    for var in ["SESSION_SECRET", "JWT_SECRET"] {
        if let Ok(secret) = std::env::var(var)
            && !secret.is_empty()
        {
            return secret;
        }
    }

    let secret_path = session_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new session secret");
    secret
}

fn session_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("concierge")
        .join("session-secret")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrypts_what_it_encrypts() {
        let sealed = encrypt("secret_abc123", "signing-key").unwrap();
        assert_ne!(sealed, "secret_abc123");
        assert_eq!(decrypt(&sealed, "signing-key").unwrap(), "secret_abc123");
    }

    #[test]
    fn wrong_passphrase_fails() {
        let sealed = encrypt("secret_abc123", "signing-key").unwrap();
        assert!(decrypt(&sealed, "other-key").is_err());
    }

    #[test]
    fn nonces_differ_between_calls() {
        let a = encrypt("same", "k").unwrap();
        let b = encrypt("same", "k").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn truncated_input_is_rejected() {
        assert!(decrypt("AAAA", "k").is_err());
        assert!(decrypt("not base64 !!", "k").is_err());
    }
}
