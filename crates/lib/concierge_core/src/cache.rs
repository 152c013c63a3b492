//! In-memory cache of proxy reads, keyed by session scope and workspace path.
//!
//! Mutations revalidate paths: every variant cached under an invalidated
//! path is dropped, so the next read goes upstream.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Default TTL for cached reads: 30 seconds.
pub const DEFAULT_TTL_MS: i64 = 30_000;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: DateTime<Utc>,
}

/// Cache keyed by `(scope, path, variant)`.
///
/// `scope` isolates sessions from each other, `path` is the workspace path
/// the read belongs to and `variant` distinguishes query parameters.
#[derive(Debug)]
pub struct ResponseCache {
    entries: HashMap<(String, String), HashMap<String, CacheEntry>>,
    /// TTL for new entries (milliseconds).
    pub ttl_ms: i64,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            ttl_ms: DEFAULT_TTL_MS,
        }
    }

    /// Get a cached value if present and not expired.
    pub fn get(&self, scope: &str, path: &str, variant: &str) -> Option<Value> {
        let now = Utc::now();
        self.entries
            .get(&(scope.to_string(), path.to_string()))
            .and_then(|variants| variants.get(variant))
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value.clone())
    }

    pub fn set(&mut self, scope: &str, path: &str, variant: &str, value: Value) {
        let expires_at = Utc::now() + Duration::milliseconds(self.ttl_ms);
        self.entries
            .entry((scope.to_string(), path.to_string()))
            .or_default()
            .insert(variant.to_string(), CacheEntry { value, expires_at });
    }

    /// Drop every variant cached for `scope` at or below each of `paths`.
    pub fn revalidate<S: AsRef<str>>(&mut self, scope: &str, paths: &[S]) {
        self.entries.retain(|(s, cached), _| {
            s != scope || !paths.iter().any(|p| is_at_or_below(cached, p.as_ref()))
        });
    }

    /// Drop everything cached for `scope`.
    pub fn clear_scope(&mut self, scope: &str) {
        self.entries.retain(|(s, _), _| s != scope);
    }

    /// Drop expired entries.
    pub fn purge_expired(&mut self) {
        let now = Utc::now();
        for variants in self.entries.values_mut() {
            variants.retain(|_, entry| now < entry.expires_at);
        }
        self.entries.retain(|_, variants| !variants.is_empty());
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `path` equals `prefix` or lies below it on a segment boundary.
fn is_at_or_below(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
