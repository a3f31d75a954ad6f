//! Token Cache
//!
//! In-memory access-token cache keyed by refresh token.
//!
//! Keys are SHA-256 digests of the refresh token, so the cache never holds
//! the long-lived credential itself. Entries expire lazily: `get` refuses to
//! return a stale entry and `sweep` drops every stale entry at once.

use base64::Engine;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A cached access token with its absolute expiry.
#[derive(Clone)]
pub struct CachedToken {
    pub access_token: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            expires_at,
        }
    }

    /// Fresh while `now < expires_at`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Process-wide token cache. Share it between clients with `Arc<TokenCache>`.
#[derive(Default)]
pub struct TokenCache {
    entries: Mutex<HashMap<String, CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CachedToken>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cache_key(refresh_token: &str) -> String {
        let digest = Sha256::digest(refresh_token.as_bytes());
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest)
    }

    /// Fresh entry for the refresh token, if any.
    pub fn get(&self, refresh_token: &SecretString) -> Option<CachedToken> {
        self.get_at(refresh_token, Utc::now())
    }

    /// Like [`TokenCache::get`], evaluated at `now`. A stale entry is removed.
    pub fn get_at(&self, refresh_token: &SecretString, now: DateTime<Utc>) -> Option<CachedToken> {
        let key = Self::cache_key(refresh_token.expose_secret());
        let mut entries = self.entries();

        match entries.get(&key) {
            Some(entry) if entry.is_fresh_at(now) => Some(entry.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store or replace the entry for the refresh token.
    pub fn put(
        &self,
        refresh_token: &SecretString,
        access_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) {
        let key = Self::cache_key(refresh_token.expose_secret());
        self.entries()
            .insert(key, CachedToken::new(access_token, expires_at));
    }

    /// Remove every entry whose expiry has passed. Returns the number removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    /// Like [`TokenCache::sweep`], evaluated at `now`.
    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh_at(now));
        before - entries.len()
    }

    pub fn remove(&self, refresh_token: &SecretString) -> bool {
        let key = Self::cache_key(refresh_token.expose_secret());
        self.entries().remove(&key).is_some()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("entries", &self.len())
            .finish()
    }
}
