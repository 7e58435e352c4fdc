//! Access/refresh token persistence and freshness checks.
//!
//! Tokens live under the raw `access_token` / `refresh_token` keys. Freshness
//! of a JWT access token is judged from its unverified `exp` claim minus the
//! expiry buffer; opaque tokens are fresh while present.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::config::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRY_BUFFER_SECS};
use crate::net::types::TokenPair;
use crate::util::storage::{KeyValueStore, StorageError};

/// Current wall-clock time in Unix seconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn now_unix_secs() -> u64 {
    #[cfg(feature = "hydrate")]
    {
        (js_sys::Date::now() / 1000.0) as u64
    }
    #[cfg(not(feature = "hydrate"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs())
    }
}

/// `exp` claim of a JWT, if `token` is one.
pub fn jwt_expiry(token: &str) -> Option<u64> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    let exp = claims.get("exp")?;
    exp.as_u64().or_else(|| exp.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
}

/// Whether `token` can still be presented at `now`.
pub fn is_token_fresh(token: &str, now: u64) -> bool {
    if token.trim().is_empty() {
        return false;
    }
    match jwt_expiry(token) {
        Some(exp) => exp.saturating_sub(TOKEN_EXPIRY_BUFFER_SECS) > now,
        None => true,
    }
}

/// Token pair persistence over a [`KeyValueStore`].
#[derive(Clone, Debug, Default)]
pub struct TokenStore<K> {
    store: K,
}

impl<K: KeyValueStore> TokenStore<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// Underlying key/value store.
    pub fn store(&self) -> &K {
        &self.store
    }

    /// Persist both tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails; a half-written pair is removed.
    pub fn save(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        let written = self
            .store
            .set(ACCESS_TOKEN_KEY, &tokens.access_token)
            .and_then(|()| self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token));
        if written.is_err() {
            self.clear();
        }
        written
    }

    /// Replace only the access token (after a refresh).
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_access_token(&self, access_token: &str) -> Result<(), StorageError> {
        self.store.set(ACCESS_TOKEN_KEY, access_token)
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Both tokens, when both are stored.
    pub fn tokens(&self) -> Option<TokenPair> {
        Some(TokenPair { access_token: self.access_token()?, refresh_token: self.refresh_token()? })
    }

    pub fn clear(&self) {
        self.store.remove(ACCESS_TOKEN_KEY);
        self.store.remove(REFRESH_TOKEN_KEY);
    }

    /// A usable access token is stored at `now`.
    pub fn has_fresh_access_token(&self, now: u64) -> bool {
        self.access_token().is_some_and(|t| is_token_fresh(&t, now))
    }

    /// An access token is stored but already past its expiry buffer.
    pub fn access_token_expired(&self, now: u64) -> bool {
        self.access_token().is_some_and(|t| !is_token_fresh(&t, now))
    }
}
