//! Session store: the mutation API over [`AuthState`].
//!
//! SYSTEM CONTEXT
//! ==============
//! One `Session` exists per window and is provided through Leptos context.
//! It owns the auth gateway, the token store, and the shared state cell, so
//! pages and the OAuth reconciler never touch storage or the network
//! directly.
//!
//! LIFECYCLE
//! =========
//! `AuthState::pending()` is rendered during SSR and hydration. Once mounted,
//! [`Session::initialize`] restores the persisted snapshot, drops it if no
//! fresh access token backs it, refreshes an expired token, and finally
//! confirms the user with the backend.
//!
//! ERROR HANDLING
//! ==============
//! Async operations set `loading`, clear `error`, and on failure record the
//! message in `error` before returning it. `logout` never fails.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::RwSignal;

use crate::config::SESSION_SNAPSHOT_KEY;
use crate::net::api::{AuthGateway, GatewayError, HttpGateway};
use crate::net::types::{LoginRequest, RegisterRequest, TokenPair, User};
use crate::state::auth::{AuthState, AuthStateCell, PersistedSession};
use crate::util::storage::{KeyValueStore, LocalStorage, StorageError, load_json, save_json};
use crate::util::token::TokenStore;

const SESSION_EXPIRED: &str = "Session expired";

/// Failure of a session operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("could not store credentials: {0}")]
    Storage(#[from] StorageError),
    #[error("not signed in")]
    NotSignedIn,
}

/// The per-window session provided through context.
pub type AppSession = Session<HttpGateway, LocalStorage, RwSignal<AuthState>>;

/// Auth session bound to a gateway, a token store, and a state cell.
#[derive(Clone, Debug)]
pub struct Session<G, K, C> {
    gateway: G,
    tokens: TokenStore<K>,
    state: C,
}

impl<G, K, C> Session<G, K, C>
where
    G: AuthGateway,
    K: KeyValueStore,
    C: AuthStateCell,
{
    pub fn new(gateway: G, store: K, state: C) -> Self {
        Self { gateway, tokens: TokenStore::new(store), state }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn tokens(&self) -> &TokenStore<K> {
        &self.tokens
    }

    /// Current state snapshot (untracked).
    pub fn state(&self) -> AuthState {
        self.state.read()
    }

    /// Apply `f` and persist the resulting `{user, is_authenticated}` slice.
    fn commit(&self, f: impl FnOnce(&mut AuthState)) {
        self.state.write(f);
        let snapshot = self.state.read().snapshot();
        if let Err(e) = save_json(self.tokens.store(), SESSION_SNAPSHOT_KEY, &snapshot) {
            log::warn!("session: snapshot not persisted: {e}");
        }
    }

    pub fn set_user(&self, user: Option<User>) {
        self.commit(|s| s.set_user(user));
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.commit(|s| s.set_authenticated(authenticated));
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.write(|s| s.loading = loading);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.state.write(|s| s.error = error);
    }

    pub fn clear_error(&self) {
        self.state.write(AuthState::clear_error);
    }

    /// Restore the persisted snapshot, keeping `is_authenticated` only when a
    /// fresh access token is stored at `now`.
    pub fn rehydrate(&self, now: u64) {
        let snapshot: Option<PersistedSession> = load_json(self.tokens.store(), SESSION_SNAPSHOT_KEY);
        let fresh = self.tokens.has_fresh_access_token(now);
        let restored = AuthState::rehydrated(snapshot, fresh);
        if !restored.is_authenticated {
            log::debug!("session: no trusted snapshot to restore");
        }
        self.commit(|s| *s = restored);
    }

    /// Startup lifecycle. Never fails; an unusable session is cleared.
    pub async fn initialize(&self, now: u64) {
        self.rehydrate(now);
        if self.tokens.access_token().is_none() {
            return;
        }
        self.set_loading(true);
        if self.tokens.access_token_expired(now) {
            if let Err(e) = self.refresh_access_token().await {
                log::info!("session: stored token could not be refreshed: {e}");
                self.clear_local();
                return;
            }
        }
        if let Err(e) = self.get_current_user().await {
            log::info!("session: stored token rejected: {e}");
            self.clear_local();
        }
    }

    fn clear_local(&self) {
        self.tokens.clear();
        self.commit(AuthState::sign_out);
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure, or a storage failure if the tokens could
    /// not be saved. Either way the session ends signed out.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<(), SessionError> {
        self.state.write(AuthState::begin);
        let result = match self.gateway.login(credentials).await {
            Ok(response) => self.tokens.save(&response.tokens()).map(|()| response.user).map_err(SessionError::from),
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(user) => {
                log::info!("session: signed in as user {}", user.id);
                self.commit(|s| s.sign_in(user));
                Ok(())
            }
            Err(e) => {
                log::warn!("session: login failed: {e}");
                self.commit(|s| s.fail_signed_out(e.to_string()));
                Err(e)
            }
        }
    }

    /// Create an account. The new user is kept but not authenticated until
    /// they sign in.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure.
    pub async fn register(&self, data: &RegisterRequest) -> Result<User, SessionError> {
        self.state.write(AuthState::begin);
        match self.gateway.register(data).await {
            Ok(user) => {
                let kept = user.clone();
                self.commit(|s| {
                    s.user = Some(kept);
                    s.is_authenticated = false;
                    s.loading = false;
                });
                Ok(user)
            }
            Err(e) => {
                log::warn!("session: registration failed: {e}");
                self.commit(|s| s.fail_signed_out(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Sign out. Local credentials are dropped even when the backend call fails.
    pub async fn logout(&self) {
        self.state.write(AuthState::begin);
        if let Some(access_token) = self.tokens.access_token() {
            if let Err(e) = self.gateway.logout(&access_token).await {
                log::warn!("session: remote logout failed: {e}");
            }
        }
        self.clear_local();
    }

    async fn refresh_access_token(&self) -> Result<(), SessionError> {
        let refresh_token = self.tokens.refresh_token().ok_or(SessionError::NotSignedIn)?;
        let access_token = self.gateway.refresh(&refresh_token).await?;
        self.tokens.set_access_token(&access_token)?;
        Ok(())
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns why the refresh failed; tokens and session are cleared.
    pub async fn refresh_token(&self) -> Result<(), SessionError> {
        self.state.write(AuthState::begin);
        match self.refresh_access_token().await {
            Ok(()) => {
                self.set_loading(false);
                Ok(())
            }
            Err(e) => {
                log::warn!("session: refresh failed: {e}");
                self.tokens.clear();
                self.commit(|s| s.fail_signed_out(SESSION_EXPIRED));
                Err(e)
            }
        }
    }

    /// Confirm the stored access token with the backend and load its user.
    /// A rejected token is refreshed once before giving up.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure; the session ends signed out.
    pub async fn get_current_user(&self) -> Result<(), SessionError> {
        let Some(access_token) = self.tokens.access_token() else {
            return Ok(());
        };
        self.state.write(AuthState::begin);
        let result = match self.gateway.current_user(&access_token).await {
            Err(GatewayError::Unauthorized) => self.retry_after_refresh().await,
            other => other.map_err(SessionError::from),
        };
        match result {
            Ok(user) => {
                self.commit(|s| s.sign_in(user));
                Ok(())
            }
            Err(e) => {
                log::warn!("session: current user unavailable: {e}");
                let message = match &e {
                    SessionError::Gateway(GatewayError::Unauthorized) | SessionError::NotSignedIn => {
                        SESSION_EXPIRED.to_owned()
                    }
                    other => other.to_string(),
                };
                self.commit(|s| s.fail_signed_out(message));
                Err(e)
            }
        }
    }

    async fn retry_after_refresh(&self) -> Result<User, SessionError> {
        if let Err(e) = self.refresh_access_token().await {
            self.tokens.clear();
            return Err(e);
        }
        let access_token = self.tokens.access_token().ok_or(SessionError::NotSignedIn)?;
        Ok(self.gateway.current_user(&access_token).await?)
    }

    /// # Errors
    ///
    /// Returns [`SessionError::NotSignedIn`] without a token, else the
    /// gateway failure.
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<(), SessionError> {
        self.state.write(AuthState::begin);
        let result = match self.tokens.access_token() {
            Some(token) => self
                .gateway
                .change_password(&token, current_password, new_password)
                .await
                .map_err(SessionError::from),
            None => Err(SessionError::NotSignedIn),
        };
        self.settle(result)
    }

    /// # Errors
    ///
    /// Returns the gateway failure.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), SessionError> {
        self.state.write(AuthState::begin);
        let result = self.gateway.request_password_reset(email).await.map_err(SessionError::from);
        self.settle(result)
    }

    /// # Errors
    ///
    /// Returns the gateway failure.
    pub async fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<(), SessionError> {
        self.state.write(AuthState::begin);
        let result = self
            .gateway
            .reset_password(reset_token, new_password)
            .await
            .map_err(SessionError::from);
        self.settle(result)
    }

    /// Finish an operation that does not change who is signed in.
    fn settle(&self, result: Result<(), SessionError>) -> Result<(), SessionError> {
        match &result {
            Ok(()) => self.set_loading(false),
            Err(e) => self.state.write(|s| s.fail(e.to_string())),
        }
        result
    }

    /// Adopt credentials obtained through OAuth (code exchange or a popup
    /// message).
    ///
    /// # Errors
    ///
    /// Returns a storage failure; the session is left untouched.
    pub fn accept_oauth_success(&self, tokens: &TokenPair, user: User) -> Result<(), SessionError> {
        self.tokens.save(tokens)?;
        log::info!("session: signed in through OAuth as user {}", user.id);
        self.commit(|s| s.sign_in(user));
        Ok(())
    }
}
