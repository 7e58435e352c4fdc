//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards, the dashboard shell, and the OAuth callback page to
//! coordinate login redirects and identity-dependent rendering.
//!
//! INVARIANTS
//! ==========
//! `is_authenticated` is only ever set while a user is present. A snapshot
//! restored from storage is trusted only when a fresh access token backs it.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::net::types::User;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

/// Slice of [`AuthState`] that survives reloads. Tokens are stored separately.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

impl AuthState {
    /// State shown before the browser has restored the session.
    pub fn pending() -> Self {
        Self { loading: true, ..Self::default() }
    }

    /// Rebuild state from a stored snapshot, trusting `is_authenticated` only
    /// when `token_fresh` confirms it.
    pub fn rehydrated(snapshot: Option<PersistedSession>, token_fresh: bool) -> Self {
        match snapshot {
            Some(PersistedSession { user: Some(user), is_authenticated: true }) if token_fresh => Self {
                user: Some(user),
                is_authenticated: true,
                loading: false,
                error: None,
            },
            _ => Self::default(),
        }
    }

    pub fn snapshot(&self) -> PersistedSession {
        PersistedSession { user: self.user.clone(), is_authenticated: self.is_authenticated }
    }

    pub fn set_user(&mut self, user: Option<User>) {
        if user.is_none() {
            self.is_authenticated = false;
        }
        self.user = user;
    }

    /// Mark the session authenticated. Ignored while no user is set.
    pub fn set_authenticated(&mut self, authenticated: bool) {
        if authenticated && self.user.is_none() {
            log::warn!("refusing to mark session authenticated without a user");
            return;
        }
        self.is_authenticated = authenticated;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Start of an async operation.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn sign_in(&mut self, user: User) {
        self.user = Some(user);
        self.is_authenticated = true;
        self.loading = false;
        self.error = None;
    }

    pub fn sign_out(&mut self) {
        self.user = None;
        self.is_authenticated = false;
        self.loading = false;
        self.error = None;
    }

    /// End of a failed async operation that leaves the user signed out.
    pub fn fail_signed_out(&mut self, message: impl Into<String>) {
        self.sign_out();
        self.error = Some(message.into());
    }

    /// End of a failed async operation that keeps the current identity.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Protected routes should bounce to login.
    pub fn should_redirect_unauth(&self) -> bool {
        !self.loading && !self.is_authenticated
    }

    /// Guest-only routes should bounce to the dashboard.
    pub fn should_redirect_guest(&self) -> bool {
        !self.loading && self.is_authenticated
    }
}

/// Holder of the shared [`AuthState`]: a Leptos signal in the app, a plain
/// cell in tests.
pub trait AuthStateCell {
    fn read(&self) -> AuthState;
    fn write(&self, f: impl FnOnce(&mut AuthState));
}

impl AuthStateCell for RwSignal<AuthState> {
    fn read(&self) -> AuthState {
        self.get_untracked()
    }

    fn write(&self, f: impl FnOnce(&mut AuthState)) {
        self.update(f);
    }
}

#[cfg(test)]
impl AuthStateCell for std::rc::Rc<std::cell::RefCell<AuthState>> {
    fn read(&self) -> AuthState {
        self.borrow().clone()
    }

    fn write(&self, f: impl FnOnce(&mut AuthState)) {
        f(&mut self.borrow_mut());
    }
}
