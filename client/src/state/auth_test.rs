use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn user(id: i64) -> User {
    serde_json::from_value(serde_json::json!({ "id": id, "email": "u@example.org" })).unwrap()
}

// =============================================================
// AuthState defaults
// =============================================================

#[test]
fn auth_state_default_no_user() {
    let state = AuthState::default();
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[test]
fn pending_state_is_loading() {
    let state = AuthState::pending();
    assert!(state.loading);
    assert!(!state.should_redirect_unauth());
    assert!(!state.should_redirect_guest());
}

// =============================================================
// Rehydration
// =============================================================

#[test]
fn rehydrate_trusts_snapshot_with_fresh_token() {
    let snapshot = PersistedSession { user: Some(user(1)), is_authenticated: true };
    let state = AuthState::rehydrated(Some(snapshot), true);
    assert!(state.is_authenticated);
    assert_eq!(state.user.map(|u| u.id), Some(1));
}

#[test]
fn rehydrate_corrects_stale_authenticated_flag() {
    let snapshot = PersistedSession { user: Some(user(1)), is_authenticated: true };
    let state = AuthState::rehydrated(Some(snapshot), false);
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
}

#[test]
fn rehydrate_rejects_authenticated_flag_without_user() {
    let snapshot = PersistedSession { user: None, is_authenticated: true };
    let state = AuthState::rehydrated(Some(snapshot), true);
    assert!(!state.is_authenticated);
}

#[test]
fn rehydrate_without_snapshot_is_signed_out() {
    assert_eq!(AuthState::rehydrated(None, true), AuthState::default());
}

#[test]
fn snapshot_uses_camel_case_keys_and_omits_tokens() {
    let mut state = AuthState::default();
    state.sign_in(user(3));
    let value = serde_json::to_value(state.snapshot()).unwrap();
    assert_eq!(value["isAuthenticated"], true);
    assert_eq!(value["user"]["id"], 3);
    assert_eq!(value.as_object().map(serde_json::Map::len), Some(2));
}

// =============================================================
// Mutations
// =============================================================

#[test]
fn set_authenticated_requires_user() {
    let mut state = AuthState::default();
    state.set_authenticated(true);
    assert!(!state.is_authenticated);
    state.set_user(Some(user(1)));
    state.set_authenticated(true);
    assert!(state.is_authenticated);
}

#[test]
fn clearing_user_drops_authentication() {
    let mut state = AuthState::default();
    state.sign_in(user(1));
    state.set_user(None);
    assert!(!state.is_authenticated);
}

#[test]
fn begin_resets_error_and_sets_loading() {
    let mut state = AuthState { error: Some("old".to_owned()), ..AuthState::default() };
    state.begin();
    assert!(state.loading);
    assert!(state.error.is_none());
}

#[test]
fn fail_signed_out_records_error() {
    let mut state = AuthState::default();
    state.sign_in(user(1));
    state.begin();
    state.fail_signed_out("Login failed");
    assert!(state.user.is_none());
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Login failed"));
}

#[test]
fn fail_keeps_identity() {
    let mut state = AuthState::default();
    state.sign_in(user(1));
    state.begin();
    state.fail("Password change failed");
    assert!(state.is_authenticated);
    assert!(!state.loading);
}

#[test]
fn redirect_predicates_follow_loading_and_auth() {
    let mut state = AuthState::default();
    assert!(state.should_redirect_unauth());
    state.sign_in(user(1));
    assert!(!state.should_redirect_unauth());
    assert!(state.should_redirect_guest());
}

#[test]
fn shared_cell_reads_latest_write() {
    let cell = Rc::new(RefCell::new(AuthState::default()));
    cell.write(|s| s.sign_in(user(9)));
    assert_eq!(cell.read().user.map(|u| u.id), Some(9));
}
