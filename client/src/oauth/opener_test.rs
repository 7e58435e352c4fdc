use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;

use super::*;
use crate::net::fake_gateway::{FakeGateway, user};
use crate::state::auth::AuthState;
use crate::util::memory_store::MemoryStore;

const ORIGIN: &str = "https://ecowatch.example";

type TestSession = Session<FakeGateway, MemoryStore, Rc<RefCell<AuthState>>>;

fn session() -> (TestSession, FakeGateway) {
    let gateway = FakeGateway::new();
    let session = Session::new(gateway.clone(), MemoryStore::new(), Rc::new(RefCell::new(AuthState::default())));
    (session, gateway)
}

#[test]
fn accepts_only_same_origin_messages() {
    let data = r#"{"type":"OAUTH_ERROR","error":"x"}"#;
    assert!(accept_message(ORIGIN, ORIGIN, data).is_some());
    assert!(accept_message("https://evil.example", ORIGIN, data).is_none());
    assert!(accept_message("", "", data).is_none());
}

#[test]
fn ignores_unrelated_same_origin_messages() {
    assert!(accept_message(ORIGIN, ORIGIN, r#"{"source":"react-devtools"}"#).is_none());
}

#[test]
fn success_message_signs_in_opener() {
    let (session, _) = session();
    let message = OAuthMessage::Success { access_token: "A".to_owned(), refresh_token: "R".to_owned(), user: user(8) };

    assert_eq!(apply_message(&session, message), OpenerOutcome::SignedIn);

    assert_eq!(session.tokens().access_token().as_deref(), Some("A"));
    let state = session.state();
    assert!(state.is_authenticated);
    assert_eq!(state.user.map(|u| u.id), Some(8));
}

#[test]
fn error_message_sets_session_error() {
    let (session, _) = session();
    session.set_loading(true);

    let outcome = apply_message(&session, OAuthMessage::Error { error: "Erreur d'authentification avec google".to_owned() });

    assert_eq!(outcome, OpenerOutcome::Failed("Erreur d'authentification avec google".to_owned()));
    let state = session.state();
    assert!(!state.loading);
    assert!(!state.is_authenticated);
    assert_eq!(state.error.as_deref(), Some("Erreur d'authentification avec google"));
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn social_login_fetches_provider_url() {
    let (session, gateway) = session();
    gateway.on_authorize(Ok("https://accounts.google.com/o/oauth2/auth?x=1".to_owned()));

    let launch = block_on(start_social_login(&session, Provider::Google)).unwrap();

    assert_eq!(gateway.calls(), vec!["authorize:google"]);
    assert_eq!(launch, Launch::SameTab);
}

#[test]
fn social_login_failure_is_reported() {
    let (session, gateway) = session();
    gateway.on_authorize(Err(GatewayError::Network("offline".to_owned())));

    assert!(block_on(start_social_login(&session, Provider::Github)).is_err());

    assert_eq!(session.state().error.as_deref(), Some("Connexion GitHub indisponible: offline"));
}
