//! Opener side of a popup sign-in.
//!
//! The login page asks the backend for a provider URL, opens it in a popup
//! (same tab if popups are blocked), and listens for the callback page's
//! message. Messages from any other origin are dropped.

#[cfg(test)]
#[path = "opener_test.rs"]
mod opener_test;

use crate::net::api::{AuthGateway, GatewayError};
use crate::net::types::{Provider, TokenPair};
use crate::state::auth::AuthStateCell;
use crate::state::session::Session;
use crate::util::storage::KeyValueStore;

use super::message::OAuthMessage;

/// What a received message did to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpenerOutcome {
    SignedIn,
    Failed(String),
}

/// How the provider page was shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Launch {
    Popup,
    SameTab,
}

/// Parse `data` if it came from our own origin.
pub fn accept_message(event_origin: &str, own_origin: &str, data: &str) -> Option<OAuthMessage> {
    if own_origin.is_empty() || event_origin != own_origin {
        log::debug!("oauth: ignoring message from {event_origin}");
        return None;
    }
    OAuthMessage::parse(data)
}

/// Apply a popup's result to this window's session.
pub fn apply_message<G, K, C>(session: &Session<G, K, C>, message: OAuthMessage) -> OpenerOutcome
where
    G: AuthGateway,
    K: KeyValueStore,
    C: AuthStateCell,
{
    let outcome = match message {
        OAuthMessage::Success { access_token, refresh_token, user } => {
            match session.accept_oauth_success(&TokenPair { access_token, refresh_token }, user) {
                Ok(()) => OpenerOutcome::SignedIn,
                Err(e) => OpenerOutcome::Failed(e.to_string()),
            }
        }
        OAuthMessage::Error { error } => OpenerOutcome::Failed(error),
    };
    if let OpenerOutcome::Failed(error) = &outcome {
        log::warn!("oauth: popup sign-in failed: {error}");
        session.set_loading(false);
        session.set_error(Some(error.clone()));
    }
    outcome
}

/// Fetch the provider authorization URL and show it.
///
/// # Errors
///
/// Returns the gateway failure; the session error is set as well.
pub async fn start_social_login<G, K, C>(session: &Session<G, K, C>, provider: Provider) -> Result<Launch, GatewayError>
where
    G: AuthGateway,
    K: KeyValueStore,
    C: AuthStateCell,
{
    session.clear_error();
    match session.gateway().authorize_url(provider).await {
        Ok(url) => {
            log::info!("oauth: opening {provider} sign-in");
            Ok(open_provider_page(&url))
        }
        Err(e) => {
            log::error!("oauth: no authorization URL for {provider}: {e}");
            session.set_error(Some(format!("Connexion {} indisponible: {e}", provider.label())));
            Err(e)
        }
    }
}

fn open_provider_page(url: &str) -> Launch {
    #[cfg(feature = "hydrate")]
    {
        let Some(window) = web_sys::window() else {
            return Launch::SameTab;
        };
        if let Ok(Some(_popup)) =
            window.open_with_url_and_target_and_features(url, "ecowatch_oauth", "width=500,height=650,menubar=no,toolbar=no")
        {
            return Launch::Popup;
        }
        log::info!("oauth: popup blocked, continuing in this tab");
        if let Err(e) = window.location().set_href(url) {
            log::error!("oauth: could not open provider page: {e:?}");
        }
        Launch::SameTab
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = url;
        Launch::SameTab
    }
}

/// Listen for popup messages for as long as the calling component lives.
#[cfg(feature = "hydrate")]
pub fn install_message_listener<F>(session: crate::state::session::AppSession, on_outcome: F)
where
    F: Fn(OpenerOutcome) + 'static,
{
    use leptos::prelude::*;

    use super::context::{BrowserWindow, CallbackWindow};

    let handle = window_event_listener(leptos::ev::message, move |ev: web_sys::MessageEvent| {
        let data = js_sys::JSON::stringify(&ev.data()).ok().map(String::from).unwrap_or_default();
        if let Some(message) = accept_message(&ev.origin(), &BrowserWindow.origin(), &data) {
            on_outcome(apply_message(&session, message));
        }
    });
    on_cleanup(move || handle.remove());
}
