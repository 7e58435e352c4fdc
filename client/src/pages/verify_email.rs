//! Email verification landing page: `/auth/verify-email?token=...`.
//!
//! Reachable signed in or not. The token is checked once, as soon as the
//! page runs in the browser.

#[cfg(test)]
#[path = "verify_email_test.rs"]
mod verify_email_test;

use leptos::prelude::*;

use crate::config::LOGIN_ROUTE;
use crate::net::api::AuthGateway;

const MSG_MISSING_TOKEN: &str = "Lien de vérification invalide.";

/// Progress of the verification request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verification {
    Verifying,
    Verified,
    Failed(String),
}

/// Submit `token` to the backend.
pub async fn verify_email_token<G: AuthGateway>(gateway: &G, token: Option<&str>) -> Verification {
    let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        log::warn!("verify-email: link without token");
        return Verification::Failed(MSG_MISSING_TOKEN.to_owned());
    };
    match gateway.verify_email(token).await {
        Ok(()) => {
            log::info!("verify-email: address confirmed");
            Verification::Verified
        }
        Err(e) => {
            log::warn!("verify-email: rejected: {e}");
            Verification::Failed(e.to_string())
        }
    }
}

#[component]
pub fn VerifyEmailPage() -> impl IntoView {
    let status = RwSignal::new(Verification::Verifying);

    #[cfg(feature = "hydrate")]
    {
        let session = expect_context::<crate::state::session::AppSession>();
        let token = leptos_router::hooks::use_query_map().with_untracked(|q| q.get("token"));
        Effect::new(move || {
            let session = session.clone();
            let token = token.clone();
            leptos::task::spawn_local(async move {
                status.set(verify_email_token(session.gateway(), token.as_deref()).await);
            });
        });
    }

    let body = move || match status.get() {
        Verification::Verifying => view! {
            <div class="spinner" aria-hidden="true"></div>
            <p class="callback-card__title">"Vérification de votre email..."</p>
        }
        .into_any(),
        Verification::Verified => view! {
            <p class="login-message login-message--success">"Votre email a été vérifié."</p>
            <a class="login-button" href=LOGIN_ROUTE>"Se connecter"</a>
        }
        .into_any(),
        Verification::Failed(message) => view! {
            <p class="login-message login-message--error" role="alert">
                {format!("La vérification a échoué : {message}")}
            </p>
            <a class="login-button" href=LOGIN_ROUTE>"Retour à la connexion"</a>
        }
        .into_any(),
    };

    view! {
        <div class="callback-page">
            <div class="callback-card">
                <h1>"Vérification de l'email"</h1>
                {body}
            </div>
        </div>
    }
}
