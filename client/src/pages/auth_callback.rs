//! OAuth provider redirect target: `/auth/callback/{provider}`.
//!
//! Renders a processing spinner and, once in the browser, hands the query
//! string to the reconciler. The page itself never decides where to go; the
//! reconciler completes by messaging the opener or navigating.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::config::LOGIN_ROUTE;
use crate::oauth::reconciler::callback_provider_label;

#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    let params = use_params_map();
    let provider = params.with_untracked(|p| p.get("provider")).unwrap_or_default();
    let provider_label = callback_provider_label(&provider);
    let failure = RwSignal::new(None::<String>);

    #[cfg(feature = "hydrate")]
    Effect::new(move || {
        use crate::oauth::context::BrowserWindow;
        use crate::oauth::params::CallbackParams;
        use crate::oauth::reconciler::{CallbackResult, Reconciler};

        let session = expect_context::<crate::state::session::AppSession>();
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let provider = provider.clone();
        leptos::task::spawn_local(async move {
            let window = BrowserWindow;
            let result = Reconciler::new(&provider, CallbackParams::from_query(&search), &session, &window)
                .run()
                .await;
            if let CallbackResult::Error { message, .. } = result {
                failure.set(Some(message));
            }
        });
    });

    view! {
        <div class="callback-page">
            <div class="callback-card">
                <Show
                    when=move || failure.get().is_none()
                    fallback=move || {
                        view! {
                            <p class="login-message login-message--error" role="alert">
                                {move || failure.get().unwrap_or_default()}
                            </p>
                            <a class="login-button" href=LOGIN_ROUTE>"Retour à la connexion"</a>
                        }
                    }
                >
                    <div class="spinner" aria-hidden="true"></div>
                    <p class="callback-card__title">
                        {format!("Authentification {provider_label} en cours...")}
                    </p>
                    <p class="callback-card__hint">"Veuillez patienter pendant la vérification."</p>
                </Show>
            </div>
        </div>
    }
}
