//! New password form reached from the emailed reset link.

#[cfg(test)]
#[path = "reset_password_test.rs"]
mod reset_password_test;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::config::{FORGOT_PASSWORD_ROUTE, LOGIN_ROUTE};
use crate::state::auth::AuthState;
use crate::state::session::AppSession;
use crate::util::validation::check_new_password;

/// First problem with a reset form, if any.
pub fn validate_reset(token: Option<&str>, password: &str, confirm: &str) -> Result<(), &'static str> {
    if token.is_none_or(|t| t.trim().is_empty()) {
        return Err("Lien de réinitialisation invalide ou expiré.");
    }
    check_new_password(password, confirm)
}

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = expect_context::<AppSession>();
    let token = use_query_map().with_untracked(|q| q.get("token"));

    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let notice = RwSignal::new(None::<String>);
    let done = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.get_untracked().loading {
            return;
        }
        let new_password = password.get_untracked();
        if let Err(problem) = validate_reset(token.as_deref(), &new_password, &confirm.get_untracked()) {
            notice.set(Some(problem.to_owned()));
            return;
        }
        notice.set(None);
        let reset_token = token.clone().unwrap_or_default();

        #[cfg(feature = "hydrate")]
        {
            let session = session.clone();
            leptos::task::spawn_local(async move {
                if session.reset_password(&reset_token, &new_password).await.is_ok() {
                    done.set(true);
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&session, reset_token, new_password);
    };

    let banner = move || notice.get().or_else(|| auth.get().error);

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Réinitialiser le mot de passe"</h1>
                <Show
                    when=move || !done.get()
                    fallback=|| {
                        view! {
                            <p class="login-message login-message--success">
                                "Votre mot de passe a été réinitialisé."
                            </p>
                            <a class="login-button" href=LOGIN_ROUTE>"Se connecter"</a>
                        }
                    }
                >
                    <Show when=move || banner().is_some()>
                        <p class="login-message login-message--error" role="alert">
                            {move || banner().unwrap_or_default()}
                        </p>
                    </Show>
                    <form class="login-form" on:submit=on_submit.clone()>
                        <input
                            class="login-input"
                            type="password"
                            autocomplete="new-password"
                            placeholder="Nouveau mot de passe"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                        <input
                            class="login-input"
                            type="password"
                            autocomplete="new-password"
                            placeholder="Confirmer le mot de passe"
                            prop:value=move || confirm.get()
                            on:input=move |ev| confirm.set(event_target_value(&ev))
                        />
                        <button class="login-button" type="submit" disabled=move || auth.get().loading>
                            {move || if auth.get().loading { "Envoi en cours..." } else { "Réinitialiser" }}
                        </button>
                    </form>
                    <p class="login-footer">
                        <a href=FORGOT_PASSWORD_ROUTE>"Demander un nouveau lien"</a>
                    </p>
                </Show>
            </div>
        </div>
    }
}
