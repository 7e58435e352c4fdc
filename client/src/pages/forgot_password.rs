//! Password reset request: `/auth/forgot-password`.
//!
//! The backend mails a reset link pointing at `/auth/reset-password?token=`.
//! The page only confirms the request was sent.

use leptos::prelude::*;

use crate::config::LOGIN_ROUTE;
use crate::state::auth::AuthState;
use crate::state::session::AppSession;
use crate::util::validation::check_email;

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = expect_context::<AppSession>();

    let email = RwSignal::new(String::new());
    let notice = RwSignal::new(None::<String>);
    let sent_to = RwSignal::new(None::<String>);

    let on_submit = {
        let session = session.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if auth.get_untracked().loading {
                return;
            }
            let address = email.get_untracked().trim().to_owned();
            if let Err(problem) = check_email(&address) {
                notice.set(Some(problem.to_owned()));
                return;
            }
            notice.set(None);

            #[cfg(feature = "hydrate")]
            {
                let session = session.clone();
                leptos::task::spawn_local(async move {
                    if session.request_password_reset(&address).await.is_ok() {
                        email.set(String::new());
                        sent_to.set(Some(address));
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            let _ = (&session, address);
        }
    };

    let on_retry = move |_| {
        sent_to.set(None);
        session.clear_error();
    };

    let banner = move || notice.get().or_else(|| auth.get().error);

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Mot de passe oublié"</h1>
                <Show
                    when=move || sent_to.get().is_none()
                    fallback=move || {
                        view! {
                            <p class="login-message login-message--success">
                                "Un lien de réinitialisation a été envoyé à "
                                <strong>{move || sent_to.get().unwrap_or_default()}</strong>
                            </p>
                            <p class="login-card__subtitle">
                                "Le lien expire dans 1 heure. Pensez à vérifier vos spams."
                            </p>
                            <button class="login-button login-button--ghost" type="button" on:click=on_retry.clone()>
                                "Essayer avec un autre email"
                            </button>
                            <a class="login-button" href=LOGIN_ROUTE>"Retour à la connexion"</a>
                        }
                    }
                >
                    <p class="login-card__subtitle">
                        "Entrez votre email pour recevoir un lien de réinitialisation."
                    </p>
                    <Show when=move || banner().is_some()>
                        <p class="login-message login-message--error" role="alert">
                            {move || banner().unwrap_or_default()}
                        </p>
                    </Show>
                    <form class="login-form" on:submit=on_submit.clone()>
                        <input
                            class="login-input"
                            type="email"
                            placeholder="vous@exemple.org"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                        <button class="login-button" type="submit" disabled=move || auth.get().loading>
                            {move || {
                                if auth.get().loading { "Envoi en cours..." } else { "Envoyer le lien de réinitialisation" }
                            }}
                        </button>
                    </form>
                    <p class="login-footer">
                        <a href=LOGIN_ROUTE>"Retour à la connexion"</a>
                    </p>
                </Show>
            </div>
        </div>
    }
}
