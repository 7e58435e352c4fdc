//! Login page: email + password form and social sign-in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Failed OAuth callbacks land here with `?error=<message>`; protected pages
//! send visitors here with `?returnUrl=<path>`. Social sign-in runs in a
//! popup whose result arrives as a window message.

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::config::{FORGOT_PASSWORD_ROUTE, REGISTER_ROUTE};
use crate::net::types::Provider;
use crate::state::auth::AuthState;
use crate::state::session::AppSession;
use crate::util::auth::post_login_target;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = expect_context::<AppSession>();
    let navigate = use_navigate();
    let query = use_query_map();

    let return_url = query.with_untracked(|q| q.get("returnUrl"));
    let callback_error = query.with_untracked(|q| q.get("error")).filter(|e| !e.trim().is_empty());
    let target = post_login_target(return_url.as_deref());

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let remember_me = RwSignal::new(false);
    let notice = RwSignal::new(callback_error);

    #[cfg(feature = "hydrate")]
    {
        let navigate = navigate.clone();
        let target = target.clone();
        crate::oauth::opener::install_message_listener(session.clone(), move |outcome| {
            if outcome == crate::oauth::opener::OpenerOutcome::SignedIn {
                navigate(&target, leptos_router::NavigateOptions::default());
            }
        });
    }

    let on_submit = {
        let session = session.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if auth.get_untracked().loading {
                return;
            }
            notice.set(None);
            let request = crate::net::types::LoginRequest {
                email: email.get_untracked().trim().to_owned(),
                password: password.get_untracked(),
                remember_me: remember_me.get_untracked(),
            };
            if request.email.is_empty() || request.password.is_empty() {
                notice.set(Some("Veuillez saisir votre email et votre mot de passe.".to_owned()));
                return;
            }

            #[cfg(feature = "hydrate")]
            {
                let session = session.clone();
                let navigate = navigate.clone();
                let target = target.clone();
                leptos::task::spawn_local(async move {
                    if session.login(&request).await.is_ok() {
                        navigate(&target, leptos_router::NavigateOptions::default());
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            let _ = (&session, request, &target, &navigate);
        }
    };

    let social_buttons = Provider::ALL
        .into_iter()
        .map(|provider| {
            let session = session.clone();
            view! {
                <button
                    class="login-button login-button--social"
                    type="button"
                    data-provider=provider.as_str()
                    on:click=move |_| {
                        #[cfg(feature = "hydrate")]
                        {
                            let session = session.clone();
                            leptos::task::spawn_local(async move {
                                if let Err(e) = crate::oauth::opener::start_social_login(&session, provider).await {
                                    log::debug!("login: {provider} sign-in not started: {e}");
                                }
                            });
                        }
                        #[cfg(not(feature = "hydrate"))]
                        let _ = &session;
                    }
                >
                    {format!("Continuer avec {}", provider.label())}
                </button>
            }
        })
        .collect_view();

    let banner = move || notice.get().or_else(|| auth.get().error);

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"EcoWatch"</h1>
                <p class="login-card__subtitle">"Connexion à votre espace"</p>
                <Show when=move || banner().is_some()>
                    <p class="login-message login-message--error" role="alert">
                        {move || banner().unwrap_or_default()}
                    </p>
                </Show>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="vous@exemple.org"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Mot de passe"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <label class="login-remember">
                        <input
                            type="checkbox"
                            prop:checked=move || remember_me.get()
                            on:change=move |ev| remember_me.set(event_target_checked(&ev))
                        />
                        "Se souvenir de moi"
                    </label>
                    <a class="login-link" href=FORGOT_PASSWORD_ROUTE>"Mot de passe oublié ?"</a>
                    <button class="login-button" type="submit" disabled=move || auth.get().loading>
                        {move || if auth.get().loading { "Connexion..." } else { "Se connecter" }}
                    </button>
                </form>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">"Ou"</p>
                <div class="login-social">{social_buttons}</div>
                <p class="login-footer">
                    "Pas encore de compte ? "
                    <a href=REGISTER_ROUTE>"Créer un compte"</a>
                </p>
            </div>
        </div>
    }
}
