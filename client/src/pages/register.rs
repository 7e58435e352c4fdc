//! Account creation page.
//!
//! The backend sends a verification email, so a successful registration
//! ends on a confirmation message rather than a signed-in session.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;

use crate::config::LOGIN_ROUTE;
use crate::net::types::RegisterRequest;
use crate::state::auth::AuthState;
use crate::state::session::AppSession;
use crate::util::validation::{check_email, check_new_password};

/// First problem with a registration form, if any.
pub fn validate_registration(form: &RegisterRequest) -> Result<(), &'static str> {
    if form.firstname.trim().is_empty() || form.lastname.trim().is_empty() {
        return Err("Le prénom et le nom sont requis.");
    }
    check_email(&form.email)?;
    check_new_password(&form.password, &form.confirm_password)?;
    if !form.terms {
        return Err("Vous devez accepter les conditions d'utilisation.");
    }
    Ok(())
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = expect_context::<AppSession>();

    let firstname = RwSignal::new(String::new());
    let lastname = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let terms = RwSignal::new(false);
    let notice = RwSignal::new(None::<String>);
    let registered = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.get_untracked().loading {
            return;
        }
        let phone_value = phone.get_untracked().trim().to_owned();
        let form = RegisterRequest {
            firstname: firstname.get_untracked().trim().to_owned(),
            lastname: lastname.get_untracked().trim().to_owned(),
            email: email.get_untracked().trim().to_owned(),
            password: password.get_untracked(),
            confirm_password: confirm.get_untracked(),
            phone: (!phone_value.is_empty()).then_some(phone_value),
            terms: terms.get_untracked(),
        };
        if let Err(problem) = validate_registration(&form) {
            notice.set(Some(problem.to_owned()));
            return;
        }
        notice.set(None);

        #[cfg(feature = "hydrate")]
        {
            let session = session.clone();
            leptos::task::spawn_local(async move {
                if session.register(&form).await.is_ok() {
                    registered.set(true);
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&session, form);
    };

    let field = move |label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <input
                class="login-input"
                type=kind
                placeholder=label
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        }
    };

    let banner = move || notice.get().or_else(|| auth.get().error);

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Créer un compte"</h1>
                <Show
                    when=move || !registered.get()
                    fallback=|| {
                        view! {
                            <p class="login-message">
                                "Compte créé. Vérifiez votre email puis connectez-vous."
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
                        {field("Prénom", "text", firstname)}
                        {field("Nom", "text", lastname)}
                        {field("Email", "email", email)}
                        {field("Téléphone (optionnel)", "tel", phone)}
                        {field("Mot de passe", "password", password)}
                        {field("Confirmer le mot de passe", "password", confirm)}
                        <label class="login-remember">
                            <input
                                type="checkbox"
                                prop:checked=move || terms.get()
                                on:change=move |ev| terms.set(event_target_checked(&ev))
                            />
                            "J'accepte les conditions d'utilisation"
                        </label>
                        <button class="login-button" type="submit" disabled=move || auth.get().loading>
                            "Créer mon compte"
                        </button>
                    </form>
                    <p class="login-footer">
                        "Déjà inscrit ? "
                        <a href=LOGIN_ROUTE>"Se connecter"</a>
                    </p>
                </Show>
            </div>
        </div>
    }
}
