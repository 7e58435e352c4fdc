//! Top navigation bar for authenticated pages.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::config::LOGIN_ROUTE;
use crate::state::auth::AuthState;
use crate::state::session::AppSession;

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = expect_context::<AppSession>();
    let navigate = use_navigate();

    let display_name = move || auth.get().user.map(|u| u.display_name()).unwrap_or_default();
    let initials = move || auth.get().user.map(|u| u.initials()).unwrap_or_default();

    let on_logout = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let session = session.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                session.logout().await;
                navigate(LOGIN_ROUTE, leptos_router::NavigateOptions::default());
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&session, &navigate, LOGIN_ROUTE);
    };

    view! {
        <header class="navbar">
            <a class="navbar__brand" href="/dashboard">
                <span class="navbar__logo">"EcoWatch"</span>
                <span class="navbar__tagline">"WASCAL"</span>
            </a>
            <div class="navbar__user">
                <span class="navbar__avatar" aria-hidden="true">{initials}</span>
                <span class="navbar__name">{display_name}</span>
                <button class="navbar__logout" type="button" on:click=on_logout>
                    "Déconnexion"
                </button>
            </div>
        </header>
    }
}
