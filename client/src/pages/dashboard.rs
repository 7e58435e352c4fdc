//! Dashboard shell: navbar, geographic sidebar, and the overview panel.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. Rendering is gated on the session:
//! a spinner while it is being restored, an error panel if restoring failed,
//! and the layout once a user is signed in. The route guard sends signed-out
//! visitors to login with a `returnUrl`.

use leptos::prelude::*;

use crate::components::navbar::Navbar;
use crate::components::sidebar::Sidebar;
use crate::config::LOGIN_ROUTE;
use crate::state::auth::AuthState;
use crate::state::geography::GeoSelections;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    let selections = RwSignal::new(GeoSelections::default());
    #[cfg(feature = "hydrate")]
    {
        use crate::util::storage::LocalStorage;

        let restored = RwSignal::new(false);
        Effect::new(move || {
            selections.set(GeoSelections::load(&LocalStorage));
            restored.set(true);
        });
        Effect::new(move || {
            let current = selections.get();
            if !restored.get() {
                return;
            }
            if let Err(e) = current.save(&LocalStorage) {
                log::warn!("dashboard: selections not persisted: {e}");
            }
        });
    }

    let greeting = move || {
        auth.get()
            .user
            .map(|u| format!("Bienvenue, {}", u.display_name()))
            .unwrap_or_default()
    };
    let selection_summary = move || match selections.get().entities().len() {
        0 => "Aucune zone suivie pour le moment.".to_owned(),
        1 => "1 zone suivie.".to_owned(),
        n => format!("{n} zones suivies."),
    };

    view! {
        <Show
            when=move || !auth.get().loading
            fallback=|| {
                view! {
                    <div class="dashboard-loading">
                        <div class="spinner" aria-hidden="true"></div>
                        <p>"Chargement de votre session..."</p>
                    </div>
                }
            }
        >
            <Show
                when=move || auth.get().is_authenticated
                fallback=move || {
                    view! {
                        <div class="dashboard-error" role="alert">
                            <p>{move || auth.get().error.unwrap_or_else(|| "Session introuvable.".to_owned())}</p>
                            <a class="login-button" href=LOGIN_ROUTE>"Se connecter"</a>
                        </div>
                    }
                }
            >
                <div class="dashboard-layout">
                    <Navbar/>
                    <div class="dashboard-body">
                        <Sidebar selections=selections/>
                        <main class="dashboard-content">
                            <h1 class="dashboard-content__title">{greeting}</h1>
                            <p class="dashboard-content__summary">{selection_summary}</p>
                        </main>
                    </div>
                </div>
            </Show>
        </Show>
    }
}
