//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Redirect, Route, Router, Routes},
    hooks::{use_location, use_navigate},
};

use crate::config::DASHBOARD_ROUTE;
use crate::net::api::HttpGateway;
use crate::pages::{
    auth_callback::AuthCallbackPage, dashboard::DashboardPage, forgot_password::ForgotPasswordPage, login::LoginPage,
    register::RegisterPage, reset_password::ResetPasswordPage, verify_email::VerifyEmailPage,
};
use crate::state::auth::AuthState;
use crate::state::session::{AppSession, Session};
use crate::util::auth::install_route_guard;
use crate::util::storage::LocalStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="fr">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the auth state signal and the per-window [`AppSession`]. The
/// session starts pending and is restored once the app is running in the
/// browser; callback pages only rehydrate, since the reconciler owns the
/// tokens there.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::pending());
    let session: AppSession = Session::new(HttpGateway::from_window(), LocalStorage, auth);
    provide_context(auth);
    provide_context(session.clone());

    #[cfg(feature = "hydrate")]
    Effect::new(move || {
        let now = crate::util::token::now_unix_secs();
        let on_callback = web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .is_some_and(|path| path.starts_with(crate::config::CALLBACK_ROUTE_PREFIX));
        if on_callback {
            session.rehydrate(now);
            return;
        }
        let session = session.clone();
        leptos::task::spawn_local(async move { session.initialize(now).await });
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = session;

    view! {
        <Stylesheet id="leptos" href="/pkg/ecowatch.css"/>
        <Title text="EcoWatch"/>

        <Router>
            <RouteGuard/>
            <Routes fallback=|| "Page introuvable.".into_view()>
                <Route path=StaticSegment("") view=|| view! { <Redirect path=DASHBOARD_ROUTE/> }/>
                <Route path=(StaticSegment("auth"), StaticSegment("login")) view=LoginPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("register")) view=RegisterPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("forgot-password")) view=ForgotPasswordPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("reset-password")) view=ResetPasswordPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("verify-email")) view=VerifyEmailPage/>
                <Route
                    path=(StaticSegment("auth"), StaticSegment("callback"), ParamSegment("provider"))
                    view=AuthCallbackPage
                />
                <Route path=StaticSegment("dashboard") view=DashboardPage/>
            </Routes>
        </Router>
    }
}

/// Applies the protected and guest-only route tables on every navigation.
#[component]
fn RouteGuard() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    install_route_guard(auth, use_navigate(), use_location());
}
