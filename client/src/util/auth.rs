//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! One guard, installed under the router, applies the route tables on every
//! navigation: protected pages bounce signed-out visitors to login with a
//! `returnUrl`, guest-only pages bounce signed-in users to where they were
//! headed. Public routes fall in neither table and are never redirected.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::location::Location;

use crate::config::{DASHBOARD_ROUTE, GUEST_ONLY_ROUTES, LOGIN_ROUTE, PROTECTED_ROUTES, route_matches};
use crate::state::auth::AuthState;

/// Path without query, fragment, or trailing slash.
fn route_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

fn in_table(table: &[&str], path: &str) -> bool {
    let path = route_path(path);
    table.iter().any(|pattern| route_matches(pattern, path))
}

pub fn is_protected_route(path: &str) -> bool {
    in_table(PROTECTED_ROUTES, path)
}

pub fn is_guest_only_route(path: &str) -> bool {
    in_table(GUEST_ONLY_ROUTES, path)
}

/// Login URL that remembers `current` as the place to come back to.
pub fn login_redirect_path(current: &str) -> String {
    format!("{LOGIN_ROUTE}?returnUrl={}", urlencoding::encode(current))
}

/// Where to go after signing in.
///
/// Only same-site absolute paths that are not guest-only are honored;
/// anything else lands on the dashboard.
pub fn post_login_target(return_url: Option<&str>) -> String {
    match return_url.map(str::trim) {
        Some(url) if url.starts_with('/') && !url.starts_with("//") && !url.contains('\\') && !is_guest_only_route(url) => {
            url.to_owned()
        }
        _ => DASHBOARD_ROUTE.to_owned(),
    }
}

/// Where `path` should send a visitor in `auth`, if anywhere.
///
/// Nothing is decided while the session is still loading.
pub fn guard_redirect(path: &str, return_url: Option<&str>, auth: &AuthState) -> Option<String> {
    if is_protected_route(path) && auth.should_redirect_unauth() {
        return Some(login_redirect_path(route_path(path)));
    }
    if is_guest_only_route(path) && auth.should_redirect_guest() {
        return Some(post_login_target(return_url));
    }
    None
}

/// Apply [`guard_redirect`] whenever the location or the session changes.
pub fn install_route_guard<F>(auth: RwSignal<AuthState>, navigate: F, location: Location)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let path = location.pathname.get();
        let return_url = location.query.with(|q| q.get("returnUrl"));
        if let Some(target) = auth.with(|state| guard_redirect(&path, return_url.as_deref(), state)) {
            log::debug!("guard: {path} -> {target}");
            navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
