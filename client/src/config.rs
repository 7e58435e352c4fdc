//! Client configuration: backend location, routes, and storage keys.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend base URL is resolved once per page from the compile-time
//! override or the page hostname. Route and storage constants are shared by
//! the reconciler, guards, and pages so redirects stay consistent.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Backend used when the page is served from a local development host.
pub const LOCAL_API_BASE_URL: &str = "http://localhost:8000";
/// Backend used for every other host.
pub const PRODUCTION_API_BASE_URL: &str = "https://wascal-backend.onrender.com";

pub const LOGIN_ROUTE: &str = "/auth/login";
pub const REGISTER_ROUTE: &str = "/auth/register";
pub const FORGOT_PASSWORD_ROUTE: &str = "/auth/forgot-password";
pub const RESET_PASSWORD_ROUTE: &str = "/auth/reset-password";
pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const CALLBACK_ROUTE_PREFIX: &str = "/auth/callback";

/// Raw access token key in `localStorage`.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Raw refresh token key in `localStorage`.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Session snapshot (`user`, `is_authenticated`); never holds tokens.
pub const SESSION_SNAPSHOT_KEY: &str = "ecowatch_auth_store";
/// Sidebar geographic selection snapshot.
pub const GEOGRAPHY_KEY: &str = "ecowatch_geographic_store";

/// Seconds before `exp` at which an access token is already treated as stale.
pub const TOKEN_EXPIRY_BUFFER_SECS: u64 = 5 * 60;

/// Require a session. A trailing `*` matches any suffix.
pub const PROTECTED_ROUTES: &[&str] = &[
    "/dashboard",
    "/dashboard/*",
    "/map",
    "/analytics",
    "/monitoring",
    "/predictions",
    "/alerts",
    "/reports",
    "/settings",
    "/profile",
];

/// Pointless for an authenticated user; they are sent to the dashboard.
pub const GUEST_ONLY_ROUTES: &[&str] = &[LOGIN_ROUTE, REGISTER_ROUTE, FORGOT_PASSWORD_ROUTE, RESET_PASSWORD_ROUTE];

/// Where the backend API lives for this page load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Resolve the API base URL for a page served from `hostname`.
    ///
    /// `ECOWATCH_API_BASE_URL` at build time wins over hostname detection.
    pub fn for_hostname(hostname: &str) -> Self {
        Self::resolve(option_env!("ECOWATCH_API_BASE_URL"), hostname)
    }

    fn resolve(override_url: Option<&str>, hostname: &str) -> Self {
        let base_url = match override_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None if is_local_host(hostname) => LOCAL_API_BASE_URL.to_owned(),
            None => PRODUCTION_API_BASE_URL.to_owned(),
        };
        Self { base_url }
    }

    /// Resolve from the current `window.location`.
    pub fn from_window() -> Self {
        #[cfg(feature = "hydrate")]
        {
            let hostname = web_sys::window()
                .and_then(|w| w.location().hostname().ok())
                .unwrap_or_default();
            Self::for_hostname(&hostname)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Self::for_hostname("")
        }
    }

    /// Join an absolute API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn is_local_host(hostname: &str) -> bool {
    matches!(hostname, "localhost" | "127.0.0.1" | "[::1]")
}

/// Match `path` against a route table entry, honoring trailing `*` wildcards.
pub fn route_matches(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => path.starts_with(prefix),
        None => path == pattern,
    }
}
