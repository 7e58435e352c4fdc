//! Backend auth gateway.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): every call fails with [`GatewayError::Unavailable`]
//! since these endpoints are only meaningful in the browser.
//!
//! DESIGN
//! ======
//! [`AuthGateway`] is the seam between the session store / OAuth reconciler
//! and the network, so both can be driven by in-memory fakes in tests.
//! Every call takes the credentials it needs explicitly; the gateway never
//! reads token storage on its own.
//!
//! ERROR HANDLING
//! ==============
//! Non-OK responses are turned into [`GatewayError::Rejected`] carrying the
//! backend `detail` message when one is present. `401` on authenticated calls
//! is reported as [`GatewayError::Unauthorized`] so callers can refresh.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use crate::config::ApiConfig;

use super::types::{AuthResponse, CodeExchangeResponse, LoginRequest, Provider, RegisterRequest, User};

/// Failure talking to the backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced a response (offline, CORS, DNS, ...).
    #[error("{0}")]
    Network(String),
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The access token was refused.
    #[error("unauthorized")]
    Unauthorized,
    /// The response body did not match the expected schema.
    #[error("malformed response: {0}")]
    Decode(String),
    /// Called outside the browser.
    #[error("not available on server")]
    Unavailable,
}

/// Network operations the auth flows depend on.
#[allow(async_fn_in_trait)]
pub trait AuthGateway {
    /// `POST /api/auth/login` (form-encoded).
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, GatewayError>;

    /// `POST /api/auth/register`; the account may still need email verification.
    async fn register(&self, data: &RegisterRequest) -> Result<User, GatewayError>;

    /// `POST /api/auth/logout`.
    async fn logout(&self, access_token: &str) -> Result<(), GatewayError>;

    /// `POST /api/auth/refresh`; returns the new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<String, GatewayError>;

    /// `GET /api/auth/me` with `Authorization: Bearer <access_token>`.
    async fn current_user(&self, access_token: &str) -> Result<User, GatewayError>;

    /// Exchange an authorization code for a user and token pair.
    async fn exchange_code(&self, provider: Provider, code: &str) -> Result<CodeExchangeResponse, GatewayError>;

    /// Ask the backend for the provider authorization URL.
    async fn authorize_url(&self, provider: Provider) -> Result<String, GatewayError>;

    async fn change_password(
        &self,
        access_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), GatewayError>;

    async fn request_password_reset(&self, email: &str) -> Result<(), GatewayError>;

    async fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<(), GatewayError>;

    /// `POST /api/auth/verify-email` with the token from the verification link.
    async fn verify_email(&self, token: &str) -> Result<(), GatewayError>;
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) const LOGIN_PATH: &str = "/api/auth/login";
#[cfg(any(test, feature = "hydrate"))]
pub(crate) const REGISTER_PATH: &str = "/api/auth/register";
#[cfg(any(test, feature = "hydrate"))]
pub(crate) const LOGOUT_PATH: &str = "/api/auth/logout";
#[cfg(any(test, feature = "hydrate"))]
pub(crate) const REFRESH_PATH: &str = "/api/auth/refresh";
#[cfg(any(test, feature = "hydrate"))]
pub(crate) const ME_PATH: &str = "/api/auth/me";
#[cfg(any(test, feature = "hydrate"))]
pub(crate) const CHANGE_PASSWORD_PATH: &str = "/api/auth/password/change";
#[cfg(any(test, feature = "hydrate"))]
pub(crate) const RESET_REQUEST_PATH: &str = "/api/auth/password/reset/request";
#[cfg(any(test, feature = "hydrate"))]
pub(crate) const RESET_CONFIRM_PATH: &str = "/api/auth/password/reset/confirm";
#[cfg(any(test, feature = "hydrate"))]
pub(crate) const VERIFY_EMAIL_PATH: &str = "/api/auth/verify-email";

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn oauth_login_path(provider: Provider) -> String {
    format!("/api/auth/oauth/{provider}/login")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn oauth_callback_path(provider: Provider) -> String {
    format!("/api/auth/oauth/{provider}/callback")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn bearer(access_token: &str) -> String {
    format!("Bearer {access_token}")
}

/// Form body for the OAuth2 password grant the backend expects.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn login_form_body(credentials: &LoginRequest) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("username", &credentials.email)
        .append_pair("password", &credentials.password)
        .finish()
}

/// Human message for a rejected request.
///
/// Uses the backend `detail` field when it is a string, the first `msg` when
/// it is a validation list, and `fallback` otherwise.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn rejection_message(body: &str, fallback: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback.to_owned();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
            .map_or_else(|| fallback.to_owned(), str::to_owned),
        _ => fallback.to_owned(),
    }
}

/// HTTP implementation of [`AuthGateway`] against the configured backend.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    config: ApiConfig,
}

impl HttpGateway {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// Gateway for the backend that serves the current page.
    pub fn from_window() -> Self {
        Self::new(ApiConfig::from_window())
    }
}

#[cfg(feature = "hydrate")]
mod http {
    use gloo_net::http::Response;
    use serde::de::DeserializeOwned;

    use super::{GatewayError, rejection_message};

    pub(super) fn network(err: gloo_net::Error) -> GatewayError {
        GatewayError::Network(err.to_string())
    }

    pub(super) async fn checked(resp: Response, fallback: &str) -> Result<Response, GatewayError> {
        if resp.ok() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(GatewayError::Rejected { status, message: rejection_message(&body, fallback) })
    }

    pub(super) async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, GatewayError> {
        resp.json::<T>().await.map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

impl AuthGateway for HttpGateway {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, GatewayError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&self.config.endpoint(LOGIN_PATH))
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(login_form_body(credentials))
                .map_err(http::network)?
                .send()
                .await
                .map_err(http::network)?;
            let resp = http::checked(resp, "Login failed").await?;
            http::decode(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&self.config, credentials);
            Err(GatewayError::Unavailable)
        }
    }

    async fn register(&self, data: &RegisterRequest) -> Result<User, GatewayError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&self.config.endpoint(REGISTER_PATH))
                .json(data)
                .map_err(http::network)?
                .send()
                .await
                .map_err(http::network)?;
            let resp = http::checked(resp, "Registration failed").await?;
            http::decode(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = data;
            Err(GatewayError::Unavailable)
        }
    }

    async fn logout(&self, access_token: &str) -> Result<(), GatewayError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&self.config.endpoint(LOGOUT_PATH))
                .header("Authorization", &bearer(access_token))
                .send()
                .await
                .map_err(http::network)?;
            http::checked(resp, "Logout failed").await.map(drop)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = access_token;
            Err(GatewayError::Unavailable)
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, GatewayError> {
        #[cfg(feature = "hydrate")]
        {
            #[derive(serde::Deserialize)]
            struct RefreshResponse {
                access_token: String,
            }
            let payload = serde_json::json!({ "refresh_token": refresh_token });
            let resp = gloo_net::http::Request::post(&self.config.endpoint(REFRESH_PATH))
                .json(&payload)
                .map_err(http::network)?
                .send()
                .await
                .map_err(http::network)?;
            let resp = http::checked(resp, "Token refresh failed").await?;
            let body: RefreshResponse = http::decode(resp).await?;
            Ok(body.access_token)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = refresh_token;
            Err(GatewayError::Unavailable)
        }
    }

    async fn current_user(&self, access_token: &str) -> Result<User, GatewayError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&self.config.endpoint(ME_PATH))
                .header("Authorization", &bearer(access_token))
                .header("Content-Type", "application/json")
                .send()
                .await
                .map_err(http::network)?;
            if resp.status() == 401 {
                return Err(GatewayError::Unauthorized);
            }
            let resp = http::checked(resp, "Impossible de récupérer les informations utilisateur").await?;
            http::decode(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = access_token;
            Err(GatewayError::Unavailable)
        }
    }

    async fn exchange_code(&self, provider: Provider, code: &str) -> Result<CodeExchangeResponse, GatewayError> {
        #[cfg(feature = "hydrate")]
        {
            let payload = serde_json::json!({ "code": code });
            let resp = gloo_net::http::Request::post(&self.config.endpoint(&oauth_callback_path(provider)))
                .json(&payload)
                .map_err(http::network)?
                .send()
                .await
                .map_err(http::network)?;
            let resp = http::checked(resp, "OAuth code exchange failed").await?;
            http::decode(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (provider, code);
            Err(GatewayError::Unavailable)
        }
    }

    async fn authorize_url(&self, provider: Provider) -> Result<String, GatewayError> {
        #[cfg(feature = "hydrate")]
        {
            #[derive(serde::Deserialize)]
            struct AuthorizeResponse {
                auth_url: String,
            }
            let resp = gloo_net::http::Request::get(&self.config.endpoint(&oauth_login_path(provider)))
                .send()
                .await
                .map_err(http::network)?;
            let resp = http::checked(resp, "OAuth login unavailable").await?;
            let body: AuthorizeResponse = http::decode(resp).await?;
            Ok(body.auth_url)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = provider;
            Err(GatewayError::Unavailable)
        }
    }

    async fn change_password(
        &self,
        access_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), GatewayError> {
        #[cfg(feature = "hydrate")]
        {
            let payload = serde_json::json!({
                "current_password": current_password,
                "new_password": new_password,
            });
            let resp = gloo_net::http::Request::post(&self.config.endpoint(CHANGE_PASSWORD_PATH))
                .header("Authorization", &bearer(access_token))
                .json(&payload)
                .map_err(http::network)?
                .send()
                .await
                .map_err(http::network)?;
            http::checked(resp, "Password change failed").await.map(drop)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (access_token, current_password, new_password);
            Err(GatewayError::Unavailable)
        }
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), GatewayError> {
        #[cfg(feature = "hydrate")]
        {
            let payload = serde_json::json!({ "email": email });
            let resp = gloo_net::http::Request::post(&self.config.endpoint(RESET_REQUEST_PATH))
                .json(&payload)
                .map_err(http::network)?
                .send()
                .await
                .map_err(http::network)?;
            http::checked(resp, "Password reset request failed").await.map(drop)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = email;
            Err(GatewayError::Unavailable)
        }
    }

    async fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<(), GatewayError> {
        #[cfg(feature = "hydrate")]
        {
            let payload = serde_json::json!({ "token": reset_token, "new_password": new_password });
            let resp = gloo_net::http::Request::post(&self.config.endpoint(RESET_CONFIRM_PATH))
                .json(&payload)
                .map_err(http::network)?
                .send()
                .await
                .map_err(http::network)?;
            http::checked(resp, "Password reset failed").await.map(drop)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (reset_token, new_password);
            Err(GatewayError::Unavailable)
        }
    }

    async fn verify_email(&self, token: &str) -> Result<(), GatewayError> {
        #[cfg(feature = "hydrate")]
        {
            let payload = serde_json::json!({ "token": token });
            let resp = gloo_net::http::Request::post(&self.config.endpoint(VERIFY_EMAIL_PATH))
                .json(&payload)
                .map_err(http::network)?
                .send()
                .await
                .map_err(http::network)?;
            http::checked(resp, "Email verification failed").await.map(drop)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
            Err(GatewayError::Unavailable)
        }
    }
}
