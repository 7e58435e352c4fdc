//! OAuth callback reconciler.
//!
//! SYSTEM CONTEXT
//! ==============
//! `/auth/callback/{provider}` renders a spinner and hands its query string to
//! [`Reconciler::run`]. Both backend styles are handled here:
//!
//! - direct-token: `access_token`, `refresh_token`, `success=true`, verified
//!   against `/api/auth/me`
//! - authorization-code: `code`, exchanged through the gateway
//!
//! LIFECYCLE
//! =========
//! `Pending -> Resolving -> Succeeded | Failed`. `run` consumes the
//! reconciler, so each callback resolves once and triggers exactly one
//! completion: in a popup a message to the opener followed by `close`,
//! otherwise a single navigation.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is logged, mapped onto a [`FailureReason`], and completed
//! the same context-aware way as a success. Stored tokens are cleared.

#[cfg(test)]
#[path = "reconciler_test.rs"]
mod reconciler_test;

use std::fmt;

use crate::config::{DASHBOARD_ROUTE, LOGIN_ROUTE};
use crate::net::api::{AuthGateway, GatewayError};
use crate::net::types::{Provider, TokenPair, User};
use crate::state::auth::AuthStateCell;
use crate::state::session::Session;
use crate::util::storage::{KeyValueStore, StorageError};

use super::context::{CallbackContext, CallbackWindow};
use super::message::OAuthMessage;
use super::params::{CallbackParams, CallbackStyle};

/// Provider `error` value that stands for "the provider refused".
const OAUTH_ERROR_SENTINEL: &str = "oauth_error";

const MSG_INCOMPLETE: &str = "Authentification OAuth incomplète";
const MSG_MISSING_CODE: &str = "Code d'autorisation manquant";
const MSG_CALLBACK_FAILED: &str = "Échec de l'authentification OAuth";
const MSG_PROCESSING: &str = "Erreur lors du traitement de l'authentification";
const MSG_VERIFICATION: &str = "Impossible de récupérer les informations utilisateur";
const MSG_PROVIDER_GENERIC: &str = "Erreur d'authentification OAuth";
const MSG_PROVIDER_MISSING: &str = "Fournisseur OAuth manquant";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Resolving,
    Succeeded,
    Failed,
}

/// Why a callback failed, as a stable code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureReason {
    ProviderError,
    MissingCode,
    IncompleteData,
    CallbackFailed,
    ExchangeFailed,
    ProcessingError,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProviderError => "provider_error",
            Self::MissingCode => "missing_code",
            Self::IncompleteData => "incomplete_data",
            Self::CallbackFailed => "callback_failed",
            Self::ExchangeFailed => "exchange_failed",
            Self::ProcessingError => "processing_error",
        }
    }

    fn missing_message(self) -> &'static str {
        match self {
            Self::MissingCode => MSG_MISSING_CODE,
            Self::IncompleteData => MSG_INCOMPLETE,
            _ => MSG_CALLBACK_FAILED,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackResult {
    Success { user: User, tokens: TokenPair },
    Error { reason: FailureReason, message: String },
}

impl CallbackResult {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Success { .. } => Phase::Succeeded,
            Self::Error { .. } => Phase::Failed,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CallbackError {
    #[error("{0}")]
    Provider(String),
    #[error("{}", .0.missing_message())]
    MissingCredential(FailureReason),
    #[error("{0}")]
    Exchange(String),
    #[error("{0}")]
    Verification(String),
    #[error("{}", MSG_PROCESSING)]
    Unexpected(String),
}

impl CallbackError {
    fn reason(&self) -> FailureReason {
        match self {
            Self::Provider(_) => FailureReason::ProviderError,
            Self::MissingCredential(reason) => *reason,
            Self::Exchange(_) | Self::Verification(_) => FailureReason::ExchangeFailed,
            Self::Unexpected(_) => FailureReason::ProcessingError,
        }
    }

    /// Code exchange failed at the gateway.
    fn exchange(err: GatewayError) -> Self {
        match err {
            GatewayError::Decode(detail) => Self::Unexpected(detail),
            GatewayError::Unavailable => Self::Unexpected(GatewayError::Unavailable.to_string()),
            other => Self::Exchange(other.to_string()),
        }
    }

    /// `/api/auth/me` failed for freshly issued tokens.
    fn verification(err: GatewayError) -> Self {
        match err {
            GatewayError::Network(message) => Self::Verification(message),
            GatewayError::Rejected { .. } | GatewayError::Unauthorized => {
                Self::Verification(MSG_VERIFICATION.to_owned())
            }
            GatewayError::Decode(detail) => Self::Unexpected(detail),
            GatewayError::Unavailable => Self::Unexpected(GatewayError::Unavailable.to_string()),
        }
    }
}

impl From<StorageError> for CallbackError {
    fn from(err: StorageError) -> Self {
        Self::Unexpected(err.to_string())
    }
}

/// Message for a provider-reported `error` value.
pub fn provider_error_message(error: &str, provider: &str) -> String {
    let error = error.trim();
    if !error.is_empty() && error != OAUTH_ERROR_SENTINEL {
        return error.to_owned();
    }
    match provider.trim() {
        "" => MSG_PROVIDER_GENERIC.to_owned(),
        provider => format!("Erreur d'authentification avec {provider}"),
    }
}

/// Display name for a raw `{provider}` route segment.
pub fn callback_provider_label(raw: &str) -> String {
    match raw.parse::<Provider>() {
        Ok(provider) => provider.label().to_owned(),
        Err(_) if raw.trim().is_empty() => "OAuth".to_owned(),
        Err(_) => raw.trim().to_owned(),
    }
}

/// Login page URL carrying a failure message.
pub fn login_error_url(message: &str) -> String {
    format!("{LOGIN_ROUTE}?error={}", urlencoding::encode(message))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

/// One OAuth callback, from redirect parameters to completion.
pub struct Reconciler<'a, G, K, C, W> {
    provider: String,
    params: CallbackParams,
    session: &'a Session<G, K, C>,
    window: &'a W,
    phase: Phase,
}

impl<'a, G, K, C, W> Reconciler<'a, G, K, C, W>
where
    G: AuthGateway,
    K: KeyValueStore,
    C: AuthStateCell,
    W: CallbackWindow,
{
    /// `provider` is the raw `{provider}` route segment.
    pub fn new(provider: &str, params: CallbackParams, session: &'a Session<G, K, C>, window: &'a W) -> Self {
        Self { provider: provider.trim().to_owned(), params, session, window, phase: Phase::Pending }
    }

    fn advance(&mut self, next: Phase) {
        log::debug!("oauth: {:?} -> {next:?}", self.phase);
        self.phase = next;
    }

    /// Resolve the callback and complete it. Never fails; errors are part of
    /// the returned result.
    pub async fn run(mut self) -> CallbackResult {
        self.advance(Phase::Resolving);
        let context = CallbackContext::detect(self.window);
        log::info!("oauth: {} callback in {context} context", self.provider);

        let result = match self.resolve().await {
            Ok((user, tokens)) => CallbackResult::Success { user, tokens },
            Err(err) => {
                let reason = err.reason();
                match &err {
                    CallbackError::Unexpected(detail) => log::error!("oauth: {reason}: {detail}"),
                    _ => log::error!("oauth: {reason}: {err}"),
                }
                self.session.tokens().clear();
                CallbackResult::Error { reason, message: err.to_string() }
            }
        };
        self.advance(result.phase());
        self.complete(context, &result);
        result
    }

    async fn resolve(&self) -> Result<(User, TokenPair), CallbackError> {
        if let Some(error) = &self.params.error {
            return Err(CallbackError::Provider(provider_error_message(error, &self.provider)));
        }
        if self.provider.is_empty() {
            return Err(CallbackError::Provider(MSG_PROVIDER_MISSING.to_owned()));
        }
        let provider: Provider = self
            .provider
            .parse()
            .map_err(|_| CallbackError::Provider(format!("Fournisseur OAuth non pris en charge: {}", self.provider)))?;
        match self.params.style() {
            CallbackStyle::DirectToken => self.resolve_direct().await,
            CallbackStyle::AuthorizationCode => self.resolve_code(provider).await,
        }
    }

    async fn resolve_direct(&self) -> Result<(User, TokenPair), CallbackError> {
        let params = &self.params;
        let (Some(access_token), Some(refresh_token)) =
            (non_empty(params.access_token.as_deref()), non_empty(params.refresh_token.as_deref()))
        else {
            return Err(CallbackError::MissingCredential(FailureReason::IncompleteData));
        };
        if params.success.as_deref() != Some("true") {
            return Err(CallbackError::MissingCredential(FailureReason::IncompleteData));
        }
        let tokens = TokenPair { access_token, refresh_token };
        self.session.tokens().save(&tokens)?;
        let user = self
            .session
            .gateway()
            .current_user(&tokens.access_token)
            .await
            .map_err(CallbackError::verification)?;
        if let Some(expected) = params.user_id.as_deref().filter(|id| *id != user.id.to_string()) {
            log::warn!("oauth: redirect user_id {expected} differs from verified user {}", user.id);
        }
        Ok((user, tokens))
    }

    async fn resolve_code(&self, provider: Provider) -> Result<(User, TokenPair), CallbackError> {
        let code =
            non_empty(self.params.code.as_deref()).ok_or(CallbackError::MissingCredential(FailureReason::MissingCode))?;
        let response = self
            .session
            .gateway()
            .exchange_code(provider, &code)
            .await
            .map_err(CallbackError::exchange)?;
        let (Some(user), Some(access_token), Some(refresh_token)) = (
            response.user,
            non_empty(response.access_token.as_deref()),
            non_empty(response.refresh_token.as_deref()),
        ) else {
            return Err(CallbackError::MissingCredential(FailureReason::CallbackFailed));
        };
        let tokens = TokenPair { access_token, refresh_token };
        self.session.tokens().save(&tokens)?;
        Ok((user, tokens))
    }

    fn complete(&self, context: CallbackContext, result: &CallbackResult) {
        match context {
            CallbackContext::Popup => {
                let message = match result {
                    CallbackResult::Success { user, tokens } => OAuthMessage::success(user, tokens),
                    CallbackResult::Error { message, .. } => OAuthMessage::Error { error: message.clone() },
                };
                let origin = self.window.origin();
                if let Err(e) = self.window.post_to_opener(&message, &origin) {
                    log::error!("oauth: could not notify opener: {e}");
                }
                self.window.close();
            }
            CallbackContext::Standalone => match result {
                CallbackResult::Success { user, .. } => {
                    self.session.set_user(Some(user.clone()));
                    self.session.set_authenticated(true);
                    self.window.navigate(DASHBOARD_ROUTE);
                }
                CallbackResult::Error { message, .. } => {
                    self.window.navigate(&login_error_url(message));
                }
            },
        }
    }
}
