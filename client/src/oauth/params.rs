//! Query parameters of an OAuth provider redirect.

#[cfg(test)]
#[path = "params_test.rs"]
mod params_test;

/// How the backend handed over the outcome of the provider round-trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackStyle {
    /// Backend already exchanged the code and put tokens in the query.
    DirectToken,
    /// Provider sent an authorization code the client must exchange.
    AuthorizationCode,
}

/// Recognized redirect parameters. Unknown keys are ignored and the first
/// occurrence of a repeated key wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_id: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub code: Option<String>,
}

impl CallbackParams {
    /// Parse a `location.search` string, with or without the leading `?`.
    pub fn from_query(search: &str) -> Self {
        let mut params = Self::default();
        let query = search.strip_prefix('?').unwrap_or(search);
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "access_token" => &mut params.access_token,
                "refresh_token" => &mut params.refresh_token,
                "user_id" => &mut params.user_id,
                "success" => &mut params.success,
                "error" => &mut params.error,
                "code" => &mut params.code,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// The presence of a `code` key, even an empty one, selects the
    /// authorization-code style.
    pub fn style(&self) -> CallbackStyle {
        if self.code.is_some() { CallbackStyle::AuthorizationCode } else { CallbackStyle::DirectToken }
    }
}
