//! Popup-to-opener message schema.
//!
//! The JSON shape is `{ "type": "OAUTH_SUCCESS", access_token, refresh_token,
//! user }` or `{ "type": "OAUTH_ERROR", error }`.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use serde::{Deserialize, Serialize};

use crate::net::types::{TokenPair, User};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OAuthMessage {
    #[serde(rename = "OAUTH_SUCCESS")]
    Success { access_token: String, refresh_token: String, user: User },
    #[serde(rename = "OAUTH_ERROR")]
    Error { error: String },
}

impl OAuthMessage {
    pub fn success(user: &User, tokens: &TokenPair) -> Self {
        Self::Success {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            user: user.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the message cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a posted payload; anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
