//! Where the callback page is running and the window operations it needs.
//!
//! DESIGN
//! ======
//! [`CallbackWindow`] is the only way the reconciler reaches the browser, so
//! completion can be observed with a recording fake in native tests.
//! [`BrowserWindow`] is inert outside the browser.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::fmt;

#[cfg(feature = "hydrate")]
use wasm_bindgen::{JsCast, JsValue};

use super::message::OAuthMessage;

/// Completion path for a callback: talk to the window that opened us, or
/// finish in this tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackContext {
    Popup,
    Standalone,
}

impl CallbackContext {
    /// `Popup` iff an opener exists and is not this window.
    pub fn detect(window: &impl CallbackWindow) -> Self {
        if window.has_distinct_opener() { Self::Popup } else { Self::Standalone }
    }
}

impl fmt::Display for CallbackContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Popup => "popup",
            Self::Standalone => "standalone",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("no browser window")]
    NoWindow,
    #[error("window has no opener")]
    NoOpener,
    #[error("could not encode message: {0}")]
    Encode(String),
    #[error("browser rejected the call: {0}")]
    Js(String),
}

/// Browser window operations used to finish a callback.
pub trait CallbackWindow {
    fn has_distinct_opener(&self) -> bool;

    /// `location.origin` of this page.
    fn origin(&self) -> String;

    /// # Errors
    ///
    /// Returns an error if there is no opener or the browser refuses the post.
    fn post_to_opener(&self, message: &OAuthMessage, target_origin: &str) -> Result<(), WindowError>;

    fn close(&self);

    /// Replace the current history entry with `url`.
    fn navigate(&self, url: &str);
}

/// The real `window`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserWindow;

#[cfg(feature = "hydrate")]
fn js_error(value: &JsValue) -> WindowError {
    WindowError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

#[cfg(feature = "hydrate")]
fn live_opener(window: &web_sys::Window) -> Option<JsValue> {
    window.opener().ok().filter(|opener| !opener.is_null() && !opener.is_undefined())
}

impl CallbackWindow for BrowserWindow {
    fn has_distinct_opener(&self) -> bool {
        #[cfg(feature = "hydrate")]
        {
            let Some(window) = web_sys::window() else {
                return false;
            };
            live_opener(&window).is_some_and(|opener| !js_sys::Object::is(&opener, &window))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            false
        }
    }

    fn origin(&self) -> String {
        #[cfg(feature = "hydrate")]
        {
            web_sys::window()
                .and_then(|w| w.location().origin().ok())
                .unwrap_or_default()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            String::new()
        }
    }

    fn post_to_opener(&self, message: &OAuthMessage, target_origin: &str) -> Result<(), WindowError> {
        #[cfg(feature = "hydrate")]
        {
            let window = web_sys::window().ok_or(WindowError::NoWindow)?;
            let opener: web_sys::Window = live_opener(&window).ok_or(WindowError::NoOpener)?.unchecked_into();
            let json = message.to_json().map_err(|e| WindowError::Encode(e.to_string()))?;
            let payload = js_sys::JSON::parse(&json).map_err(|e| js_error(&e))?;
            opener.post_message(&payload, target_origin).map_err(|e| js_error(&e))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (message, target_origin);
            Err(WindowError::NoWindow)
        }
    }

    fn close(&self) {
        #[cfg(feature = "hydrate")]
        if let Some(Err(e)) = web_sys::window().map(|w| w.close()) {
            log::warn!("oauth: window.close failed: {}", js_error(&e));
        }
    }

    fn navigate(&self, url: &str) {
        #[cfg(feature = "hydrate")]
        if let Some(Err(e)) = web_sys::window().map(|w| w.location().replace(url)) {
            log::error!("oauth: navigation to {url} failed: {}", js_error(&e));
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = url;
    }
}
