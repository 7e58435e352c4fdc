//! OAuth provider sign-in.
//!
//! SYSTEM CONTEXT
//! ==============
//! `reconciler` runs on `/auth/callback/{provider}` and turns the redirect
//! into a session, either by messaging the window that opened the popup or
//! by navigating this tab. `opener` is the login page's half of the popup
//! exchange.

pub mod context;
pub mod message;
pub mod opener;
pub mod params;
pub mod reconciler;

#[cfg(test)]
pub(crate) mod fake_window;
