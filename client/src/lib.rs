//! # client
//!
//! Leptos + WASM frontend for the EcoWatch environmental monitoring dashboard.
//!
//! This crate contains pages, components, application state, the backend
//! auth gateway, and the OAuth callback reconciler that turns provider
//! redirects into an authenticated session.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod oauth;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: installs browser logging and hydrates the SSR markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"console logger already installed".into());
    }
    leptos::mount::hydrate_body(app::App);
}
