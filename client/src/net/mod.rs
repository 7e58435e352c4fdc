//! Networking modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` defines the [`api::AuthGateway`] seam and its HTTP implementation,
//! and `types` defines the shared wire schema.

pub mod api;
pub mod types;

#[cfg(test)]
pub(crate) mod fake_gateway;
