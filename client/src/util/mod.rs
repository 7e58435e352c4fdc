//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, token
//! clock, route guards) from page and component logic.

pub mod auth;
pub mod storage;
pub mod token;
pub mod validation;

#[cfg(test)]
pub(crate) mod memory_store;
