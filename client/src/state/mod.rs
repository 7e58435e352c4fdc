//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `auth` holds the reactive session snapshot, `session` the operations that
//! mutate it, and `geography` the dashboard sidebar filters.

pub mod auth;
pub mod geography;
pub mod session;
