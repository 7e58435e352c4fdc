//! Reusable UI components for the dashboard shell.

pub mod navbar;
pub mod sidebar;
