//! UI rendering module for shiplog
//!
//! This module contains all the rendering logic for the terminal user
//! interface, using the ratatui library for TUI components.

pub mod confirm_clear;
pub mod help_overlay;
pub mod journal;

pub use confirm_clear::render as render_confirm_clear;
pub use help_overlay::render as render_help_overlay;
pub use journal::render_journal;
