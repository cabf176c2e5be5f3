//! UI rendering module for the TUI application.
//!
//! Components with their layout and hit testing, plus the event loop that
//! ties them together.

pub mod animation;
pub mod components;
pub mod dismiss;
pub mod focus;
pub mod keyboard;
pub mod layout;
pub mod main_component;
pub mod runtime;
pub mod theme;
pub mod utils;
