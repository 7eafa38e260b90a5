//! UI modules for the trip explorer.

pub mod app_shell;
pub mod charts;
pub mod constants;
pub mod controls;
pub mod dashboard;
pub mod map_panel;
pub mod utils;
