//! Ratatui widgets for the hitline TUI.

pub mod command_bar;
pub mod details;
pub mod help;
pub mod query_bar;
pub mod status_bar;
pub mod timeline;
