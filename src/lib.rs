//! hitline: time-ordered timeline viewer for exported logs.
//!
//! The binary glues the pieces together: [`cli`] parses arguments,
//! [`session`] reads input and builds the initial
//! [`ViewerState`](hitline_core::ViewerState), and either [`headless`]
//! prints it or the TUI takes over.
//!
//! # Architecture
//!
//! ```text
//! file / stdin ──► session ──► ViewerState ──┬──► hitline-tui
//!                                            ├──► headless report
//!                                            └──► export
//! ```

pub mod cli;
pub mod headless;
pub mod session;
