//! hitline-core: engines behind the hitline log timeline.
//!
//! This crate exposes each engine as a public module, plus the shared record
//! type used across all of them.
//!
//! # Architecture
//!
//! ```text
//! JSON text ──► Normalizer ──► Corpus ──► Query / Navigator ──┐
//!                                 │                           ├──► ViewerState ──► front-end
//!                                 └──────► Layout ────────────┘
//!                                 └──────► Export
//! ```
//!
//! Everything is single-threaded. The only suspension point is
//! [`Corpus::load_async`], which yields between normalisation chunks.

pub mod config;
pub mod corpus;
pub mod error;
pub mod export;
pub mod layout;
pub mod navigator;
pub mod normalizer;
pub mod present;
pub mod query;
pub mod state;
pub mod types;

pub use corpus::{Corpus, FilterState, LoadReport, TimeRange};
pub use error::{ExportError, FilterError, LoadError};
pub use layout::{TimelineLayout, TimelineParams, VisibleWindow};
pub use navigator::{MatchState, NavTarget};
pub use query::{evaluate, extract_terms, Query};
pub use state::{Action, Transition, ViewerState};
pub use types::{LineFields, LogRecord, RecordFormat};
