//! Error types for the core engines.
//!
//! Only conditions that abort a whole operation are errors. Records that
//! cannot be normalised are dropped and counted in a
//! [`LoadReport`](crate::corpus::LoadReport) instead.

use std::path::PathBuf;

/// A load was aborted. No partial corpus is produced.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A filter could not be constructed from user input.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("cannot parse {bound} bound {value:?} as a timestamp")]
    InvalidBound { bound: &'static str, value: String },
}

/// Writing an export artifact failed.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write export to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize records")]
    Serialize(#[from] serde_json::Error),
}
