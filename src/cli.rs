//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "hitline",
    about = "Timeline viewer and boolean search for exported pipe-delimited logs"
)]
pub struct Cli {
    /// JSON export to open. Reads stdin when omitted.
    pub file: Option<PathBuf>,

    /// Write debug logs to a file (tail -f to inspect).
    #[arg(long)]
    pub debug: bool,

    /// Debug log destination.
    #[arg(long, default_value = "/tmp/hitline-debug.log")]
    pub log_file: PathBuf,

    /// Print a summary and one line per record instead of starting the TUI.
    #[arg(long)]
    pub headless: bool,

    /// Search query, e.g. `(alice OR bob) AND "payment failed"`.
    #[arg(long, short)]
    pub query: Option<String>,

    /// Start of the time range (inclusive).
    #[arg(long)]
    pub from: Option<String>,

    /// End of the time range (inclusive).
    #[arg(long)]
    pub to: Option<String>,

    /// Show only matching records.
    #[arg(long)]
    pub only_matches: bool,

    /// Export the resulting view as JSON into this directory.
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
}

impl Cli {
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            query: self.query.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            only_matches: self.only_matches,
        }
    }

    /// Name shown in the status bar and headless header.
    pub fn source_name(&self) -> String {
        self.file
            .as_ref()
            .and_then(|p| p.file_name())
            .map_or_else(|| "stdin".to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// Initial filter and search applied right after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub query: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub only_matches: bool,
}
