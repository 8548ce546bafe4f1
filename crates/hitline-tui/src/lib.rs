//! hitline TUI: ratatui application shell.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use hitline_core::{config::Config, ViewerState};

/// Start the TUI over an already loaded corpus.
pub fn run(viewer: ViewerState, source_name: String, config: Config) -> anyhow::Result<()> {
    let theme = theme::Theme::by_name(&config.ui.theme);
    tracing::info!(
        records = viewer.corpus().len(),
        source = %source_name,
        theme = %config.ui.theme,
        "starting tui"
    );
    App::new(viewer, source_name, config, theme).run()
}
