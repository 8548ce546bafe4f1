//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        details::Details,
        help::HelpPopup,
        query_bar::{QueryBar, QueryBarState},
        status_bar::StatusBar,
        timeline::{Timeline, TimelineState},
    },
};
use chrono::Utc;
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use hitline_core::{config::Config, export, Action, ViewerState};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use std::{io, path::PathBuf, time::Duration};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Timeline,
    QueryBar,
    /// Vim-style `:` command line is active.
    Command,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub viewer: ViewerState,
    pub timeline: TimelineState,
    pub query: QueryBarState,
    pub command_bar: CommandBarState,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    pub quit: bool,
    /// Last status message shown in the status bar.
    pub status: Option<String>,
    /// File name (or `stdin`) the corpus was loaded from.
    pub source_name: String,
}

impl AppState {
    pub fn new(viewer: ViewerState, source_name: String, config: Config, theme: Theme) -> Self {
        let report = viewer.corpus().report();
        let status = (report.skipped() > 0).then(|| {
            format!(
                "skipped {} of {} hits ({} without message, {} without timestamp)",
                report.skipped(),
                report.total_hits,
                report.skipped_no_message,
                report.skipped_no_timestamp
            )
        });
        Self {
            viewer,
            timeline: TimelineState::new(config.timeline.units_per_column),
            query: QueryBarState::default(),
            command_bar: CommandBarState::default(),
            focus: Focus::Timeline,
            prev_focus: Focus::Timeline,
            theme,
            config,
            show_help: false,
            quit: false,
            status,
            source_name,
        }
    }

    /// Run an [`Action`] through the viewer reducer and follow its scroll
    /// target.
    pub fn dispatch(&mut self, action: Action) {
        let viewer = std::mem::take(&mut self.viewer);
        let transition = viewer.apply(action);
        self.viewer = transition.state;
        if let Some(position) = transition.scroll_to {
            self.timeline.center_on(self.viewer.layout(), position);
        }
    }

    /// Write the current view into `dir` and report the outcome in the
    /// status bar.
    pub fn export(&mut self, dir: PathBuf) {
        let result = export::write_export(&dir, self.viewer.records_in_view(), Utc::now());
        self.status = Some(match result {
            Ok(path) => format!("exported {} records to {}", self.viewer.view().len(), path.display()),
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                e.to_string()
            }
        });
    }

    /// Move the selection by `delta` positions within the view. With nothing
    /// selected, the first record of the view is selected.
    fn select_relative(&mut self, delta: isize) {
        let len = self.viewer.view().len();
        if len == 0 {
            return;
        }
        let current = self
            .viewer
            .selected()
            .and_then(|record| self.viewer.view_position(record));
        let next = match current {
            Some(p) => p.saturating_add_signed(delta).min(len - 1),
            None => 0,
        };
        self.dispatch(Action::Select(Some(next)));
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
}

impl App {
    pub fn new(viewer: ViewerState, source_name: String, config: Config, theme: Theme) -> Self {
        App {
            state: AppState::new(viewer, source_name, config, theme),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key)
                        if key.kind == crossterm::event::KeyEventKind::Press =>
                    {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(
                                focus = ?self.state.focus,
                                event = ?ev,
                                "key event"
                            );
                            self.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn handle(&mut self, event: AppEvent) {
        let s = &mut self.state;

        // Help popup intercepts all events; only close keys pass through.
        if s.show_help {
            match event {
                AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                    tracing::debug!("help popup closed");
                    s.show_help = false;
                }
                _ => {}
            }
            return;
        }

        // Command mode intercepts all events.
        if s.focus == Focus::Command {
            match event {
                AppEvent::Escape => {
                    tracing::debug!("command bar cancelled");
                    s.command_bar.clear();
                    s.focus = s.prev_focus;
                }
                AppEvent::Enter => {
                    let input = s.command_bar.input.clone();
                    match Command::parse(&input) {
                        Ok(cmd) => {
                            tracing::debug!(command = ?cmd, "executing command");
                            s.command_bar.clear();
                            s.focus = s.prev_focus;
                            execute_command(s, cmd);
                        }
                        Err(msg) if msg.is_empty() => {
                            // Empty input closes the bar
                            s.command_bar.clear();
                            s.focus = s.prev_focus;
                        }
                        Err(msg) => {
                            // Show the error; bar stays open
                            s.command_bar.error = Some(msg);
                        }
                    }
                }
                AppEvent::Quit => s.quit = true,
                other => s.command_bar.handle(&other),
            }
            return;
        }

        // Search input
        if s.focus == Focus::QueryBar {
            match event {
                AppEvent::Enter => {
                    tracing::info!(query = %s.query.query, "search submitted");
                    s.dispatch(Action::SetQuery(s.query.query.clone()));
                    s.dispatch(Action::SubmitSearch);
                    s.status = None;
                    s.focus = Focus::Timeline;
                }
                AppEvent::Escape | AppEvent::FocusNext => {
                    tracing::debug!("focus: QueryBar -> Timeline");
                    s.focus = Focus::Timeline;
                }
                AppEvent::Quit => s.quit = true,
                AppEvent::Resize(_, _) => {}
                other => s.query.handle(&other),
            }
            return;
        }

        match event {
            AppEvent::Char('?') => {
                tracing::debug!("help popup opened");
                s.show_help = true;
            }

            // Enter command mode with `:`
            AppEvent::Char(':') => {
                tracing::debug!(prev_focus = ?s.focus, "entering command mode");
                s.prev_focus = s.focus;
                s.command_bar.clear();
                s.focus = Focus::Command;
            }

            AppEvent::Quit => {
                tracing::debug!("quit");
                s.quit = true;
            }

            AppEvent::Escape => s.dispatch(Action::Select(None)),

            AppEvent::FocusNext | AppEvent::QueryFocus => {
                tracing::debug!("focus -> QueryBar");
                s.focus = Focus::QueryBar;
            }

            AppEvent::NextMatch => s.dispatch(Action::NextMatch),
            AppEvent::PreviousMatch => s.dispatch(Action::PreviousMatch),
            AppEvent::ToggleOnlyMatches => s.dispatch(Action::ToggleShowOnlyMatches),
            AppEvent::SelectNext => s.select_relative(1),
            AppEvent::SelectPrevious => s.select_relative(-1),
            AppEvent::Export => s.export(PathBuf::from(".")),

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}

            other => s.timeline.handle(&other, s.viewer.layout()),
        }
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::QueryBar | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 1-line status bar | body | 3-line query bar
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .split(area);

    // Body: timeline above, details below
    let (timeline_area, details_area) = if state.config.ui.show_details {
        let pct = state.config.ui.details_pane_height_pct.min(90);
        let body = Layout::default()
            .direction(LayoutDir::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Percentage(pct)])
            .split(vert[1]);
        (body[0], Some(body[1]))
    } else {
        (vert[1], None)
    };

    frame.render_widget(
        StatusBar::new(&state.source_name, &state.viewer, state.status.as_deref(), &state.theme),
        vert[0],
    );
    frame.render_widget(
        Timeline::new(
            &state.timeline,
            &state.viewer,
            state.focus == Focus::Timeline,
            &state.theme,
        ),
        timeline_area,
    );
    if let Some(details_area) = details_area {
        frame.render_widget(Details::new(&state.viewer, &state.theme), details_area);
    }
    frame.render_widget(
        QueryBar::new(
            &state.query,
            &state.viewer,
            state.focus == Focus::QueryBar,
            &state.theme,
        ),
        vert[2],
    );

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom() - 1, height: 1, ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return; // cursor is set; skip query-bar cursor below
    }

    // Position the terminal cursor when the query bar is focused
    if state.focus == Focus::QueryBar {
        let qb = QueryBar::new(&state.query, &state.viewer, true, &state.theme);
        let (cx, cy) = qb.cursor_position(vert[2]);
        frame.set_cursor_position((cx, cy));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
