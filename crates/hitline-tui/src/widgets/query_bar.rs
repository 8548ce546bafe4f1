//! Query bar widget: search input plus match counter at the bottom of the screen.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` deletes the character before the cursor.
//! - `CursorLeft` / `CursorRight` move the cursor.
//!
//! `Enter` is handled by the app shell, which submits the text as a search.

use crate::event::AppEvent;
use crate::theme::Theme;
use hitline_core::ViewerState;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct QueryBarState {
    /// The search expression typed by the user.
    pub query: String,
    /// Byte offset of the cursor within `query`.
    pub cursor: usize,
}

impl QueryBarState {
    /// Replace the text and park the cursor at the end.
    pub fn set(&mut self, query: &str) {
        self.query = query.to_string();
        self.cursor = self.query.len();
    }

    /// Handle a text-editing event from the app shell; all other events are
    /// ignored.
    pub fn handle(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Char(c) => {
                self.query.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                tracing::debug!(query = %self.query, cursor = self.cursor, "query: char inserted");
            }
            AppEvent::Backspace => {
                if self.cursor > 0 {
                    // Walk back one char boundary
                    let prev = self.query[..self.cursor]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    self.query.remove(prev);
                    self.cursor = prev;
                    tracing::debug!(query = %self.query, cursor = self.cursor, "query: backspace");
                }
            }
            AppEvent::CursorLeft => {
                if self.cursor > 0 {
                    self.cursor = self.query[..self.cursor]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                }
            }
            AppEvent::CursorRight => {
                if self.cursor < self.query.len() {
                    self.cursor = self.query[self.cursor..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor + i)
                        .unwrap_or(self.query.len());
                }
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct QueryBar<'a> {
    state: &'a QueryBarState,
    viewer: &'a ViewerState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> QueryBar<'a> {
    pub fn new(
        state: &'a QueryBarState,
        viewer: &'a ViewerState,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self { state, viewer, focused, theme }
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        // The block adds 1-cell borders; text starts at (area.x+1, area.y+1).
        let col = self.state.query[..self.state.cursor].chars().count() as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(1));
        let y = area.y + 1;
        (x, y)
    }
}

/// `"2 of 7 · all"`, `"no matches"`, or empty before any search.
pub fn match_summary(viewer: &ViewerState) -> String {
    if viewer.filter().search_query.trim().is_empty() {
        return String::new();
    }
    let matches = viewer.matches();
    if matches.is_empty() {
        return "no matches".to_string();
    }
    let current = matches.current().map_or(0, |c| c + 1);
    let mode = if matches.show_only_matches() { "only matches" } else { "all" };
    format!("{current} of {} · {mode}", matches.len())
}

impl Widget for QueryBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered()
            .title("Search")
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        // Split inner area: query text (fill) | match counter (fixed width)
        let chunks = Layout::default()
            .direction(LayoutDir::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(26)])
            .split(inner);

        let query_line = if self.state.query.is_empty() && !self.focused {
            Line::from(Span::styled(
                "press / to search: (alice AND nav) OR \"verifyPayment\"",
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            Line::from(self.state.query.as_str())
        };
        Paragraph::new(query_line).render(chunks[0], buf);

        let summary = match_summary(self.viewer);
        Paragraph::new(Line::from(Span::styled(summary, self.theme.label)).right_aligned())
            .render(chunks[1], buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
