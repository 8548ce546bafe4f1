//! Status bar: the 1-line strip at the top of the screen.
//!
//! Left: source name, `view of corpus` record counts, and the time span of
//! the current view. The last status message (export path, command error,
//! load diagnostics) follows. Keybinding hints are right-aligned.

use crate::theme::Theme;
use hitline_core::{present::TimeSpan, ViewerState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub struct StatusBar<'a> {
    source: &'a str,
    viewer: &'a ViewerState,
    message: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        source: &'a str,
        viewer: &'a ViewerState,
        message: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        Self { source, viewer, message, theme }
    }
}

/// `"12:00:01.000 → 12:00:09.500 (8.5s)"` for the records in view.
pub fn span_summary(viewer: &ViewerState) -> Option<String> {
    let span = TimeSpan::of(viewer.records_in_view())?;
    Some(format!(
        "{} → {} ({:.1}s)",
        span.start.format("%Y-%m-%d %H:%M:%S%.3f"),
        span.end.format("%H:%M:%S%.3f"),
        span.duration_secs()
    ))
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.source),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} of {} ", self.viewer.view().len(), self.viewer.corpus().len()),
                self.theme.label,
            ),
        ];
        if let Some(span) = span_summary(self.viewer) {
            spans.push(Span::styled(format!(" {span} "), self.theme.label));
        }
        if let Some(message) = self.message {
            spans.push(Span::raw(format!(" {message}")));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        // Keybinding hints at the right edge
        let hint = " q:quit  ?:help ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}
