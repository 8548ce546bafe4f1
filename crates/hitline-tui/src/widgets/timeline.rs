//! Timeline widget: the horizontally scrolling pane of record boxes.
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `h` / `l` | Scroll one slot left / right |
//! | `PageUp` / `PageDown` | Scroll one viewport |
//! | `g` / `G` | Jump to the start / end of the track |
//!
//! # Coordinates
//!
//! `scroll` is measured in layout units, the same space as
//! [`TimelineLayout::pixel_of`]. One terminal column covers
//! `units_per_column` units. Each lane is [`LANE_HEIGHT`] rows tall.

use std::cell::Cell;

use crate::event::AppEvent;
use crate::theme::Theme;
use hitline_core::{layout::TimelineLayout, present, ViewerState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{
        Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

/// Width of a record box in columns.
pub const BOX_WIDTH: u16 = 14;
/// Rows per lane: label, time, date.
pub const LANE_HEIGHT: u16 = 3;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct TimelineState {
    /// Left edge of the viewport in layout units.
    pub scroll: u64,
    pub units_per_column: u64,
    /// Cached from the last render so `handle()` knows the viewport width.
    last_width: Cell<u16>,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self::new(10)
    }
}

impl TimelineState {
    pub fn new(units_per_column: u64) -> Self {
        Self {
            scroll: 0,
            units_per_column: units_per_column.max(1),
            last_width: Cell::new(80),
        }
    }

    /// Viewport width in layout units.
    pub fn viewport(&self) -> u64 {
        u64::from(self.last_width.get().max(1)) * self.units_per_column
    }

    /// Centre the viewport on the record at view position `index`.
    pub fn center_on(&mut self, layout: &TimelineLayout, index: usize) {
        let viewport = self.viewport();
        if let Some(offset) = layout.scroll_offset_for(index, viewport) {
            self.scroll = offset.min(layout.max_scroll_offset(viewport));
            tracing::debug!(index, scroll = self.scroll, "timeline: centred");
        }
    }

    /// Handle a scrolling event from the app shell.
    pub fn handle(&mut self, event: &AppEvent, layout: &TimelineLayout) {
        let viewport = self.viewport();
        let max = layout.max_scroll_offset(viewport);
        let step = layout.params().spacing;

        self.scroll = match event {
            AppEvent::ScrollLeft => self.scroll.saturating_sub(step),
            AppEvent::ScrollRight => (self.scroll + step).min(max),
            AppEvent::PageLeft => self.scroll.saturating_sub(viewport),
            AppEvent::PageRight => (self.scroll + viewport).min(max),
            AppEvent::ScrollToStart => 0,
            AppEvent::ScrollToEnd => max,
            _ => return,
        };
        tracing::debug!(scroll = self.scroll, max, "timeline: scrolled");
    }

    /// Column offset of a layout pixel relative to the viewport, or `None`
    /// when a box starting there would be entirely off-screen to the left.
    fn column_of(&self, pixel: u64) -> Option<i64> {
        let col = (pixel as i64 - self.scroll as i64) / self.units_per_column as i64;
        (col + i64::from(BOX_WIDTH) > 0).then_some(col)
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct Timeline<'a> {
    state: &'a TimelineState,
    viewer: &'a ViewerState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> Timeline<'a> {
    pub fn new(
        state: &'a TimelineState,
        viewer: &'a ViewerState,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self { state, viewer, focused, theme }
    }

    fn box_style(&self, record: usize) -> Style {
        let corpus = self.viewer.corpus();
        let base = match (corpus.get(record), corpus.haystack(record)) {
            (Some(r), Some(hay)) => self.theme.category_style(present::category_in(r, hay)),
            _ => Style::default(),
        };
        let matches = self.viewer.matches();
        if self.viewer.selected() == Some(record) {
            base.patch(self.theme.selected)
        } else if matches.current_record() == Some(record) {
            base.patch(self.theme.current_match)
        } else if matches.contains(record) {
            base.patch(self.theme.matched)
        } else {
            base
        }
    }
}

impl Widget for Timeline<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered().title("Timeline").border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        // Cache for handle(); draw always runs before handle()
        self.state.last_width.set(inner.width);

        if self.viewer.view().is_empty() {
            let msg = if self.viewer.corpus().is_empty() {
                "no records loaded"
            } else {
                "no records in view (:reset to clear the filter)"
            };
            Paragraph::new(Line::from(msg).centered())
                .style(Style::default().add_modifier(Modifier::DIM))
                .render(inner, buf);
            return;
        }

        // Bottom row: axis + horizontal scrollbar.
        let track = Rect { height: inner.height.saturating_sub(1), ..inner };
        let axis_y = inner.bottom().saturating_sub(1);
        for x in inner.left()..inner.right() {
            buf[(x, axis_y)].set_symbol("─").set_style(self.theme.axis);
        }

        let layout = self.viewer.layout();
        let viewport = self.state.viewport();
        let window = layout.visible_window(self.state.scroll, viewport);

        for index in window.start..window.end {
            let (Some(pixel), Some(lane), Some(&record)) = (
                layout.pixel_of(index),
                layout.lane_of(index),
                self.viewer.view().get(index),
            ) else {
                continue;
            };
            let Some(col) = self.state.column_of(pixel) else {
                continue;
            };
            if col >= i64::from(track.width) {
                continue;
            }
            let top = lane as u16 * LANE_HEIGHT;
            if top + LANE_HEIGHT > track.height {
                continue;
            }
            let Some(r) = self.viewer.corpus().get(record) else {
                continue;
            };

            let style = self.box_style(record);
            let rows = [
                (present::label(r), style.add_modifier(Modifier::BOLD)),
                (present::format_time(&r.timestamp).to_string(), style),
                (present::format_date(&r.timestamp).to_string(), self.theme.label),
            ];
            draw_box(buf, track, col, track.y + top, &rows);

            if col >= 0 {
                let x = track.x + col as u16;
                buf[(x, axis_y)].set_symbol("┴").set_style(self.theme.axis);
            }
        }

        let max = layout.max_scroll_offset(viewport);
        if max > 0 {
            let mut sb_state = ScrollbarState::new(max as usize)
                .position(self.state.scroll as usize)
                .viewport_content_length(viewport as usize);
            StatefulWidget::render(
                Scrollbar::new(ScrollbarOrientation::HorizontalBottom)
                    .begin_symbol(None)
                    .end_symbol(None),
                Rect { y: axis_y, height: 1, ..inner },
                buf,
                &mut sb_state,
            );
        }
    }
}

/// Draw up to three text rows starting at column `col` of `track`, clipped on
/// both sides.
fn draw_box(buf: &mut Buffer, track: Rect, col: i64, y: u16, rows: &[(String, Style)]) {
    let skip = (-col).max(0) as usize;
    let x = track.x + col.max(0) as u16;
    let room = track.right().saturating_sub(x).min(BOX_WIDTH - skip as u16);
    for (offset, (text, style)) in rows.iter().enumerate() {
        let text: String = text
            .chars()
            .take(usize::from(BOX_WIDTH) - 1)
            .skip(skip)
            .collect();
        buf.set_stringn(x, y + offset as u16, text, usize::from(room), *style);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
