//! Help popup: centred floating overlay listing all keybindings and
//! commands.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

const BINDINGS: &[(&str, &str)] = &[
    ("q  /  Ctrl+c", "Quit"),
    ("/", "Focus search bar (Enter submits)"),
    ("Tab", "Toggle focus: timeline ↔ search"),
    ("Escape", "Close popup / leave search / clear selection"),
    ("n →  /  p ←", "Next / previous match"),
    ("h  /  l", "Scroll one slot left / right"),
    ("PageUp / PageDown", "Scroll one screen"),
    ("g  /  G", "Jump to start / end"),
    ("j ↓  /  k ↑", "Select next / previous record"),
    ("m", "Toggle only-matches view"),
    ("e", "Export view to ./logs-export-*.json"),
    ("?", "Toggle this help popup"),
    ("", ""),
    (":from <ts>  :to <ts>", "Set time-range bound (blank clears)"),
    (":filter", "Apply time range and query as a filter"),
    (":reset", "Clear filter, search and matches"),
    (":goto <n>", "Jump to match n (1-based)"),
    (":only", "Toggle only-matches view"),
    (":export [dir]", "Export view into dir"),
    (":theme <name>", "default | gruvbox"),
];

pub struct HelpPopup<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(80, BINDINGS.len() as u16 + 2, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" hitline keybindings (? to close) ")
            .border_style(self.theme.border_focused.add_modifier(Modifier::BOLD));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines: Vec<Line> = BINDINGS
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!("  {:<24}", key),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*desc),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
