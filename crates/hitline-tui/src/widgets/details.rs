//! Details pane: everything known about the selected record.
//!
//! Sections, top to bottom: summary fields, the raw message with embedded
//! JSON collapsed and search terms highlighted, the parsed payload, then
//! source metadata and the record's full JSON.

use crate::theme::Theme;
use hitline_core::{present, query, LogRecord, ViewerState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

pub struct Details<'a> {
    viewer: &'a ViewerState,
    theme: &'a Theme,
}

impl<'a> Details<'a> {
    pub fn new(viewer: &'a ViewerState, theme: &'a Theme) -> Self {
        Self { viewer, theme }
    }
}

impl Widget for Details<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(record) = self.viewer.selected_record() else {
            let block = Block::bordered()
                .title("Details")
                .border_style(self.theme.border_unfocused);
            Paragraph::new(Line::from(Span::styled(
                "no record selected (j/k to select, n/p to jump between matches)",
                Style::default().add_modifier(Modifier::DIM),
            )))
            .block(block)
            .render(area, buf);
            return;
        };

        let title = match record.hit_index {
            Some(i) => format!("Details · hit {i} · {}", record.format),
            None => format!("Details · {}", record.format),
        };
        let block = Block::bordered()
            .title(title)
            .border_style(self.theme.border_unfocused);

        let terms = query::extract_terms(&self.viewer.filter().search_query);
        let lines = detail_lines(record, &terms, self.theme);

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// Build the pane's text for one record.
pub fn detail_lines(record: &LogRecord, terms: &[String], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let line = &record.line;
    let summary = [
        ("time", Some(record.timestamp.as_str())),
        ("service", record.attr("service")),
        ("level", record.attr("level")),
        ("type", record.attr("type")),
        ("tag", record.attr("tag")),
        ("url", record.attr("url")),
        ("origin", line.origin.as_deref()),
        ("device", line.device_id.as_deref()),
        ("session", line.session_id.as_deref()),
        ("request", line.request_id.as_deref()),
        ("trace", line.trace_id.as_deref()),
        ("span", line.span_id.as_deref()),
        ("cart", line.cart_id.as_deref()),
        ("pod", line.pod.as_deref()),
        ("path", record.path.as_deref()),
    ];
    for (name, value) in summary {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let mut line = field_line(name, value, theme);
            if name == "service" {
                line.spans[1].style = theme.service_style(value);
            }
            lines.push(line);
        }
    }

    if let Some(message) = record.raw_message.as_deref() {
        lines.push(Line::default());
        lines.push(heading("message"));
        let stripped = present::strip_json(message);
        lines.push(highlighted(&stripped, terms, theme));
    }

    if let Some(data) = present::parsed_data(record) {
        lines.push(Line::default());
        lines.push(heading("data"));
        let pretty = serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
        lines.extend(pretty.lines().map(|l| highlighted(l, terms, theme)));
    }

    let meta = [
        ("pod_name", record.pod_name.as_deref()),
        ("source time", record.source_timestamp.as_deref()),
        ("hit id", record.hit_id.as_deref()),
    ];
    if meta.iter().any(|(_, v)| v.is_some()) {
        lines.push(Line::default());
        lines.push(heading("metadata"));
        for (name, value) in meta {
            if let Some(value) = value {
                lines.push(field_line(name, value, theme));
            }
        }
    }

    if let Ok(payload) = present::copy_payload(record) {
        lines.push(Line::default());
        lines.push(heading("json"));
        lines.extend(
            payload
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), theme.label))),
        );
    }

    lines
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("── {text} "),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn field_line(name: &str, value: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name:<12}"), theme.label),
        Span::raw(value.to_string()),
    ])
}

/// Split `text` into plain and highlighted spans around search-term hits.
fn highlighted(text: &str, terms: &[String], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    for range in present::highlight_spans(text, terms) {
        if range.start > cursor {
            spans.push(Span::raw(text[cursor..range.start].to_string()));
        }
        spans.push(Span::styled(text[range.clone()].to_string(), theme.search_highlight));
        cursor = range.end;
    }
    if cursor < text.len() {
        spans.push(Span::raw(text[cursor..].to_string()));
    }
    Line::from(spans)
}
