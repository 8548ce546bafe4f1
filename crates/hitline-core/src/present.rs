//! Presentation helpers shared by every front-end: colour category, short
//! label, time formatting, message cleanup and search-term highlighting.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

use crate::types::LogRecord;

const LABEL_MESSAGE_CHARS: usize = 30;

// Stand-ins used while stripping so a replaced object is not itself matched
// by the array pattern on the next pass.
const OBJECT_MARK: &str = "\u{E010}";
const ARRAY_MARK: &str = "\u{E011}";

static TIME_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"T([0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]+)").expect("time pattern must compile")
});
static DATE_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2})").expect("date pattern must compile"));
static JSON_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(?:[^{}]|\{[^{}]*\})*\}").expect("object pattern must compile")
});
static JSON_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?:[^\[\]]|\[[^\[\]]*\])*\]").expect("array pattern must compile")
});
static OBJECT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?:\u{E010}\\s*)+").expect("object run pattern must compile"));
static ARRAY_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?:\u{E011}\\s*)+").expect("array run pattern must compile"));

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Colour class of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Error,
    Warning,
    Payment,
    Cart,
    Api,
    Info,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Error => "error",
            Category::Warning => "warning",
            Category::Payment => "payment",
            Category::Cart => "cart",
            Category::Api => "api",
            Category::Info => "info",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a record, serializing it to check content keywords.
pub fn category(record: &LogRecord) -> Category {
    let haystack = serde_json::to_string(record)
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    category_in(record, &haystack)
}

/// Category of a record whose lowercase serialization is already known.
///
/// Level wins, then type, then keywords anywhere in the record.
pub fn category_in(record: &LogRecord, lower_haystack: &str) -> Category {
    if let Some(level) = record.attr("level") {
        let level = level.to_lowercase();
        if level == "error" {
            return Category::Error;
        }
        if level == "warn" || level == "warning" {
            return Category::Warning;
        }
    }
    if record
        .attr("type")
        .is_some_and(|t| t.to_lowercase().contains("error"))
    {
        return Category::Error;
    }

    let has = |words: &[&str]| words.iter().any(|w| lower_haystack.contains(w));
    if has(&["error", "fail"]) {
        Category::Error
    } else if has(&["warn"]) {
        Category::Warning
    } else if has(&["payment", "txn", "euler", "juspay"]) {
        Category::Payment
    } else if has(&["cart", "shipping"]) {
        Category::Cart
    } else if has(&["gql", "api", "dbquery"]) {
        Category::Api
    } else {
        Category::Info
    }
}

// ---------------------------------------------------------------------------
// Label and time text
// ---------------------------------------------------------------------------

/// Short caption for a timeline box.
pub fn label(record: &LogRecord) -> String {
    if let Some(text) = ["tag", "action", "type", "event"]
        .iter()
        .find_map(|key| record.attr(key))
    {
        return text.to_string();
    }
    if let Some(message) = record.attr("message") {
        return message.chars().take(LABEL_MESSAGE_CHARS).collect();
    }
    match record.path.as_deref() {
        Some(path) if !path.is_empty() => path.to_string(),
        _ => "Log".to_string(),
    }
}

/// `HH:MM:SS.fff` part of an ISO timestamp, or the input unchanged.
pub fn format_time(ts: &str) -> &str {
    TIME_PART
        .captures(ts)
        .and_then(|c| c.get(1))
        .map_or(ts, |m| m.as_str())
}

/// `YYYY-MM-DD` prefix of an ISO timestamp, or the input unchanged.
pub fn format_date(ts: &str) -> &str {
    DATE_PART
        .captures(ts)
        .and_then(|c| c.get(1))
        .map_or(ts, |m| m.as_str())
}

// ---------------------------------------------------------------------------
// Message cleanup
// ---------------------------------------------------------------------------

/// Replace embedded JSON objects with `[JSON]` and arrays with `[ARRAY]`.
///
/// Each pass handles two levels of nesting; passes repeat until nothing
/// changes, then runs of adjacent markers collapse into one.
pub fn strip_json(message: &str) -> String {
    let mut result = message.to_string();
    loop {
        let objects = JSON_OBJECT.replace_all(&result, OBJECT_MARK).into_owned();
        let arrays = JSON_ARRAY.replace_all(&objects, ARRAY_MARK).into_owned();
        if arrays == result {
            break;
        }
        result = arrays;
    }
    let result = OBJECT_RUN.replace_all(&result, "[JSON] ");
    ARRAY_RUN.replace_all(&result, "[ARRAY] ").into_owned()
}

/// Recursively parse string values that hold JSON objects or arrays.
pub fn deep_parse_json(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            let looks_like_json = (trimmed.starts_with('{') && trimmed.ends_with('}'))
                || (trimmed.starts_with('[') && trimmed.ends_with(']'));
            if looks_like_json {
                if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
                    return deep_parse_json(&parsed);
                }
            }
            value.clone()
        }
        Value::Array(items) => Value::Array(items.iter().map(deep_parse_json).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), deep_parse_json(v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// The record's payload as structured JSON, when it holds any.
///
/// Structured lines use their `data` field; unstructured records use the
/// attributes of the object they came from.
pub fn parsed_data(record: &LogRecord) -> Option<Value> {
    if let Some(data) = record.line.data.as_deref() {
        let parsed = deep_parse_json(&Value::String(data.to_string()));
        return (parsed.is_object() || parsed.is_array()).then_some(parsed);
    }
    if !record.attributes.is_empty() {
        return Some(deep_parse_json(&Value::Object(record.attributes.clone())));
    }
    None
}

/// Pretty JSON of a record for the clipboard, without layout-only fields.
pub fn copy_payload(record: &LogRecord) -> Result<String, serde_json::Error> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        map.remove("path");
        map.remove("timestamp");
    }
    serde_json::to_string_pretty(&value)
}

// ---------------------------------------------------------------------------
// Highlighting
// ---------------------------------------------------------------------------

/// Byte ranges of `text` covered by any of `terms`, matched
/// case-insensitively. Overlapping and adjacent hits are merged.
pub fn highlight_spans<S: AsRef<str>>(text: &str, terms: &[S]) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();

    for term in terms.iter().map(AsRef::as_ref).filter(|t| !t.is_empty()) {
        let Ok(re) = Regex::new(&format!("(?i){}", regex::escape(term))) else {
            continue;
        };
        let mut at = 0;
        while let Some(m) = re.find_at(text, at) {
            spans.push(m.range());
            // Step one character so overlapping hits are found too.
            at = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
            if at > text.len() {
                break;
            }
        }
    }

    spans.sort_by_key(|r| r.start);
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

// ---------------------------------------------------------------------------
// Time span
// ---------------------------------------------------------------------------

/// Earliest and latest instant in a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSpan {
    pub fn of<'a>(records: impl IntoIterator<Item = &'a LogRecord>) -> Option<Self> {
        records.into_iter().fold(None, |span, r| {
            Some(match span {
                None => TimeSpan {
                    start: r.instant,
                    end: r.instant,
                },
                Some(s) => TimeSpan {
                    start: s.start.min(r.instant),
                    end: s.end.max(r.instant),
                },
            })
        })
    }

    pub fn duration_secs(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 1000.0
    }
}
