//! Normalizer: turns raw export content into [`LogRecord`] values.
//!
//! Two line grammars are tried in priority order: Format A (`lineNum:|ts|…`,
//! fixed arity) and Format B (`" | "`-delimited, at least ten fields). A hit
//! whose message matches neither is kept as an unstructured record. Input
//! that is not an Elasticsearch-style envelope is walked for any object
//! carrying a `timestamp`, `time` or `date` attribute.
//!
//! Nothing in this module fails: every function returns `Option` or a
//! [`Skip`] reason so one malformed hit never aborts a batch.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};

use crate::types::{LineFields, LogRecord, RecordFormat};

// ---------------------------------------------------------------------------
// Grammars
// ---------------------------------------------------------------------------

static FORMAT_A_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9]+:\|([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]+)[+-][0-9]{2}:[0-9]{2}\|",
    )
    .expect("format A timestamp pattern must compile")
});

static FORMAT_B_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"at ([0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]+)")
        .expect("format B timestamp pattern must compile")
});

static FORMAT_A_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]+):\|[^|]+\|([^|]+)\|([^|]+)\|([^|]+)\|([^|]*)\|([^|]*)\|([^|]+)\|([^|]+)\|([^|]+)\|(.+)$",
    )
    .expect("format A line pattern must compile")
});

const FORMAT_B_DELIMITER: &str = " | ";
const FORMAT_B_MIN_FIELDS: usize = 10;

/// Attribute names that mark an object as a record during the unstructured
/// walk, in lookup order.
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "time", "date"];

/// Naive timestamp layouts accepted by [`parse_instant`]. Naive values are
/// taken to be UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Structured fields recovered from one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub format: RecordFormat,
    pub fields: LineFields,
}

/// Why a hit produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// `_source` or `_source.message` is missing or empty.
    NoMessage,
    /// Neither the message nor `_source.timestamp` yields a usable instant.
    NoTimestamp,
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Extract the timestamp embedded in a raw message.
///
/// Format A timestamps are returned without their timezone suffix. Format B
/// timestamps come from the first `at <date> <time>` marker, with the space
/// replaced by `T`.
pub fn parse_timestamp(raw: &str) -> Option<String> {
    if let Some(caps) = FORMAT_A_TIMESTAMP.captures(raw) {
        return Some(caps[1].to_string());
    }
    FORMAT_B_TIMESTAMP
        .captures(raw)
        .map(|caps| caps[1].replacen(' ', "T", 1))
}

/// Convert timestamp text to an instant.
///
/// Accepts RFC 3339 (offset or `Z`), `%z` offsets without a colon, naive
/// date-times with `T` or a space separator (seconds and fractions
/// optional), and bare dates.
pub fn parse_instant(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(ts, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Line grammars
// ---------------------------------------------------------------------------

/// Parse a raw message against Format A, then Format B.
pub fn parse_line(raw: &str) -> Option<ParsedLine> {
    parse_format_a(raw).or_else(|| parse_format_b(raw))
}

fn parse_format_a(raw: &str) -> Option<ParsedLine> {
    let caps = FORMAT_A_LINE.captures(raw)?;
    let text = |i: usize| Some(caps[i].to_string());
    let (tag, data) = split_tag(&caps[10]);

    Some(ParsedLine {
        format: RecordFormat::FormatA,
        fields: LineFields {
            line_number: text(1),
            device_id: text(2),
            session_id: text(3),
            service: text(4),
            url: text(5),
            cart_id: text(6),
            origin: text(7),
            level: text(8),
            kind: text(9),
            tag: Some(tag),
            data,
            ..LineFields::default()
        },
    })
}

fn parse_format_b(raw: &str) -> Option<ParsedLine> {
    let parts: Vec<&str> = raw.split(FORMAT_B_DELIMITER).collect();
    if parts.len() < FORMAT_B_MIN_FIELDS {
        return None;
    }

    // Everything after the tag is payload plus the trailing `at <ts>` marker.
    let remainder = parts[FORMAT_B_MIN_FIELDS..].join(FORMAT_B_DELIMITER);
    let data = match remainder.rfind(" at ") {
        Some(idx) if idx > 0 => remainder[..idx].trim().to_string(),
        _ => remainder,
    };
    let text = |i: usize| Some(parts[i].to_string());

    Some(ParsedLine {
        format: RecordFormat::FormatB,
        fields: LineFields {
            line_number: text(0),
            request_id: text(1),
            trace_id: text(2),
            span_id: text(3),
            url: text(4),
            pod: text(5),
            service: text(6),
            level: text(7),
            kind: text(8),
            tag: text(9),
            data: Some(data),
            ..LineFields::default()
        },
    })
}

/// Split `tag:data` on the first colon. A leading colon or no colon at all
/// leaves the whole field as the tag.
fn split_tag(tag_and_data: &str) -> (String, Option<String>) {
    match tag_and_data.find(':') {
        Some(idx) if idx > 0 => (
            tag_and_data[..idx].to_string(),
            Some(tag_and_data[idx + 1..].to_string()),
        ),
        _ => (tag_and_data.to_string(), None),
    }
}

// ---------------------------------------------------------------------------
// Envelope hits
// ---------------------------------------------------------------------------

/// The hit list of an Elasticsearch-style envelope
/// (`rawResponse.hits.hits`), if `value` is one.
pub fn envelope_hits(value: &Value) -> Option<&[Value]> {
    value
        .pointer("/rawResponse/hits/hits")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

/// Normalise one envelope hit.
///
/// The message's embedded timestamp wins; `_source.timestamp` is the
/// fallback. A message matching neither grammar still yields a record,
/// tagged [`RecordFormat::Unstructured`].
pub fn normalize_hit(index: usize, hit: &Value) -> Result<LogRecord, Skip> {
    let source = hit
        .get("_source")
        .filter(|s| s.is_object())
        .ok_or(Skip::NoMessage)?;
    let message = source
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .ok_or(Skip::NoMessage)?;
    let source_timestamp = source.get("timestamp").filter(|v| is_truthy(v));

    let (timestamp, instant) = match parse_timestamp(message) {
        Some(ts) => {
            let instant = parse_instant(&ts).ok_or(Skip::NoTimestamp)?;
            (ts, instant)
        }
        None => source_timestamp
            .and_then(timestamp_value)
            .ok_or(Skip::NoTimestamp)?,
    };

    let (format, line) = match parse_line(message) {
        Some(parsed) => (parsed.format, parsed.fields),
        None => (RecordFormat::Unstructured, LineFields::default()),
    };

    let mut record = LogRecord::new(timestamp, instant, format);
    record.hit_index = Some(index);
    record.hit_id = hit.get("_id").and_then(scalar_text);
    record.line = line;
    record.raw_message = Some(message.to_string());
    record.pod_name = source
        .get("pod_name")
        .and_then(Value::as_str)
        .map(str::to_string);
    record.source_timestamp = source_timestamp.and_then(scalar_text);
    record.hit_source = Some(source.clone());
    Ok(record)
}

// ---------------------------------------------------------------------------
// Unstructured walk
// ---------------------------------------------------------------------------

/// Records found by [`extract_unstructured`], plus the number of candidate
/// objects whose timestamp attribute could not be converted to an instant.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<LogRecord>,
    pub skipped: usize,
}

/// Walk an arbitrary JSON graph, depth-first in document order, and turn
/// every object with a truthy `timestamp`/`time`/`date` attribute into a
/// record tagged with its dotted path.
///
/// The walk uses an explicit stack and a visited set keyed on node address,
/// so depth is bounded by heap rather than call stack and no node is
/// visited twice.
pub fn extract_unstructured(root: &Value) -> Extraction {
    let mut out = Extraction::default();
    let mut visited: HashSet<*const Value> = HashSet::new();
    let mut stack: Vec<(&Value, String)> = vec![(root, String::new())];

    while let Some((node, path)) = stack.pop() {
        if !visited.insert(node as *const Value) {
            continue;
        }

        let children: Vec<(String, &Value)> = match node {
            Value::Object(map) => {
                let marker = TIMESTAMP_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).filter(|v| is_truthy(v)));
                if let Some(raw) = marker {
                    match object_record(map, raw, &path) {
                        Some(record) => out.records.push(record),
                        None => {
                            tracing::debug!(path = %path, "object timestamp not convertible; skipped");
                            out.skipped += 1;
                        }
                    }
                }
                map.iter().map(|(k, v)| (k.clone(), v)).collect()
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            _ => continue,
        };

        // Reverse so the first child is popped first (pre-order).
        for (key, child) in children.into_iter().rev() {
            if child.is_object() || child.is_array() {
                let child_path = if path.is_empty() {
                    key
                } else {
                    format!("{path}.{key}")
                };
                stack.push((child, child_path));
            }
        }
    }

    out
}

/// Timestamp text and instant of a JSON value: parseable text, or a number
/// of epoch milliseconds.
fn timestamp_value(raw: &Value) -> Option<(String, DateTime<Utc>)> {
    match raw {
        Value::String(s) => Some((s.clone(), parse_instant(s)?)),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Some((n.to_string(), DateTime::from_timestamp_millis(millis)?))
        }
        _ => None,
    }
}

fn object_record(map: &Map<String, Value>, raw: &Value, path: &str) -> Option<LogRecord> {
    let (text, instant) = timestamp_value(raw)?;

    let mut record = LogRecord::new(text, instant, RecordFormat::Unstructured);
    record.path = Some(path.to_string());
    record.attributes = map.clone();
    Some(record)
}

/// JavaScript-style truthiness, which is what decides whether an attribute
/// counts as present in exported documents.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
