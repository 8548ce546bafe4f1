//! Test builders: ergonomic constructors for records, envelopes and raw
//! lines.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use hitline_core::{Corpus, LogRecord, RecordFormat, TimelineParams, ViewerState};
use serde_json::{json, Value};

/// 2025-10-15T07:00:00Z, the base instant of every generated fixture.
pub fn base_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 15, 7, 0, 0).unwrap()
}

/// `base_instant() + ms` formatted the way Format A prints it, without offset.
pub fn ts_at(ms: i64) -> String {
    (base_instant() + Duration::milliseconds(ms))
        .format("%Y-%m-%dT%H:%M:%S%.3f")
        .to_string()
}

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`LogRecord`] test fixtures.
///
/// # Example
///
/// ```rust
/// let record = RecordBuilder::at_ms(1_500)
///     .tag("verifyPayment")
///     .level("ERROR")
///     .message("payment failed")
///     .build();
/// ```
pub struct RecordBuilder {
    record: LogRecord,
}

impl RecordBuilder {
    pub fn at_ms(ms: i64) -> Self {
        let instant = base_instant() + Duration::milliseconds(ms);
        Self {
            record: LogRecord::new(ts_at(ms), instant, RecordFormat::FormatA),
        }
    }

    /// Override the timestamp string while keeping the instant.
    pub fn timestamp(mut self, ts: impl Into<String>) -> Self {
        self.record.timestamp = ts.into();
        self
    }

    pub fn format(mut self, format: RecordFormat) -> Self {
        self.record.format = format;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.record.line.tag = Some(tag.into());
        self
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.record.line.level = Some(level.into());
        self
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.record.line.service = Some(service.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.record.raw_message = Some(message.into());
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.record.attributes.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> LogRecord {
        self.record
    }
}

/// A corpus of one Format A record per tag, one second apart.
pub fn corpus_of_tags(tags: &[&str]) -> Corpus {
    Corpus::from_records(
        tags.iter()
            .enumerate()
            .map(|(i, tag)| RecordBuilder::at_ms(i as i64 * 1_000).tag(*tag).build())
            .collect(),
    )
}

pub fn viewer_of_tags(tags: &[&str]) -> ViewerState {
    ViewerState::new(Arc::new(corpus_of_tags(tags)), TimelineParams::default())
}

// ---------------------------------------------------------------------------
// Raw input builders
// ---------------------------------------------------------------------------

/// A Format A line: `n:|ts+00:00|device|session|service|url|cart|origin|level|type|tag:data`.
pub fn format_a_line(ts: &str, level: &str, tag_and_data: &str) -> String {
    format!("12:|{ts}+05:30|dev-1|sess-1|checkout|/cart|cart-9|web|{level}|EVENT|{tag_and_data}")
}

/// A Format B line with `ts` rendered as `YYYY-MM-DD HH:MM:SS.fff`.
pub fn format_b_line(ts: &str, level: &str, tag: &str, payload: &str) -> String {
    format!(
        "7 | req-1 | trace-1 | span-1 | /api/pay | pod-a | payments | {level} | API | {tag} | {payload} at {}",
        ts.replacen('T', " ", 1)
    )
}

/// An Elasticsearch-style envelope whose hits carry `messages` in order.
pub fn envelope(messages: &[String]) -> String {
    let hits: Vec<Value> = messages
        .iter()
        .enumerate()
        .map(|(i, m)| {
            json!({
                "_id": format!("hit-{i}"),
                "_source": { "message": m, "pod_name": "pod-a" }
            })
        })
        .collect();
    json!({ "rawResponse": { "hits": { "hits": hits } } }).to_string()
}
