//! Core types for hitline-core.
//!
//! This module defines the normalised [`LogRecord`] shared by every engine,
//! the [`RecordFormat`] tag identifying which grammar produced it, and the
//! [`LineFields`] extracted from a structured line.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// A normalised log record produced by the normalizer and owned by a
/// [`Corpus`](crate::corpus::Corpus).
///
/// `timestamp` and `instant` are always present: records whose timestamp
/// cannot be resolved to an instant never make it into a corpus. The
/// serialized form of this struct is both the export format and, lowercased,
/// the haystack the query engine searches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Position of the originating hit in the export's hit list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_index: Option<usize>,
    /// The hit's `_id`, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_id: Option<String>,
    /// Timestamp text exactly as resolved from the source. Timeline slots
    /// are keyed on this string, not on `instant`.
    pub timestamp: String,
    /// `timestamp` converted to a totally ordered instant. Used for sorting
    /// and time-range filtering only.
    #[serde(skip)]
    pub instant: DateTime<Utc>,
    /// Which grammar matched the raw line.
    pub format: RecordFormat,
    /// Fields extracted by the Format A / Format B grammars.
    #[serde(flatten)]
    pub line: LineFields,
    /// The original unparsed message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_message: Option<String>,
    /// `_source.pod_name` of the originating hit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
    /// `_source.timestamp` of the originating hit (the indexer's timestamp).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_timestamp: Option<String>,
    /// Dotted path of the object an unstructured record was extracted from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// All attributes of the object an unstructured record was extracted from.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    /// The hit's full `_source` object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_source: Option<Value>,
}

impl LogRecord {
    /// A bare record carrying only a timestamp. Normalizer stages and test
    /// builders fill in the remaining fields.
    pub fn new(timestamp: impl Into<String>, instant: DateTime<Utc>, format: RecordFormat) -> Self {
        Self {
            hit_index: None,
            hit_id: None,
            timestamp: timestamp.into(),
            instant,
            format,
            line: LineFields::default(),
            raw_message: None,
            pod_name: None,
            source_timestamp: None,
            path: None,
            attributes: Map::new(),
            hit_source: None,
        }
    }

    /// Look up a textual attribute by its display name.
    ///
    /// Structured line fields win over unstructured attributes, so `tag` on a
    /// Format A record is the parsed tag even if the payload also had one.
    pub fn attr(&self, key: &str) -> Option<&str> {
        let structured = match key {
            "tag" => self.line.tag.as_deref(),
            "type" => self.line.kind.as_deref(),
            "level" => self.line.level.as_deref(),
            "service" => self.line.service.as_deref(),
            "url" => self.line.url.as_deref(),
            "data" => self.line.data.as_deref(),
            _ => None,
        };
        structured
            .or_else(|| self.attributes.get(key).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
    }
}

/// Which line grammar produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordFormat {
    /// Fixed-arity `lineNum:|ts|…` grammar. Sorts first among equal instants.
    #[serde(rename = "FORMAT_A")]
    FormatA,
    /// Variable-arity `" | "`-delimited grammar with a trailing `at <ts>`.
    #[serde(rename = "FORMAT_B")]
    FormatB,
    /// No grammar matched; the record came from an object walk or a bare message.
    #[serde(rename = "UNSTRUCTURED")]
    Unstructured,
}

impl RecordFormat {
    /// Tie-break rank for records whose instants are equal to the millisecond.
    pub fn sort_rank(self) -> u8 {
        match self {
            RecordFormat::FormatA => 0,
            RecordFormat::FormatB | RecordFormat::Unstructured => 1,
        }
    }
}

impl std::fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordFormat::FormatA => write!(f, "FORMAT_A"),
            RecordFormat::FormatB => write!(f, "FORMAT_B"),
            RecordFormat::Unstructured => write!(f, "UNSTRUCTURED"),
        }
    }
}

/// Fields captured from a structured line. Which ones are populated depends
/// on the grammar: device/session/cart ids and `origin` come from Format A,
/// request/trace/span ids and `pod` from Format B.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<String>,
    /// The emitting component (`source` column of Format A).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}
