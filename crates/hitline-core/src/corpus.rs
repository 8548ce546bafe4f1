//! The log corpus: every record of one load, sorted by instant.
//!
//! A [`Corpus`] is immutable once built. Filtering returns a fresh list of
//! indices computed from the full record set each time, so filters never
//! accumulate. Each record's lowercase JSON serialization is computed once at
//! load and reused by every search.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{FilterError, LoadError};
use crate::normalizer::{self, Skip};
use crate::query::Query;
use crate::types::LogRecord;

/// Hits normalised per chunk when the caller does not say otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// What happened to the input during a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Candidate entries seen: envelope hits, or timestamp-bearing objects
    /// found by the unstructured walk.
    pub total_hits: usize,
    pub loaded: usize,
    pub skipped_no_message: usize,
    pub skipped_no_timestamp: usize,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.skipped_no_message + self.skipped_no_timestamp
    }

    fn absorb(&mut self, outcome: Result<(), Skip>) {
        self.total_hits += 1;
        match outcome {
            Ok(()) => self.loaded += 1,
            Err(Skip::NoMessage) => self.skipped_no_message += 1,
            Err(Skip::NoTimestamp) => self.skipped_no_timestamp += 1,
        }
    }
}

/// The sorted record set of one load.
#[derive(Debug, Default)]
pub struct Corpus {
    records: Vec<LogRecord>,
    haystacks: Vec<String>,
    report: LoadReport,
}

impl Corpus {
    /// Parse and normalise an export in one pass.
    pub fn load(text: &str) -> Result<Self, LoadError> {
        let root: Value = serde_json::from_str(text)?;
        let mut loader = Loader::default();
        let hits = loader.begin(&root);
        loader.collect(0, hits);
        Ok(loader.finish())
    }

    /// Like [`Corpus::load`], but yields to the runtime after every
    /// `chunk_size` hits so a UI sharing the thread keeps drawing. The result
    /// is identical to the synchronous load.
    pub async fn load_async(text: &str, chunk_size: usize) -> Result<Self, LoadError> {
        let root: Value = serde_json::from_str(text)?;
        let mut loader = Loader::default();
        let hits = loader.begin(&root);

        let chunk_size = chunk_size.max(1);
        for (chunk_index, chunk) in hits.chunks(chunk_size).enumerate() {
            let offset = chunk_index * chunk_size;
            loader.collect(offset, chunk);
            tracing::debug!(
                processed = offset + chunk.len(),
                total = hits.len(),
                "normalised chunk"
            );
            tokio::task::yield_now().await;
        }

        Ok(loader.finish())
    }

    /// Build a corpus from already-normalised records. They are sorted the
    /// same way a load sorts them.
    pub fn from_records(records: Vec<LogRecord>) -> Self {
        let report = LoadReport {
            total_hits: records.len(),
            loaded: records.len(),
            ..LoadReport::default()
        };
        Self::assemble(records, report)
    }

    fn assemble(mut records: Vec<LogRecord>, report: LoadReport) -> Self {
        // Stable: equal keys keep input order.
        records.sort_by_key(|r| (r.instant.timestamp_millis(), r.format.sort_rank()));
        let haystacks = records.iter().map(haystack_of).collect();

        tracing::info!(
            total = report.total_hits,
            loaded = report.loaded,
            skipped_no_message = report.skipped_no_message,
            skipped_no_timestamp = report.skipped_no_timestamp,
            "corpus loaded"
        );

        Self {
            records,
            haystacks,
            report,
        }
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LogRecord> {
        self.records.get(index)
    }

    /// Lowercase serialized form of the record at `index`, as searched by
    /// the query engine.
    pub fn haystack(&self, index: usize) -> Option<&str> {
        self.haystacks.get(index).map(String::as_str)
    }

    pub fn report(&self) -> LoadReport {
        self.report
    }

    /// Indices of every record passing `filter`, in corpus order.
    ///
    /// The time range is checked at millisecond resolution with inclusive
    /// bounds. A blank search query does not filter at all.
    pub fn apply_filter(&self, filter: &FilterState) -> Vec<usize> {
        let query = Query::parse(&filter.search_query);
        let view: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.time_range.contains(r.instant))
            .filter(|(i, _)| query.is_empty() || query.matches(&self.haystacks[*i]))
            .map(|(i, _)| i)
            .collect();

        tracing::debug!(
            start = ?filter.time_range.start,
            end = ?filter.time_range.end,
            query = %filter.search_query,
            kept = view.len(),
            of = self.len(),
            "filter applied"
        );
        view
    }

    /// Index list covering the whole corpus.
    pub fn full_view(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }
}

/// Records and counts accumulated during one load.
#[derive(Default)]
struct Loader {
    records: Vec<LogRecord>,
    report: LoadReport,
}

impl Loader {
    /// Returns the envelope's hits. A document that is not an envelope is
    /// walked here instead and leaves nothing to collect.
    fn begin<'a>(&mut self, root: &'a Value) -> &'a [Value] {
        match normalizer::envelope_hits(root) {
            Some(hits) => hits,
            None => {
                self.walk_document(root);
                &[]
            }
        }
    }

    /// Normalise `hits`, numbering them from `offset`.
    fn collect(&mut self, offset: usize, hits: &[Value]) {
        for (i, hit) in hits.iter().enumerate() {
            let index = offset + i;
            match normalizer::normalize_hit(index, hit) {
                Ok(record) => {
                    self.records.push(record);
                    self.report.absorb(Ok(()));
                }
                Err(skip) => {
                    tracing::warn!(hit = index, reason = ?skip, "hit skipped");
                    self.report.absorb(Err(skip));
                }
            }
        }
    }

    fn walk_document(&mut self, root: &Value) {
        let extraction = normalizer::extract_unstructured(root);
        self.report.total_hits += extraction.records.len() + extraction.skipped;
        self.report.loaded += extraction.records.len();
        self.report.skipped_no_timestamp += extraction.skipped;
        self.records.extend(extraction.records);
    }

    fn finish(self) -> Corpus {
        Corpus::assemble(self.records, self.report)
    }
}

fn haystack_of(record: &LogRecord) -> String {
    serde_json::to_string(record)
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Optional inclusive time bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Parse user-entered bounds. Blank text means "unbounded".
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, FilterError> {
        Ok(Self {
            start: parse_bound("start", start)?,
            end: parse_bound("end", end)?,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let t = instant.timestamp_millis();
        self.start.is_none_or(|s| t >= s.timestamp_millis())
            && self.end.is_none_or(|e| t <= e.timestamp_millis())
    }
}

fn parse_bound(bound: &'static str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, FilterError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => normalizer::parse_instant(v)
            .map(Some)
            .ok_or_else(|| FilterError::InvalidBound {
                bound,
                value: v.to_string(),
            }),
    }
}

/// The user's filter inputs: a time range and a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub time_range: TimeRange,
    pub search_query: String,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.time_range.is_unbounded() && self.search_query.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordFormat;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn envelope(messages: &[&str]) -> String {
        let hits: Vec<Value> = messages
            .iter()
            .enumerate()
            .map(|(i, m)| json!({ "_id": format!("id-{i}"), "_source": { "message": m } }))
            .collect();
        json!({ "rawResponse": { "hits": { "hits": hits } } }).to_string()
    }

    fn line_a(ts: &str, tag: &str) -> String {
        format!("1:|{ts}+00:00|dev|sess|svc|/u|cart|web|INFO|EVENT|{tag}")
    }

    fn line_b(ts: &str, tag: &str) -> String {
        format!("2 | req | trace | span | /u | pod | svc | INFO | API | {tag} | payload at {}", ts.replacen('T', " ", 1))
    }

    #[test]
    fn malformed_json_aborts() {
        assert!(matches!(Corpus::load("{ nope"), Err(LoadError::Json(_))));
    }

    #[test]
    fn sorted_with_format_a_first_on_ties() {
        let text = envelope(&[
            &line_b("2025-10-15T07:00:02.000", "b-late"),
            &line_b("2025-10-15T07:00:01.000", "b-tie"),
            &line_a("2025-10-15T07:00:01.000", "a-tie"),
            &line_a("2025-10-15T07:00:00.500", "a-early"),
        ]);
        let corpus = Corpus::load(&text).unwrap();
        let tags: Vec<_> = corpus.records().iter().map(|r| r.attr("tag").unwrap()).collect();
        assert_eq!(tags, vec!["a-early", "a-tie", "b-tie", "b-late"]);
    }

    #[test]
    fn report_counts_skips() {
        let text = json!({ "rawResponse": { "hits": { "hits": [
            { "_source": { "message": line_a("2025-10-15T07:00:00.000", "ok") } },
            { "_source": {} },
            { "_source": { "message": "no time" } },
        ] } } })
        .to_string();
        let corpus = Corpus::load(&text).unwrap();
        assert_eq!(
            corpus.report(),
            LoadReport {
                total_hits: 3,
                loaded: 1,
                skipped_no_message: 1,
                skipped_no_timestamp: 1,
            }
        );
        assert_eq!(corpus.report().skipped(), 2);
    }

    #[test]
    fn unstructured_document_loads() {
        let text = json!({ "items": [
            { "time": "2025-10-15T08:00:00Z", "event": "b" },
            { "time": "2025-10-15T07:00:00Z", "event": "a" },
        ] })
        .to_string();
        let corpus = Corpus::load(&text).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.records()[0].path.as_deref(), Some("items.1"));
        assert_eq!(corpus.records()[0].format, RecordFormat::Unstructured);
    }

    #[tokio::test]
    async fn async_load_matches_sync_load() {
        let lines: Vec<String> = (0..23)
            .map(|i| line_a(&format!("2025-10-15T07:00:{:02}.000", 59 - i), &format!("t{i}")))
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let text = envelope(&refs);

        let sync = Corpus::load(&text).unwrap();
        let chunked = Corpus::load_async(&text, 5).await.unwrap();
        assert_eq!(sync.records(), chunked.records());
        assert_eq!(sync.report(), chunked.report());
        assert_eq!(chunked.records()[0].hit_index, Some(22));
    }

    #[tokio::test]
    async fn async_load_walks_bare_documents() {
        let text = json!({ "items": [
            { "time": "2025-10-15T08:00:00Z", "event": "b" },
            { "time": 1760511600000i64, "event": "a" },
            { "event": "untimed" },
        ] })
        .to_string();

        let sync = Corpus::load(&text).unwrap();
        let chunked = Corpus::load_async(&text, 1).await.unwrap();
        assert_eq!(sync.records(), chunked.records());
        assert_eq!(sync.report(), chunked.report());
        assert_eq!(chunked.len(), 2);
        assert_eq!(chunked.records()[0].attr("event"), Some("a"));
    }

    #[test]
    fn haystack_is_lowercase_json() {
        let text = envelope(&[&line_a("2025-10-15T07:00:00.000", "MixedCase")]);
        let corpus = Corpus::load(&text).unwrap();
        let hay = corpus.haystack(0).unwrap();
        assert!(hay.contains("\"tag\":\"mixedcase\""));
        assert!(corpus.haystack(1).is_none());
    }

    #[test]
    fn filter_by_time_and_query_from_full_corpus() {
        let text = envelope(&[
            &line_a("2025-10-15T07:00:00.000", "alpha"),
            &line_a("2025-10-15T07:00:01.000", "beta"),
            &line_a("2025-10-15T07:00:02.000", "gamma"),
        ]);
        let corpus = Corpus::load(&text).unwrap();

        let mut filter = FilterState {
            time_range: TimeRange::parse(Some("2025-10-15T07:00:01.000"), None).unwrap(),
            search_query: String::new(),
        };
        assert_eq!(corpus.apply_filter(&filter), vec![1, 2]);

        filter.search_query = "gamma OR alpha".into();
        assert_eq!(corpus.apply_filter(&filter), vec![2]);

        // Not cumulative: widening the range brings alpha back.
        filter.time_range = TimeRange::default();
        assert_eq!(corpus.apply_filter(&filter), vec![0, 2]);
    }

    #[test]
    fn bounds_are_inclusive() {
        let text = envelope(&[&line_a("2025-10-15T07:00:01.000", "x")]);
        let corpus = Corpus::load(&text).unwrap();
        let filter = FilterState {
            time_range: TimeRange::parse(Some("2025-10-15T07:00:01"), Some("2025-10-15T07:00:01.000")).unwrap(),
            search_query: String::new(),
        };
        assert_eq!(corpus.apply_filter(&filter), vec![0]);
    }

    #[test]
    fn bad_bound_is_rejected() {
        let err = TimeRange::parse(None, Some("tomorrow")).unwrap_err();
        assert!(matches!(err, FilterError::InvalidBound { bound: "end", .. }));
        assert!(TimeRange::parse(Some("  "), Some("")).unwrap().is_unbounded());
    }
}
