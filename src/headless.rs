//! Headless output: a load summary followed by one line per record in view.
//!
//! ```text
//! source   export.json
//! hits     3 (3 loaded, 0 skipped: 0 without message, 0 without timestamp)
//! view     2 of 3 records
//! span     2025-10-15 07:00:01.000 → 07:00:02.000 (1.0s)
//! matches  1 for "T3-only-term"
//!
//!   2025-10-15T07:00:01.000  FORMAT_A      info     verifyPayment
//! * 2025-10-15T07:00:02.000  FORMAT_A      error    T3-only-term
//! ```
//!
//! Matches are marked with `*`, the current match with `>`.

use std::io::{self, Write};

use hitline_core::{present, present::TimeSpan, ViewerState};

pub fn write_report<W: Write>(out: &mut W, source: &str, viewer: &ViewerState) -> io::Result<()> {
    let corpus = viewer.corpus();
    let report = corpus.report();

    writeln!(out, "source   {source}")?;
    writeln!(
        out,
        "hits     {} ({} loaded, {} skipped: {} without message, {} without timestamp)",
        report.total_hits,
        report.loaded,
        report.skipped(),
        report.skipped_no_message,
        report.skipped_no_timestamp
    )?;
    writeln!(out, "view     {} of {} records", viewer.view().len(), corpus.len())?;
    if let Some(span) = TimeSpan::of(viewer.records_in_view()) {
        writeln!(
            out,
            "span     {} → {} ({:.1}s)",
            span.start.format("%Y-%m-%d %H:%M:%S%.3f"),
            span.end.format("%H:%M:%S%.3f"),
            span.duration_secs()
        )?;
    }
    let query = &viewer.filter().search_query;
    if !query.trim().is_empty() {
        writeln!(out, "matches  {} for {query:?}", viewer.matches().len())?;
    }
    writeln!(out)?;

    let matches = viewer.matches();
    for &index in viewer.view() {
        let (Some(record), Some(hay)) = (corpus.get(index), corpus.haystack(index)) else {
            continue;
        };
        let marker = if matches.current_record() == Some(index) {
            '>'
        } else if matches.contains(index) {
            '*'
        } else {
            ' '
        };
        writeln!(
            out,
            "{marker} {:<24} {:<13} {:<8} {}",
            record.timestamp,
            record.format.to_string(),
            present::category_in(record, hay).as_str(),
            present::label(record)
        )?;
    }
    Ok(())
}
