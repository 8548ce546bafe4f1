//! Match set and cyclic navigation across it.
//!
//! The navigator never scrolls anything itself. Every move returns a
//! [`NavTarget`] naming the record and its index in whichever view is
//! active, and the caller hands that to the layout engine.

use crate::corpus::Corpus;
use crate::query::Query;

/// Where a navigation step landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavTarget {
    /// Corpus index of the matched record.
    pub record: usize,
    /// Index of that record in the active view: its rank among the matches
    /// when only matches are shown, otherwise its corpus index.
    pub view_index: usize,
}

/// Result of the last search plus the navigation cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchState {
    matches: Vec<usize>,
    current: Option<usize>,
    show_only_matches: bool,
}

impl MatchState {
    /// An empty match set with the given display mode.
    pub fn new(show_only_matches: bool) -> Self {
        Self {
            matches: Vec::new(),
            current: None,
            show_only_matches,
        }
    }

    /// Evaluate `query` against every record of `corpus`, in corpus order.
    /// The cursor starts on the first match, if any.
    pub fn search(query: &str, corpus: &Corpus, show_only_matches: bool) -> Self {
        let parsed = Query::parse(query);
        let matches: Vec<usize> = (0..corpus.len())
            .filter(|&i| corpus.haystack(i).is_some_and(|h| parsed.matches(h)))
            .collect();
        let current = if matches.is_empty() { None } else { Some(0) };

        tracing::info!(query, matches = matches.len(), "search complete");
        Self {
            matches,
            current,
            show_only_matches,
        }
    }

    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Zero-based cursor into the match list.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Corpus index of the record under the cursor.
    pub fn current_record(&self) -> Option<usize> {
        self.current.and_then(|c| self.matches.get(c).copied())
    }

    pub fn show_only_matches(&self) -> bool {
        self.show_only_matches
    }

    /// Whether the record at corpus index `record` is in the match set.
    pub fn contains(&self, record: usize) -> bool {
        self.matches.binary_search(&record).is_ok()
    }

    /// Navigation target for the current cursor position.
    pub fn target(&self) -> Option<NavTarget> {
        let rank = self.current?;
        let record = *self.matches.get(rank)?;
        Some(NavTarget {
            record,
            view_index: if self.show_only_matches { rank } else { record },
        })
    }

    /// Advance to the next match, wrapping past the end.
    pub fn next(&mut self) -> Option<NavTarget> {
        let n = self.matches.len();
        if n == 0 {
            return None;
        }
        self.current = Some(self.current.map_or(0, |c| (c + 1) % n));
        self.target()
    }

    /// Step back to the previous match, wrapping before the start.
    pub fn previous(&mut self) -> Option<NavTarget> {
        let n = self.matches.len();
        if n == 0 {
            return None;
        }
        self.current = Some(self.current.map_or(n - 1, |c| (c + n - 1) % n));
        self.target()
    }

    /// Jump to the `n`th match (one-based). Out of range leaves the cursor
    /// where it was and returns `None`.
    pub fn go_to(&mut self, n: usize) -> Option<NavTarget> {
        if n == 0 || n > self.matches.len() {
            tracing::debug!(requested = n, available = self.matches.len(), "goto ignored");
            return None;
        }
        self.current = Some(n - 1);
        self.target()
    }

    /// Flip between matches-only and full view. The match list is kept; the
    /// returned target is the current match re-expressed in the new view.
    pub fn toggle_show_only_matches(&mut self) -> Option<NavTarget> {
        self.show_only_matches = !self.show_only_matches;
        self.target()
    }

    /// Drop the match list, keeping the display mode.
    pub fn clear(&mut self) {
        self.matches.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LogRecord, RecordFormat};
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn corpus(tags: &[&str]) -> Corpus {
        let base = Utc.with_ymd_and_hms(2025, 10, 15, 7, 0, 0).unwrap();
        let records = tags
            .iter()
            .enumerate()
            .map(|(i, tag)| {
                let instant = base + Duration::seconds(i as i64);
                let mut r = LogRecord::new(instant.to_rfc3339(), instant, RecordFormat::FormatA);
                r.line.tag = Some((*tag).to_string());
                r
            })
            .collect();
        Corpus::from_records(records)
    }

    #[test]
    fn search_collects_in_corpus_order() {
        let c = corpus(&["pay", "cart", "pay-fail", "api"]);
        let m = MatchState::search("pay", &c, false);
        assert_eq!(m.matches(), &[0, 2]);
        assert_eq!(m.current(), Some(0));
        assert!(m.contains(2));
        assert!(!m.contains(1));
    }

    #[test]
    fn empty_search_has_no_cursor() {
        let c = corpus(&["a"]);
        let mut m = MatchState::search("zzz", &c, false);
        assert_eq!(m.current(), None);
        assert_eq!(m.next(), None);
        assert_eq!(m.previous(), None);
    }

    #[test]
    fn next_and_previous_wrap() {
        let c = corpus(&["x", "y", "x", "x"]);
        let mut m = MatchState::search("x", &c, false);
        assert_eq!(m.next().unwrap().record, 2);
        assert_eq!(m.next().unwrap().record, 3);
        assert_eq!(m.next().unwrap().record, 0);
        assert_eq!(m.previous().unwrap().record, 3);
    }

    #[test]
    fn go_to_out_of_range_is_noop() {
        let c = corpus(&["x", "x"]);
        let mut m = MatchState::search("x", &c, false);
        m.next();
        assert_eq!(m.go_to(0), None);
        assert_eq!(m.go_to(3), None);
        assert_eq!(m.current(), Some(1));
        assert_eq!(m.go_to(1).unwrap().record, 0);
    }

    #[test]
    fn target_follows_display_mode() {
        let c = corpus(&["a", "x", "b", "x"]);
        let mut m = MatchState::search("x", &c, false);
        m.next();
        assert_eq!(m.target(), Some(NavTarget { record: 3, view_index: 3 }));
        assert_eq!(
            m.toggle_show_only_matches(),
            Some(NavTarget { record: 3, view_index: 1 })
        );
        assert!(m.show_only_matches());
        assert_eq!(m.matches(), &[1, 3]);
    }

    #[test]
    fn clear_keeps_mode() {
        let c = corpus(&["x"]);
        let mut m = MatchState::search("x", &c, true);
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.current(), None);
        assert!(m.show_only_matches());
    }
}
