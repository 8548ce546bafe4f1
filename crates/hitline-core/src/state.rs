//! Viewer state: everything derived from one load, in one value.
//!
//! [`ViewerState::apply`] consumes the state and an [`Action`] and returns
//! the next state together with the view position to scroll to, if any.
//! The corpus is shared behind an [`Arc`]; filter, match and layout state are
//! recomputed from it and replaced wholesale.

use std::sync::Arc;

use crate::corpus::{Corpus, FilterState, TimeRange};
use crate::layout::{TimelineLayout, TimelineParams};
use crate::navigator::{MatchState, NavTarget};
use crate::types::LogRecord;

/// Everything the user can do to a loaded corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetTimeRange(TimeRange),
    SetQuery(String),
    /// Re-filter the full corpus by the current time range and query.
    ApplyFilter,
    /// Run the current query as a search over the full corpus.
    SubmitSearch,
    NextMatch,
    PreviousMatch,
    /// One-based.
    GoToMatch(usize),
    ToggleShowOnlyMatches,
    /// Select the record at a view position, or clear the selection.
    Select(Option<usize>),
    ResetFilter,
}

/// Result of applying an [`Action`].
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: ViewerState,
    /// View position the timeline should centre on.
    pub scroll_to: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ViewerState {
    version: u64,
    corpus: Arc<Corpus>,
    params: TimelineParams,
    filter: FilterState,
    /// Corpus indices currently displayed, ascending.
    view: Vec<usize>,
    matches: MatchState,
    layout: TimelineLayout,
    /// Corpus index of the selected record.
    selected: Option<usize>,
}

impl ViewerState {
    /// Fresh state for a newly loaded corpus: everything visible, nothing
    /// searched or selected.
    pub fn new(corpus: Arc<Corpus>, params: TimelineParams) -> Self {
        let view = corpus.full_view();
        let layout = layout_for(&corpus, &view, params);
        Self {
            version: 0,
            corpus,
            params,
            filter: FilterState::default(),
            view,
            matches: MatchState::default(),
            layout,
            selected: None,
        }
    }

    pub fn apply(mut self, action: Action) -> Transition {
        self.version += 1;
        tracing::debug!(version = self.version, ?action, "applying action");

        let scroll_to = match action {
            Action::SetTimeRange(range) => {
                self.filter.time_range = range;
                None
            }
            Action::SetQuery(query) => {
                self.filter.search_query = query;
                None
            }
            Action::ApplyFilter => {
                let view = self.corpus.apply_filter(&self.filter);
                self.set_view(view);
                None
            }
            Action::SubmitSearch => self.submit_search(),
            Action::NextMatch => {
                let target = self.matches.next();
                self.follow(target)
            }
            Action::PreviousMatch => {
                let target = self.matches.previous();
                self.follow(target)
            }
            Action::GoToMatch(n) => {
                let target = self.matches.go_to(n);
                self.follow(target)
            }
            Action::ToggleShowOnlyMatches => {
                let target = self.matches.toggle_show_only_matches();
                if !self.matches.is_empty() {
                    let view = self.match_view();
                    self.set_view(view);
                }
                target.and_then(|t| self.view_position(t.record))
            }
            Action::Select(position) => {
                self.selected = position.and_then(|p| self.view.get(p).copied());
                position.filter(|_| self.selected.is_some())
            }
            Action::ResetFilter => {
                self.filter = FilterState::default();
                self.matches.clear();
                let view = self.corpus.full_view();
                self.set_view(view);
                None
            }
        };

        Transition {
            state: self,
            scroll_to,
        }
    }

    fn submit_search(&mut self) -> Option<usize> {
        if self.filter.search_query.trim().is_empty() {
            self.matches.clear();
            let view = self.corpus.apply_filter(&self.filter);
            self.set_view(view);
            return None;
        }

        let show_only = self.matches.show_only_matches();
        self.matches = MatchState::search(&self.filter.search_query, &self.corpus, show_only);
        let view = self.match_view();
        self.set_view(view);
        let target = self.matches.target();
        self.follow(target)
    }

    /// The view implied by the match display mode.
    fn match_view(&self) -> Vec<usize> {
        if self.matches.show_only_matches() {
            self.matches.matches().to_vec()
        } else {
            self.corpus.full_view()
        }
    }

    fn follow(&mut self, target: Option<NavTarget>) -> Option<usize> {
        let target = target?;
        self.selected = Some(target.record);
        self.view_position(target.record)
    }

    fn set_view(&mut self, view: Vec<usize>) {
        self.layout = layout_for(&self.corpus, &view, self.params);
        self.view = view;
    }

    /// Position of corpus record `record` in the current view.
    pub fn view_position(&self, record: usize) -> Option<usize> {
        self.view.binary_search(&record).ok()
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Incremented by every transition.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn params(&self) -> &TimelineParams {
        &self.params
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn view(&self) -> &[usize] {
        &self.view
    }

    pub fn matches(&self) -> &MatchState {
        &self.matches
    }

    pub fn layout(&self) -> &TimelineLayout {
        &self.layout
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&LogRecord> {
        self.selected.and_then(|i| self.corpus.get(i))
    }

    /// Record at a view position.
    pub fn view_record(&self, position: usize) -> Option<&LogRecord> {
        self.view.get(position).and_then(|&i| self.corpus.get(i))
    }

    pub fn records_in_view(&self) -> impl Iterator<Item = &LogRecord> + '_ {
        self.view.iter().filter_map(|&i| self.corpus.get(i))
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(Arc::new(Corpus::default()), TimelineParams::default())
    }
}

fn layout_for(corpus: &Corpus, view: &[usize], params: TimelineParams) -> TimelineLayout {
    TimelineLayout::compute(
        view.iter()
            .filter_map(|&i| corpus.get(i))
            .map(|r| r.timestamp.as_str()),
        params,
    )
}
