//! Match navigation integration harness.
//!
//! # What this covers
//!
//! - **Cyclic navigation**: `next()` N times returns to the start; `previous()`
//!   wraps from the first match to the last.
//! - **Go-to bounds**: `go_to(0)` and `go_to(N+1)` leave the cursor alone.
//! - **Display modes**: navigation targets re-expressed for the
//!   only-matches view and the full view.
//! - **Viewer reducer**: search, toggle and navigation through
//!   [`ViewerState::apply`], including scroll targets.
//!
//! # Running
//!
//! ```sh
//! cargo test --test navigation_harness
//! ```

mod common;
use common::*;

use hitline_core::{Action, MatchState, NavTarget, ViewerState};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn apply_all(state: ViewerState, actions: impl IntoIterator<Item = Action>) -> ViewerState {
    actions.into_iter().fold(state, |s, a| s.apply(a).state)
}

#[test]
fn previous_wraps_to_last() {
    let corpus = corpus_of_tags(&["x", "a", "x", "x"]);
    let mut matches = MatchState::search("x", &corpus, false);
    assert_eq!(matches.current(), Some(0));
    let target = matches.previous();
    assert_eq!(
        target,
        Some(NavTarget {
            record: 3,
            view_index: 3
        })
    );
    assert_eq!(matches.current(), Some(2));
}

#[test]
fn goto_bounds_are_no_ops() {
    let corpus = corpus_of_tags(&["x", "x", "x"]);
    let mut matches = MatchState::search("x", &corpus, false);
    matches.next();
    assert_eq!(matches.go_to(0), None);
    assert_eq!(matches.go_to(4), None);
    assert_eq!(matches.current(), Some(1));
    assert_eq!(matches.go_to(3).map(|t| t.record), Some(2));
}

#[test]
fn only_matches_targets_use_match_rank() {
    let corpus = corpus_of_tags(&["a", "x", "b", "x"]);
    let mut matches = MatchState::search("x", &corpus, true);
    let target = matches.next().unwrap();
    assert_eq!(target.record, 3);
    assert_eq!(target.view_index, 1);

    let target = matches.toggle_show_only_matches().unwrap();
    assert_eq!(target.view_index, 3);
}

#[test]
fn empty_match_set_navigation_is_inert() {
    let corpus = corpus_of_tags(&["a", "b"]);
    let mut matches = MatchState::search("zzz", &corpus, false);
    assert!(matches.is_empty());
    assert_eq!(matches.next(), None);
    assert_eq!(matches.previous(), None);
    assert_eq!(matches.current(), None);
}

#[test]
fn reducer_follows_matches_in_only_matches_view() {
    let state = apply_all(
        viewer_of_tags(&["a", "x", "b", "x", "x"]),
        [
            Action::ToggleShowOnlyMatches,
            Action::SetQuery("x".into()),
            Action::SubmitSearch,
        ],
    );
    assert_eq!(state.view(), &[1, 3, 4]);
    assert_eq!(state.selected(), Some(1));

    let t = state.apply(Action::PreviousMatch);
    assert_eq!(t.state.selected(), Some(4));
    assert_eq!(t.scroll_to, Some(2));
}

#[test]
fn reset_clears_search_and_view() {
    let state = apply_all(
        viewer_of_tags(&["a", "x"]),
        [
            Action::ToggleShowOnlyMatches,
            Action::SetQuery("x".into()),
            Action::SubmitSearch,
            Action::ResetFilter,
        ],
    );
    assert!(state.matches().is_empty());
    assert_eq!(state.view(), &[0, 1]);
    assert_eq!(state.version(), 4);
}

proptest! {
    #[test]
    fn next_cycles_back_to_start(n in 1usize..30, extra in 0usize..5) {
        let tags: Vec<&str> = (0..n + extra).map(|i| if i < n { "x" } else { "y" }).collect();
        let corpus = corpus_of_tags(&tags);
        let mut matches = MatchState::search("x", &corpus, false);
        prop_assert_eq!(matches.len(), n);
        for _ in 0..n {
            matches.next();
        }
        prop_assert_eq!(matches.current(), Some(0));
    }
}
