//! Query engine integration harness.
//!
//! # What this covers
//!
//! - **Boolean evaluation**: `AND` / `OR`, grouping, phrases, implicit AND
//!   and left-to-right precedence, over literal haystacks.
//! - **Term extraction**: phrases first, operators dropped, duplicates
//!   removed.
//! - **Corpus search**: the query matched against serialized records,
//!   including fields that only exist in the serialized form.
//! - **Properties**: case-insensitivity and the single-term equivalence with
//!   substring search (proptest).
//!
//! # What this does NOT cover
//!
//! - Match navigation (see `navigation_harness`)
//!
//! # Running
//!
//! ```sh
//! cargo test --test query_harness
//! ```

mod common;
use common::*;

use hitline_core::{evaluate, extract_terms, Corpus, FilterState, MatchState};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[rstest]
#[case("a AND b", "a b", true)]
#[case("a AND b", "a", false)]
#[case("(a OR b) AND c", "b c", true)]
#[case("(a OR b) AND c", "b", false)]
#[case("\"exact phrase\"", "an exact phrase here", true)]
#[case("\"exact phrase\"", "phrase exact", false)]
#[case("", "anything", false)]
#[case("   ", "anything", false)]
#[case("AND OR", "and or", false)]
#[case("alice bob", "bob met alice", true)]
#[case("alice bob", "alice alone", false)]
#[case("ERROR", "an error occurred", true)]
#[case("a or b and c", "a", false)]
#[case("a or b and c", "a c", true)]
#[case("a OR (b AND c", "b c", true)]
#[case("a OR (b AND c", "b", true)]
#[case("(a OR b", "b", false)]
#[case("a ) OR b", "b", true)]
fn evaluates(#[case] query: &str, #[case] haystack: &str, #[case] expected: bool) {
    assert_eq!(
        evaluate(query, haystack),
        expected,
        "evaluate({query:?}, {haystack:?})"
    );
}

// ---------------------------------------------------------------------------
// Term extraction
// ---------------------------------------------------------------------------

#[rstest]
#[case("(error OR warn) AND \"payment failed\"", &["payment failed", "error", "warn"])]
#[case("Error error ERROR", &["error"])]
#[case("\"a b\" \"a b\" c", &["a b", "c"])]
#[case("AND OR ( )", &[])]
#[case("x\"a\"y", &["a", "xy"])]
fn extracts_terms(#[case] query: &str, #[case] expected: &[&str]) {
    assert_eq!(extract_terms(query), expected);
}

// ---------------------------------------------------------------------------
// Corpus search
// ---------------------------------------------------------------------------

#[test]
fn search_sees_serialized_fields() {
    let corpus = Corpus::load(MIXED_ENVELOPE).unwrap();

    let by_service = MatchState::search("payments", &corpus, false);
    assert_eq!(by_service.matches(), &[2]);

    let by_txn = MatchState::search("\"t-1\" AND verifypayment", &corpus, false);
    assert_eq!(by_txn.matches(), &[2]);

    let either = MatchState::search("addToCart OR \"no grammar\"", &corpus, false);
    assert_eq!(either.matches(), &[0, 1]);
}

#[test]
fn filter_query_uses_boolean_engine() {
    let corpus = corpus_of_tags(&["alpha", "beta", "gamma"]);
    let filter = FilterState {
        search_query: "alpha OR gamma".into(),
        ..FilterState::default()
    };
    assert_tags!(corpus, corpus.apply_filter(&filter), ["alpha", "gamma"]);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn single_term_is_case_insensitive_substring(
        term in "[a-z]{1,6}",
        haystack in "[a-zA-Z ]{0,40}",
    ) {
        prop_assume!(term != "and" && term != "or");
        let expected = haystack.to_lowercase().contains(&term);
        prop_assert_eq!(evaluate(&term, &haystack), expected);
        prop_assert_eq!(evaluate(&term.to_uppercase(), &haystack), expected);
    }

    #[test]
    fn and_is_conjunction_of_terms(
        a in "[a-z]{1,4}",
        b in "[a-z]{1,4}",
        haystack in "[a-z ]{0,30}",
    ) {
        prop_assume!(a != "and" && a != "or" && b != "and" && b != "or");
        let expected = haystack.contains(&a) && haystack.contains(&b);
        prop_assert_eq!(evaluate(&format!("{a} AND {b}"), &haystack), expected);
    }
}
