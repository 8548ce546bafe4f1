//! Domain-specific assertion macros for hitline harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* invariant was violated.

/// Assert that the records of a corpus are in non-decreasing instant order.
///
/// ```rust
/// assert_time_ordered!(corpus);
/// ```
#[macro_export]
macro_rules! assert_time_ordered {
    ($corpus:expr) => {{
        let corpus: &hitline_core::Corpus = &$corpus;
        for (i, pair) in corpus.records().windows(2).enumerate() {
            if pair[0].instant > pair[1].instant {
                panic!(
                    "assert_time_ordered! failed at {}:\n  [{}] {}\n  [{}] {}",
                    i,
                    i,
                    pair[0].timestamp,
                    i + 1,
                    pair[1].timestamp
                );
            }
        }
    }};
}

/// Assert the tags of the records at the given corpus indices.
///
/// ```rust
/// assert_tags!(corpus, state.view(), ["a", "b"]);
/// ```
#[macro_export]
macro_rules! assert_tags {
    ($corpus:expr, $indices:expr, [$($tag:expr),* $(,)?]) => {{
        let corpus: &hitline_core::Corpus = &$corpus;
        let actual: Vec<Option<&str>> = $indices
            .iter()
            .map(|&i: &usize| corpus.get(i).and_then(|r| r.attr("tag")))
            .collect();
        let expected: Vec<Option<&str>> = vec![$(Some($tag)),*];
        pretty_assertions::assert_eq!(actual, expected, "tags at {:?}", $indices);
    }};
}
