//! Loading input and building the initial viewer state.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use hitline_core::{config::Config, Action, Corpus, TimeRange, ViewerState};
use tokio::io::AsyncReadExt;

use crate::cli::ViewOptions;

/// Read the whole input: the file at `path`, or stdin.
pub async fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

/// Normalize `text` and apply the initial time range and search.
///
/// A time range filters the view by range and query together. The query
/// also runs as a search over the whole corpus so matches are available
/// for navigation.
pub async fn open(text: &str, options: &ViewOptions, config: &Config) -> anyhow::Result<ViewerState> {
    let corpus = Corpus::load_async(text, config.load.chunk_size).await?;
    let report = corpus.report();
    tracing::info!(
        hits = report.total_hits,
        loaded = report.loaded,
        skipped = report.skipped(),
        records = corpus.len(),
        "corpus loaded"
    );

    let range = TimeRange::parse(options.from.as_deref(), options.to.as_deref())?;
    let mut state = ViewerState::new(Arc::new(corpus), config.timeline.params());

    if options.only_matches {
        state = state.apply(Action::ToggleShowOnlyMatches).state;
    }
    if let Some(query) = &options.query {
        state = state.apply(Action::SetQuery(query.clone())).state;
        state = state.apply(Action::SubmitSearch).state;
    }
    if !range.is_unbounded() {
        state = state.apply(Action::SetTimeRange(range)).state;
        state = state.apply(Action::ApplyFilter).state;
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENVELOPE: &str = r#"{"rawResponse":{"hits":{"hits":[
        {"_id":"a","_source":{"message":"plain one","timestamp":"2025-10-15T07:00:00Z"}},
        {"_id":"b","_source":{"message":"plain two","timestamp":"2025-10-15T07:00:01Z"}}
    ]}}}"#;

    #[tokio::test]
    async fn open_without_options_shows_everything() {
        let state = open(ENVELOPE, &ViewOptions::default(), &Config::defaults())
            .await
            .unwrap();
        assert_eq!(state.view(), &[0, 1]);
        assert!(state.matches().is_empty());
    }

    #[tokio::test]
    async fn invalid_bound_is_an_error() {
        let options = ViewOptions {
            from: Some("yesterday".into()),
            ..ViewOptions::default()
        };
        let err = open(ENVELOPE, &options, &Config::defaults()).await.unwrap_err();
        assert!(err.to_string().contains("yesterday"), "{err}");
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        assert!(open("{nope", &ViewOptions::default(), &Config::defaults())
            .await
            .is_err());
    }
}
