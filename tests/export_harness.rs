//! Export integration harness.
//!
//! # What this covers
//!
//! - **View export**: exactly the records of the current view, in view
//!   order, written as a pretty JSON array into a temp directory.
//! - **Record shape**: camelCase field names, format tags, and no internal
//!   fields such as the parsed instant.
//! - **Failure**: a missing target directory surfaces as `ExportError::Io`.
//!
//! # Running
//!
//! ```sh
//! cargo test --test export_harness
//! ```

mod common;
use common::*;

use std::sync::Arc;

use chrono::TimeZone;
use hitline_core::{export, Action, Corpus, ExportError, TimelineParams, ViewerState};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn read_array(path: &std::path::Path) -> Vec<Value> {
    let body = std::fs::read_to_string(path).unwrap();
    match serde_json::from_str(&body).unwrap() {
        Value::Array(items) => items,
        other => panic!("export is not an array: {other}"),
    }
}

#[test]
fn exports_only_matches_view() {
    let corpus = Corpus::load(MIXED_ENVELOPE).unwrap();
    let state = ViewerState::new(Arc::new(corpus), TimelineParams::default());
    let state = [
        Action::ToggleShowOnlyMatches,
        Action::SetQuery("payments OR addtocart".into()),
        Action::SubmitSearch,
    ]
    .into_iter()
    .fold(state, |s, a| s.apply(a).state);
    assert_eq!(state.view(), &[1, 2]);

    let dir = tempfile::tempdir().unwrap();
    let now = chrono::Utc.with_ymd_and_hms(2025, 10, 15, 9, 30, 0).unwrap();
    let path = export::write_export(dir.path(), state.records_in_view(), now).unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "logs-export-2025-10-15T09-30-00.json"
    );

    let items = read_array(&path);
    let ids: Vec<&str> = items.iter().map(|r| r["hitId"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["a-1", "b-1"]);

    let payment = &items[1];
    assert_eq!(payment["format"], "FORMAT_B");
    assert_eq!(payment["tag"], "verifyPayment");
    assert_eq!(payment["podName"], "pod-b");
    assert!(payment.get("instant").is_none());
    assert!(payment["rawMessage"].as_str().unwrap().starts_with("3 | req-9"));
}

#[test]
fn export_preserves_unstructured_attributes() {
    let corpus = Corpus::load(NESTED_DOCUMENT).unwrap();
    let records: Vec<_> = corpus.records().iter().collect();
    let body = export::export_json(records).unwrap();
    let items: Vec<Value> = serde_json::from_str(&body).unwrap();

    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|r| r["format"] == "UNSTRUCTURED"));
    let login = items
        .iter()
        .find(|r| r["path"] == "session.events.1")
        .unwrap();
    assert_eq!(login["attributes"]["event"], "login");
}

#[test]
fn missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = corpus_of_tags(&["a"]);
    let err = export::write_export(
        &dir.path().join("missing"),
        corpus.records(),
        chrono::Utc::now(),
    )
    .unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }), "{err}");
}
