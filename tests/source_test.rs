mod common;

use damats::source::{input_source, InputSource};
use damats::{parse_statistics, Fetch, FetchError, Highlight, SourceFetcher};
use std::fs;
use tempfile::TempDir;

fn stats_file() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("stats.tsv");
    fs::write(&path, common::STATS_BODY).expect("Failed to write stats");
    (dir, path)
}

#[test]
fn test_local_path_is_fetched_and_parsed() {
    let (_dir, path) = stats_file();
    let reference = path.to_str().unwrap();
    assert!(matches!(input_source(reference), InputSource::Local(_)));

    let body = SourceFetcher::default()
        .fetch(reference, "text/tab-separated-values")
        .unwrap();
    let stats = parse_statistics(&body, Highlight::default()).unwrap();
    assert_eq!(stats.total, 100);
    assert_eq!(stats.lc_classes.len(), 2);
}

#[test]
fn test_file_url_is_fetched() {
    let (_dir, path) = stats_file();
    let url = format!("file://{}", path.display());
    let body = SourceFetcher::default().fetch(&url, "text/plain").unwrap();
    assert_eq!(body, common::STATS_BODY);
}

#[test]
fn test_missing_local_file_reports_path() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let missing = dir.path().join("gone.tsv");
    let err = SourceFetcher::default()
        .fetch(missing.to_str().unwrap(), "text/plain")
        .unwrap_err();
    match err {
        FetchError::Io { path, .. } => assert_eq!(path, missing),
        other => panic!("expected Io error, got {:?}", other),
    }
}
