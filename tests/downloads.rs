// tests/downloads.rs
use std::fs;

use futbol_scrape::config::options::{DownloadOptions, RemoteKind};
use futbol_scrape::core::clock::ManualClock;
use futbol_scrape::core::net::{FetchError, Fetcher, RawResponse, RequestHeaders, Transport};
use futbol_scrape::download::{QuestionsDocument, combine_questions, download_range};
use futbol_scrape::progress::NullProgress;

/// 140 and 142 are valid questions, 141 is not JSON, 143 is a 404.
struct QuizSite;

impl Transport for QuizSite {
    fn get(&self, url: &str, _h: &RequestHeaders) -> Result<RawResponse, FetchError> {
        let body = |s: &str| -> Result<RawResponse, FetchError> {
            Ok(RawResponse { status: 200, body: s.to_string() })
        };
        match url.rsplit('/').next() {
            Some("140.json") => body(r#"{"gameData":{"question":"Who?","answers":["Messi"]}}"#),
            Some("141.json") => body("<html>maintenance</html>"),
            Some("142.json") => body(r#"{"gameData":{"question":"Where?","answers":["Rosario"]}}"#),
            _ => Ok(RawResponse { status: 404, body: String::new() }),
        }
    }
}

#[test]
fn downloads_valid_ids_and_combines_them() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = ManualClock::new();
    let fetcher = Fetcher::new(QuizSite, &clock, 1);
    let opts = DownloadOptions {
        out_dir: tmp.path().join("remote_q"),
        ..DownloadOptions::new(RemoteKind::Questions, 140, 143)
    };

    let report = download_range(&fetcher, &opts, &mut NullProgress).unwrap();
    assert_eq!(report.saved.len(), 2);
    let failed: Vec<u32> = report.failed.iter().map(|(id, _)| *id).collect();
    assert_eq!(failed, [141, 143]);
    assert!(opts.out_dir.join("142.json").exists());
    assert!(!opts.out_dir.join("141.json").exists());
    assert!(clock.sleeps().is_empty());

    let (path, n) = combine_questions(&opts.out_dir).unwrap();
    assert_eq!(n, 2);
    assert_eq!(path, tmp.path().join("all_questions.json"));
    let doc: QuestionsDocument = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(doc.questions[0].game_data.answers, ["Messi"]);
}

#[test]
fn empty_range_downloads_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = ManualClock::new();
    let fetcher = Fetcher::new(QuizSite, &clock, 1);
    let opts = DownloadOptions { out_dir: tmp.path().to_path_buf(), ..DownloadOptions::new(RemoteKind::Bingo, 10, 9) };
    let report = download_range(&fetcher, &opts, &mut NullProgress).unwrap();
    assert!(report.saved.is_empty() && report.failed.is_empty());
}
