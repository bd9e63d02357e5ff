// src/download.rs
//
// Numbered remote JSON documents (quiz questions, bingo boards) saved as
// `<out>/<id>.json`, plus the quiz combiner that folds a directory of question
// files into one `all_questions.json` next to it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::consts::QUESTIONS_FILE;
use crate::config::options::DownloadOptions;
use crate::core::clock::Clock;
use crate::core::net::{Fetcher, Transport};
use crate::progress::Progress;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameData {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(rename = "gameData", default)]
    pub game_data: GameData,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionsDocument {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub saved: Vec<PathBuf>,
    /// Ids that were skipped, with the reason.
    pub failed: Vec<(u32, String)>,
}

/// Fetch every id in `start..=end`. A bad id is reported and skipped.
pub fn download_range<T: Transport, C: Clock>(
    fetcher: &Fetcher<T, C>,
    opts: &DownloadOptions,
    progress: &mut dyn Progress,
) -> Result<DownloadReport, DownloadError> {
    fs::create_dir_all(&opts.out_dir).map_err(|source| DownloadError::Io {
        action: "create dir",
        path: opts.out_dir.clone(),
        source,
    })?;

    let mut report = DownloadReport::default();
    if opts.start > opts.end {
        return Ok(report);
    }
    progress.begin((opts.end - opts.start) as usize + 1);

    for id in opts.start..=opts.end {
        let url = opts.kind.url(id);
        progress.log(&format!("Fetching {url}"));
        match fetch_json(fetcher, &url) {
            Ok(body) => {
                let path = opts.out_dir.join(format!("{id}.json"));
                match fs::write(&path, body) {
                    Ok(()) => {
                        info!(id, path = %path.display(), "saved");
                        progress.item_done(&id.to_string());
                        report.saved.push(path);
                    }
                    Err(e) => {
                        warn!(id, path = %path.display(), error = %e, "write failed");
                        progress.item_failed(&id.to_string(), &e.to_string());
                        report.failed.push((id, e.to_string()));
                    }
                }
            }
            Err(msg) => {
                warn!(id, %url, error = %msg, "skipped");
                progress.item_failed(&id.to_string(), &msg);
                report.failed.push((id, msg));
            }
        }
    }

    progress.finish();
    Ok(report)
}

fn fetch_json<T: Transport, C: Clock>(fetcher: &Fetcher<T, C>, url: &str) -> Result<String, String> {
    let body = fetcher.fetch(url).map_err(|e| e.to_string())?;
    serde_json::from_str::<serde_json::Value>(&body).map_err(|e| format!("invalid json: {e}"))?;
    Ok(body)
}

/// `<dir>/../all_questions.json`
pub fn combined_path(dir: &Path) -> PathBuf {
    dir.parent().unwrap_or(Path::new("")).join(QUESTIONS_FILE)
}

fn numeric_order(path: &Path) -> (u64, String) {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    (stem.parse().unwrap_or(u64::MAX), s!(stem))
}

/// Fold every `*.json` question in `dir` (numeric order) into one document.
/// Files that cannot be read or parsed are skipped.
pub fn combine_questions(dir: &Path) -> Result<(PathBuf, usize), DownloadError> {
    let read_dir = fs::read_dir(dir).map_err(|source| DownloadError::Io {
        action: "list",
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = read_dir
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort_by_key(|p| numeric_order(p));

    let mut doc = QuestionsDocument::default();
    for path in files {
        let parsed = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|t| serde_json::from_str::<QuizQuestion>(&t).map_err(|e| e.to_string()));
        match parsed {
            Ok(q) => doc.questions.push(q),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping question file"),
        }
    }

    let out = combined_path(dir);
    let json = serde_json::to_string_pretty(&doc)
        .map_err(|source| DownloadError::Encode { path: out.clone(), source })?;
    fs::write(&out, json).map_err(|source| DownloadError::Io {
        action: "write",
        path: out.clone(),
        source,
    })?;

    info!(path = %out.display(), questions = doc.questions.len(), "questions combined");
    Ok((out, doc.questions.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_file_sits_next_to_dir() {
        assert_eq!(combined_path(Path::new("data/remote_q")), Path::new("data").join("all_questions.json"));
    }

    #[test]
    fn combine_orders_numerically_and_skips_bad_files() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("remote_q");
        fs::create_dir_all(&dir).unwrap();
        let q = |text: &str| format!(r#"{{"gameData":{{"question":"{text}","answers":["a"]}},"extra":1}}"#);
        fs::write(dir.join("10.json"), q("ten")).unwrap();
        fs::write(dir.join("9.json"), q("nine")).unwrap();
        fs::write(dir.join("11.json"), "{broken").unwrap();
        fs::write(dir.join("readme.txt"), q("nope")).unwrap();

        let (out, n) = combine_questions(&dir).unwrap();
        assert_eq!(n, 2);
        assert_eq!(out, root.path().join("all_questions.json"));

        let doc: QuestionsDocument = serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
        let texts: Vec<_> = doc.questions.iter().map(|q| q.game_data.question.as_str()).collect();
        assert_eq!(texts, ["nine", "ten"]);
    }
}
