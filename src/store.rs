// src/store.rs
//
// Team files on disk: `<league dir>/<team id>.json`, one `TeamDocument` each.
// Writes go through a temp file in the same directory and are renamed into
// place, so readers never see a half-written team.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::data::{PlayerRecord, TeamDocument};
use crate::merge::merge;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bad team JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn io_err<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> StoreError + 'a {
    move |source| StoreError::Io { action, path: path.to_path_buf(), source }
}

/// Merge `records` by identity and replace the team file at `path`.
/// Returns the number of players written.
pub fn save_team<I>(label: &str, records: I, path: &Path) -> Result<usize, StoreError>
where
    I: IntoIterator<Item = PlayerRecord>,
{
    let doc = TeamDocument { team: s!(label), players: merge(records).into_players() };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err("create dir", dir))?;

    let tmp = NamedTempFile::new_in(dir).map_err(io_err("create temp file in", dir))?;
    let mut w = BufWriter::new(tmp);
    serde_json::to_writer_pretty(&mut w, &doc)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
    w.write_all(b"\n").map_err(io_err("write", path))?;
    let tmp = w.into_inner().map_err(|e| StoreError::Io {
        action: "flush",
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;
    tmp.persist(path).map_err(|e| StoreError::Io {
        action: "replace",
        path: path.to_path_buf(),
        source: e.error,
    })?;

    debug!(path = %path.display(), players = doc.players.len(), "team saved");
    Ok(doc.players.len())
}

pub fn load_team(path: &Path) -> Result<TeamDocument, StoreError> {
    let text = fs::read_to_string(path).map_err(io_err("read", path))?;
    serde_json::from_str(&text).map_err(|source| StoreError::Json { path: path.to_path_buf(), source })
}

/// One team file in a league directory.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TeamListing {
    pub file: String,
    pub team: String,
}

#[derive(Deserialize)]
struct LabelOnly {
    #[serde(default)]
    team: String,
}

/// Every `*.json` in `dir`, labelled by its `team` field (file stem if the
/// field is missing or the file does not parse). Sorted by label, ignoring case.
pub fn list_teams(dir: &Path) -> Result<Vec<TeamListing>, StoreError> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err("list", dir))? {
        let path = entry.map_err(io_err("list", dir))?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(file) = path.file_name().and_then(|f| f.to_str()).map(str::to_string) else {
            continue;
        };
        let stem = file.trim_end_matches(".json").to_string();
        let team = fs::read_to_string(&path)
            .ok()
            .and_then(|t| serde_json::from_str::<LabelOnly>(&t).ok())
            .map(|l| l.team)
            .filter(|t| !t.is_empty())
            .unwrap_or(stem);
        out.push(TeamListing { file, team });
    }
    out.sort_by_cached_key(|t| (t.team.to_lowercase(), t.file.clone()));
    Ok(out)
}
