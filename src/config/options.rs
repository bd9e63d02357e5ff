// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;
use super::leagues::League;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Process every discovered team. Off = first team only (safety mode).
    pub scrape_all: bool,
    /// League data directory. Team files land directly inside it.
    pub out_dir: PathBuf,
    pub season: u16,
    /// Fetch budget per roster page.
    pub max_attempts: u32,
    /// Pause between one team finishing and the next starting.
    pub team_pause: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            scrape_all: false,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            season: DEFAULT_SEASON,
            max_attempts: ROSTER_ATTEMPTS,
            team_pause: Duration::from_secs(TEAM_PAUSE_SECS),
        }
    }
}

impl ScrapeOptions {
    /// Defaults for one league: output goes to `<root>/<league key>`.
    pub fn for_league(league: &League, root: &Path) -> Self {
        Self { out_dir: root.join(league.key), ..Self::default() }
    }

    pub fn team_path(&self, team_id: &str) -> PathBuf {
        self.out_dir.join(join!(team_id, ".json"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteKind {
    Questions,
    Bingo,
}

impl RemoteKind {
    pub fn url(self, id: u32) -> String {
        let path = match self {
            RemoteKind::Questions => QUESTIONS_PATH,
            RemoteKind::Bingo => BINGO_PATH,
        };
        format!("{GAMES_HOST}{path}{id}.json")
    }

    pub fn default_dir(self) -> &'static str {
        match self {
            RemoteKind::Questions => DEFAULT_QUESTIONS_DIR,
            RemoteKind::Bingo => DEFAULT_BINGO_DIR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadOptions {
    pub kind: RemoteKind,
    pub start: u32,
    /// Inclusive.
    pub end: u32,
    pub out_dir: PathBuf,
}

impl DownloadOptions {
    pub fn new(kind: RemoteKind, start: u32, end: u32) -> Self {
        Self { kind, start, end, out_dir: PathBuf::from(kind.default_dir()) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerOptions {
    pub port: u16,
    /// Holds one sub-directory per league key.
    pub data_dir: PathBuf,
    pub questions_file: PathBuf,
    pub bingo_dir: PathBuf,
    pub cors_origin: String,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_OUT_DIR),
            questions_file: PathBuf::from(DEFAULT_OUT_DIR).join(QUESTIONS_FILE),
            bingo_dir: PathBuf::from(DEFAULT_BINGO_DIR),
            cors_origin: s!(DEFAULT_CORS_ORIGIN),
        }
    }
}
