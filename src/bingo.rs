// src/bingo.rs
//
// Football-bingo boards: read a downloaded `<id>.json` (or fetch it), flatten
// it into categories + players, and memoize the result per id for a fixed TTL.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::consts::{
    BINGO_CACHE_CAPACITY, BINGO_MEDIA_PATH, BINGO_TTL_SECS, DOWNLOAD_ATTEMPTS, GAMES_HOST,
};
use crate::config::options::RemoteKind;
use crate::core::net::{FetchError, Fetcher};

#[derive(Debug, Error)]
pub enum BingoError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bad bingo JSON from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

// Remote shape

#[derive(Debug, Default, Deserialize)]
struct RemoteCategory {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: i64,
    #[serde(default, rename = "displayName")]
    display_name: String,
    #[serde(default, rename = "helperText")]
    helper_text: String,
}

#[derive(Debug, Default, Deserialize)]
struct RemotePlayer {
    #[serde(default)]
    id: i64,
    /// Family name.
    #[serde(default)]
    f: String,
    /// Given name.
    #[serde(default)]
    g: String,
    /// Category ids the player satisfies.
    #[serde(default)]
    v: Vec<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteGameData {
    #[serde(default)]
    remit: Vec<Vec<RemoteCategory>>,
    #[serde(default)]
    players: Vec<RemotePlayer>,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteRoot {
    #[serde(default, rename = "gameData")]
    game_data: RemoteGameData,
}

// Normalized shape

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BingoPlayer {
    pub id: i64,
    pub name: String,
    pub category_ids: Vec<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BingoBoard {
    pub categories: Vec<Category>,
    pub players: Vec<BingoPlayer>,
}

fn full_name(given: String, family: String) -> String {
    match (given.is_empty(), family.is_empty()) {
        (false, false) => format!("{given} {family}"),
        (true, _) => family,
        (false, true) => given,
    }
}

/// Flatten a raw bingo document. `origin` only labels parse errors.
pub fn normalize(json: &str, origin: &str) -> Result<BingoBoard, BingoError> {
    let root: RemoteRoot = serde_json::from_str(json)
        .map_err(|source| BingoError::Parse { origin: s!(origin), source })?;

    let categories = root
        .game_data
        .remit
        .into_iter()
        .flatten()
        .map(|c| Category {
            image: Some(format!("{GAMES_HOST}{BINGO_MEDIA_PATH}{}.webp", c.id)),
            id: c.id,
            name: c.name,
            display_name: c.display_name,
            kind: c.kind,
            helper_text: Some(c.helper_text).filter(|h| !h.is_empty()),
        })
        .collect();

    let players = root
        .game_data
        .players
        .into_iter()
        .map(|p| BingoPlayer { id: p.id, name: full_name(p.g, p.f), category_ids: p.v })
        .collect();

    Ok(BingoBoard { categories, players })
}

// Cache

/// Memo keyed by board id. Implementations must be safe to share across
/// request handlers.
pub trait BingoCache: Send + Sync {
    fn get(&self, id: u32) -> Option<Arc<BingoBoard>>;
    fn put(&self, id: u32, board: Arc<BingoBoard>);
}

/// Concurrent cache with a fixed time-to-live per entry.
pub struct MokaBingoCache {
    inner: Cache<u32, Arc<BingoBoard>>,
}

impl MokaBingoCache {
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        Self { inner: Cache::builder().max_capacity(capacity).time_to_live(ttl).build() }
    }
}

impl Default for MokaBingoCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(BINGO_TTL_SECS), BINGO_CACHE_CAPACITY)
    }
}

impl BingoCache for MokaBingoCache {
    fn get(&self, id: u32) -> Option<Arc<BingoBoard>> { self.inner.get(&id) }
    fn put(&self, id: u32, board: Arc<BingoBoard>) { self.inner.insert(id, board) }
}

// Remote source

/// Where a board comes from when no local copy exists.
pub trait BoardSource: Send + Sync {
    fn fetch(&self, id: u32) -> Result<String, BingoError>;
}

/// Live site. Builds a blocking client per call; run it off the async runtime.
pub struct HttpBoards;

impl BoardSource for HttpBoards {
    fn fetch(&self, id: u32) -> Result<String, BingoError> {
        let fetcher = Fetcher::http(DOWNLOAD_ATTEMPTS)?;
        Ok(fetcher.fetch(&RemoteKind::Bingo.url(id))?)
    }
}

/// Lookup → local file → remote, then populate.
pub struct BingoService {
    cache: Box<dyn BingoCache>,
    local_dirs: Vec<PathBuf>,
    remote: Box<dyn BoardSource>,
}

impl BingoService {
    pub fn new(
        cache: impl BingoCache + 'static,
        local_dirs: Vec<PathBuf>,
        remote: impl BoardSource + 'static,
    ) -> Self {
        Self { cache: Box::new(cache), local_dirs, remote: Box::new(remote) }
    }

    /// TTL cache over `local_dirs`, falling back to the live site.
    pub fn with_defaults(local_dirs: Vec<PathBuf>) -> Self {
        Self::new(MokaBingoCache::default(), local_dirs, HttpBoards)
    }

    /// Blocking; may touch disk and network on a cache miss.
    pub fn load(&self, id: u32) -> Result<Arc<BingoBoard>, BingoError> {
        if let Some(hit) = self.cache.get(id) {
            debug!(id, "bingo cache hit");
            return Ok(hit);
        }

        let board = match self.read_local(id)? {
            Some((json, origin)) => normalize(&json, &origin)?,
            None => {
                let json = self.remote.fetch(id)?;
                normalize(&json, &RemoteKind::Bingo.url(id))?
            }
        };

        info!(id, categories = board.categories.len(), players = board.players.len(), "bingo board loaded");
        let board = Arc::new(board);
        self.cache.put(id, Arc::clone(&board));
        Ok(board)
    }

    fn read_local(&self, id: u32) -> Result<Option<(String, String)>, BingoError> {
        for dir in &self.local_dirs {
            let path = dir.join(format!("{id}.json"));
            match fs::read_to_string(&path) {
                Ok(json) => return Ok(Some((json, path.display().to_string()))),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(BingoError::Read { path, source }),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BOARD: &str = r#"{"gameData":{
        "remit":[[{"id":1,"name":"es","type":2,"displayName":"Spain","prefix":"x"}],
                 [{"id":7,"name":"rm","type":1,"displayName":"Real Madrid","helperText":"Played for"}]],
        "players":[{"id":10,"g":"Sergio","f":"Ramos","v":[1,7]},{"id":11,"g":"","f":"Pepe","v":[7]}]}}"#;

    struct Counting(AtomicUsize);

    impl BoardSource for Counting {
        fn fetch(&self, _id: u32) -> Result<String, BingoError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(s!(BOARD))
        }
    }

    impl BoardSource for Arc<Counting> {
        fn fetch(&self, id: u32) -> Result<String, BingoError> { (**self).fetch(id) }
    }

    #[test]
    fn normalize_flattens_remit_and_names() {
        let b = normalize(BOARD, "test").unwrap();
        assert_eq!(b.categories.len(), 2);
        assert_eq!(
            b.categories[0].image.as_deref(),
            Some("https://playfootball.games/media/categories/1.webp")
        );
        assert_eq!(b.categories[0].helper_text, None);
        assert_eq!(b.categories[1].helper_text.as_deref(), Some("Played for"));
        assert_eq!(b.players[0].name, "Sergio Ramos");
        assert_eq!(b.players[1].name, "Pepe");
        assert_eq!(b.players[0].category_ids, [1, 7]);

        let v = serde_json::to_value(&b).unwrap();
        assert_eq!(v["categories"][0]["displayName"], "Spain");
        assert_eq!(v["players"][0]["categoryIds"], serde_json::json!([1, 7]));
    }

    #[test]
    fn remote_is_fetched_once_then_cached() {
        let src = Arc::new(Counting(AtomicUsize::new(0)));
        let svc = BingoService::new(MokaBingoCache::default(), vec![], Arc::clone(&src));
        let a = svc.load(720).unwrap();
        let b = svc.load(720).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(src.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn local_file_beats_remote() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("5.json"), BOARD).unwrap();
        let src = Arc::new(Counting(AtomicUsize::new(0)));
        let svc = BingoService::new(MokaBingoCache::default(), vec![dir.path().to_path_buf()], Arc::clone(&src));
        assert_eq!(svc.load(5).unwrap().players.len(), 2);
        assert_eq!(src.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn broken_local_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("5.json"), "{").unwrap();
        let svc = BingoService::new(MokaBingoCache::default(), vec![dir.path().to_path_buf()], Counting(AtomicUsize::new(0)));
        assert!(matches!(svc.load(5), Err(BingoError::Parse { .. })));
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = MokaBingoCache::new(Duration::from_millis(30), 8);
        cache.put(1, Arc::new(BingoBoard::default()));
        assert!(cache.get(1).is_some());
        std::thread::sleep(Duration::from_millis(120));
        assert!(cache.get(1).is_none());
    }
}
