// src/config/consts.rs

// Net config
pub const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0 Safari/537.36",
];
pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const REFERER: &str = "https://www.google.com/";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Retry
pub const ROSTER_ATTEMPTS: u32 = 5;
pub const DOWNLOAD_ATTEMPTS: u32 = 1;
pub const BACKOFF_BASE_MS: u64 = 1_000;
pub const JITTER_MS: u64 = 1_500; // extra 0..1500 ms

// Scrape
pub const DEFAULT_SEASON: u16 = 2025;
pub const TEAM_PAUSE_SECS: u64 = 40; // be polite
pub const DEFAULT_OUT_DIR: &str = "data";

// Remote JSON (playfootball.games)
pub const GAMES_HOST: &str = "https://playfootball.games";
pub const QUESTIONS_PATH: &str = "/api/futbol-list-a/";
pub const BINGO_PATH: &str = "/api/football-bingo/";
pub const BINGO_MEDIA_PATH: &str = "/media/categories/";
pub const DEFAULT_QUESTIONS_DIR: &str = "data/remote_q";
pub const DEFAULT_BINGO_DIR: &str = "data/remote_bingo";
pub const QUESTIONS_FILE: &str = "all_questions.json";

// Bingo cache
pub const BINGO_TTL_SECS: u64 = 30 * 60;
pub const BINGO_CACHE_CAPACITY: u64 = 256;

// Server
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CORS_ORIGIN: &str = "*";
