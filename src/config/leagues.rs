// src/config/leagues.rs
//
// Static registry of the scraped competitions. Each entry carries where its
// landing page lives and the club-name tokens that get dropped when turning a
// display name into a canonical team id.

use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub struct League {
    /// Short key: CLI argument, data sub-directory and URL segment.
    pub key: &'static str,
    pub name: &'static str,
    /// Scheme + host, no trailing slash. Relative links are resolved against it.
    pub host: &'static str,
    pub landing_path: &'static str,
    /// Whole-token substitutions applied before stripping.
    pub rewrites: &'static [(&'static str, &'static str)],
    /// Leading club-type tokens ("fc", "sv", …).
    pub prefixes: &'static [&'static str],
    /// Trailing club-type tokens ("cf", "fc", …).
    pub suffixes: &'static [&'static str],
}

impl League {
    pub fn landing_url(&self) -> String {
        join!(self.host, self.landing_path)
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.key)
    }
}

pub static PREMIER: League = League {
    key: "premier",
    name: "Premier League",
    host: "https://www.transfermarkt.com",
    landing_path: "/premier-league/startseite/wettbewerb/GB1",
    rewrites: &[],
    prefixes: &["fc", "afc"],
    suffixes: &["fc", "afc"],
};

pub static LALIGA: League = League {
    key: "laligaes",
    name: "LaLiga",
    host: "https://www.transfermarkt.es",
    landing_path: "/laliga/startseite/wettbewerb/ES1",
    rewrites: &[],
    prefixes: &["fc", "ud", "rc", "rcd", "deportivo"],
    suffixes: &["cf", "fc"],
};

pub static SERIE_A: League = League {
    key: "seriea",
    name: "Serie A",
    host: "https://www.transfermarkt.es",
    landing_path: "/serie-a/startseite/wettbewerb/IT1",
    rewrites: &[],
    prefixes: &["fc", "ud", "rc", "rcd", "deportivo", "ac", "ssc", "us"],
    suffixes: &["cf", "fc"],
};

pub static LIGUE_1: League = League {
    key: "ligue1",
    name: "Ligue 1",
    host: "https://www.transfermarkt.es",
    landing_path: "/ligue-1/startseite/wettbewerb/FR1",
    rewrites: &[],
    prefixes: &["ogc", "ac", "fc", "as", "rc"],
    suffixes: &["fc"],
};

pub static BUNDESLIGA: League = League {
    key: "bundesliga",
    name: "Bundesliga",
    host: "https://www.transfermarkt.es",
    landing_path: "/bundesliga/startseite/wettbewerb/L1",
    rewrites: &[("bvb", "borussia")],
    prefixes: &["1", "fc", "sv", "vfl", "vfb", "tsg"],
    suffixes: &["fc"],
};

pub static LEAGUES: [&League; 5] = [&PREMIER, &LALIGA, &SERIE_A, &LIGUE_1, &BUNDESLIGA];

/// Case-insensitive lookup by key.
pub fn by_key(key: &str) -> Option<&'static League> {
    let key = key.trim();
    LEAGUES.iter().copied().find(|l| l.key.eq_ignore_ascii_case(key))
}

pub fn keys() -> impl Iterator<Item = &'static str> {
    LEAGUES.iter().map(|l| l.key)
}
