// src/specs/teams.rs
//! Scraping *spec* for a league landing page.
//!
//! Purpose:
//! - Find every club link (`…/startseite/verein/{id}…`) on the competition page.
//! - Derive the canonical team id (file stem) from the link's display name.
//! - Turn the club link into the season-qualified squad URL.
//!
//! A club is usually linked several times (crest, name, table row). All of
//! them canonicalize to the same id; the last one seen wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use tracing::{debug, info};

use crate::config::leagues::League;
use crate::core::clock::Clock;
use crate::core::html::{attr, text_of};
use crate::core::net::{FetchError, Fetcher, Transport};
use crate::core::sanitize::canonical_team_id;
use crate::data::TeamEntry;

static CLUB_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/startseite/verein/(\d+)").expect("club link regex"));

static CLUB_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?/verein/\d+)").expect("club path regex"));

/// Squad URL for a club link: absolute, `kader` view, pinned to `season`.
pub fn roster_url(league: &League, href: &str, season: u16) -> String {
    let abs = if href.starts_with("http://") || href.starts_with("https://") {
        s!(href)
    } else if href.starts_with('/') {
        join!(league.host, href)
    } else {
        join!(league.host, "/", href)
    };
    let kader = abs.replacen("/startseite/", "/kader/", 1);
    let base = CLUB_PATH
        .captures(&kader)
        .map(|c| c[1].to_string())
        .unwrap_or(kader);
    format!("{base}/saison_id/{season}")
}

/// Teams linked from a landing page, keyed (and therefore ordered) by team id.
pub fn discover(html: &str, league: &League, season: u16) -> BTreeMap<String, TeamEntry> {
    let doc = Html::parse_document(html);
    let mut teams = BTreeMap::new();

    for a in doc.select(selector!("a[href]")) {
        let Some(href) = attr(a, "href") else { continue };
        if !CLUB_LINK.is_match(&href) {
            continue;
        }

        let label = Some(text_of(a))
            .filter(|t| !t.is_empty())
            .or_else(|| attr(a, "title"))
            .unwrap_or_else(|| href.clone());

        let mut team_id = canonical_team_id(&label, league);
        if team_id.is_empty() {
            team_id = canonical_team_id(&href, league);
        }
        if team_id.is_empty() {
            continue;
        }

        let url = roster_url(league, &href, season);
        debug!(league = league.key, team = %team_id, %url, "club link");
        teams.insert(team_id.clone(), TeamEntry { team_id, label, roster_url: url });
    }
    teams
}

/// Fetch the league landing page and discover its teams.
pub fn discover_league<T: Transport, C: Clock>(
    fetcher: &Fetcher<T, C>,
    league: &League,
    season: u16,
) -> Result<BTreeMap<String, TeamEntry>, FetchError> {
    let url = league.landing_url();
    info!(league = league.key, %url, "discovering teams");
    let html = fetcher.fetch(&url)?;
    let teams = discover(&html, league, season);
    info!(league = league.key, count = teams.len(), "teams discovered");
    Ok(teams)
}
