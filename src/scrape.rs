// src/scrape.rs
//
// League run: discover → gate → per team (throttle, fetch, extract, save).
// Per-team failures are recorded and the run moves on; only an unusable
// output directory or a failed discovery stops it.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::leagues::League;
use crate::config::options::ScrapeOptions;
use crate::core::clock::Clock;
use crate::core::net::{FetchError, Fetcher, Transport};
use crate::data::TeamEntry;
use crate::progress::Progress;
use crate::specs::{roster, teams};
use crate::store::{self, StoreError};
use crate::throttle::Throttle;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("cannot create output dir {}: {source}", path.display())]
    OutDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("team discovery failed for {league}: {source}")]
    Discovery {
        league: &'static str,
        #[source]
        source: FetchError,
    },

    #[error("no teams found for {league} at {url}")]
    NoTeams { league: &'static str, url: String },
}

/// Why one team did not produce a file.
#[derive(Debug, Error)]
pub enum TeamError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no players found")]
    NoPlayers,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct TeamOutcome {
    pub team_id: String,
    pub url: String,
    pub path: PathBuf,
    /// Players written, or why not.
    pub result: Result<usize, TeamError>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub league: &'static str,
    pub discovered: usize,
    pub outcomes: Vec<TeamOutcome>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Teams left out by the first-team-only gate.
    pub fn skipped(&self) -> usize {
        self.discovered - self.outcomes.len()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} discovered, {} ok, {} failed, {} skipped",
            self.league,
            self.discovered,
            self.succeeded(),
            self.failed(),
            self.skipped()
        )?;
        for o in &self.outcomes {
            match &o.result {
                Ok(n) => writeln!(f, "  ok    {:<28} {n:>3} players  {}", o.team_id, o.path.display())?,
                Err(e) => writeln!(f, "  FAIL  {:<28} {e}  ({})", o.team_id, o.url)?,
            }
        }
        Ok(())
    }
}

/// The teams a run will actually process.
pub fn select_teams(teams: BTreeMap<String, TeamEntry>, scrape_all: bool) -> Vec<TeamEntry> {
    let total = teams.len();
    let selected: Vec<TeamEntry> = if scrape_all {
        teams.into_values().collect()
    } else {
        teams.into_values().take(1).collect()
    };
    if selected.len() < total {
        warn!(total, "scrape-all is off: processing the first team only");
    }
    selected
}

fn scrape_team<T: Transport, C: Clock>(
    fetcher: &Fetcher<T, C>,
    entry: &TeamEntry,
    path: &std::path::Path,
) -> Result<usize, TeamError> {
    let html = fetcher.fetch(&entry.roster_url)?;
    let players = roster::extract(&html);
    if players.is_empty() {
        return Err(TeamError::NoPlayers);
    }
    Ok(store::save_team(&entry.label, players, path)?)
}

/// Scrape one league into `opts.out_dir`.
pub fn run_league<T: Transport, C: Clock>(
    fetcher: &Fetcher<T, C>,
    league: &'static League,
    opts: &ScrapeOptions,
    progress: &mut dyn Progress,
) -> Result<RunSummary, ScrapeError> {
    fs::create_dir_all(&opts.out_dir)
        .map_err(|source| ScrapeError::OutDir { path: opts.out_dir.clone(), source })?;

    progress.log(&format!("Discovering {league} teams…"));
    let found = teams::discover_league(fetcher, league, opts.season)
        .map_err(|source| ScrapeError::Discovery { league: league.key, source })?;
    if found.is_empty() {
        return Err(ScrapeError::NoTeams { league: league.key, url: league.landing_url() });
    }

    let discovered = found.len();
    let selected = select_teams(found, opts.scrape_all);
    progress.begin(selected.len());

    let mut throttle = Throttle::new(fetcher.clock(), opts.team_pause);
    let mut outcomes = Vec::with_capacity(selected.len());

    for entry in selected {
        throttle.wait();

        let path = opts.team_path(&entry.team_id);
        info!(league = league.key, team = %entry.team_id, url = %entry.roster_url, "scraping team");
        progress.log(&format!("Scraping {} → {}", entry.team_id, entry.roster_url));

        let result = scrape_team(fetcher, &entry, &path);
        throttle.done();
        match &result {
            Ok(n) => {
                info!(team = %entry.team_id, players = n, path = %path.display(), "team saved");
                progress.item_done(&entry.team_id);
            }
            Err(e) => {
                error!(team = %entry.team_id, url = %entry.roster_url, error = %e, "team failed");
                progress.item_failed(&entry.team_id, &e.to_string());
            }
        }

        outcomes.push(TeamOutcome { team_id: entry.team_id, url: entry.roster_url, path, result });
    }

    progress.finish();
    Ok(RunSummary { league: league.key, discovered, outcomes })
}
