// src/cli.rs
use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};

use crate::config::consts::{DEFAULT_OUT_DIR, DEFAULT_SEASON, ROSTER_ATTEMPTS};
use crate::config::leagues::{self, League};
use crate::config::options::{DownloadOptions, RemoteKind, ScrapeOptions};
use crate::core::net::Fetcher;
use crate::download::{combine_questions, download_range};
use crate::log::{self, LogConfig};
use crate::progress::Progress;
use crate::scrape::run_league;
use crate::specs::teams::discover_league;

#[derive(Debug, Parser)]
#[command(name = "futbol_scrape", version, about = "Scrape club rosters into per-team JSON files")]
pub struct Cli {
    /// Also write a daily log file into this directory.
    #[arg(long, env = "LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape a league's rosters into <out>/<league>/<team>.json
    Scrape(ScrapeArgs),
    /// List the teams discovered on a league's landing page
    Teams {
        #[arg(value_parser = parse_league)]
        league: &'static League,
        #[arg(long, default_value_t = DEFAULT_SEASON)]
        season: u16,
    },
    /// Download quiz question documents by id
    Questions(QuestionsArgs),
    /// Download bingo board documents by id
    Bingo(RangeArgs),
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    #[arg(value_parser = parse_league)]
    pub league: &'static League,

    /// Data root; the league key is appended.
    #[arg(long, short, default_value = DEFAULT_OUT_DIR)]
    pub out: PathBuf,

    /// Process every discovered team instead of only the first.
    #[arg(long, short, env = "SCRAPE_ALL", value_parser = FalseyValueParser::new())]
    pub all: bool,

    #[arg(long, default_value_t = DEFAULT_SEASON)]
    pub season: u16,

    /// Fetch attempts per page.
    #[arg(long, default_value_t = ROSTER_ATTEMPTS)]
    pub attempts: u32,
}

#[derive(Debug, Args)]
pub struct RangeArgs {
    #[arg(long)]
    pub start: Option<u32>,
    /// Inclusive.
    #[arg(long)]
    pub end: Option<u32>,
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct QuestionsArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Fold every downloaded question into ../all_questions.json
    #[arg(long)]
    pub combine: bool,
}

fn parse_league(s: &str) -> Result<&'static League, String> {
    leagues::by_key(s).ok_or_else(|| {
        format!("unknown league '{s}' (expected one of: {})", leagues::keys().collect::<Vec<_>>().join(", "))
    })
}

/// stderr progress: one line per event, `[done/total]` prefix.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, id: &str) {
        self.done += 1;
        eprintln!("[{}/{}] ok {id}", self.done, self.total);
    }

    fn item_failed(&mut self, id: &str, err: &str) {
        self.done += 1;
        eprintln!("[{}/{}] failed {id}: {err}", self.done, self.total);
    }
}

fn range_options(kind: RemoteKind, args: RangeArgs, default: (u32, u32)) -> DownloadOptions {
    let mut opts = DownloadOptions::new(kind, args.start.unwrap_or(default.0), args.end.unwrap_or(default.1));
    if let Some(out) = args.out {
        opts.out_dir = out;
    }
    opts
}

fn download(opts: &DownloadOptions) -> Result<()> {
    let fetcher = Fetcher::http(crate::config::consts::DOWNLOAD_ATTEMPTS)?;
    let report = download_range(&fetcher, opts, &mut ConsoleProgress::default())?;
    println!("saved {} file(s), {} skipped", report.saved.len(), report.failed.len());
    Ok(())
}

pub fn run(cli: Cli) -> Result<()> {
    let _guard = log::init(&LogConfig { dir: cli.log_dir, default_filter: None })
        .wrap_err("cannot set up logging")?;

    match cli.command {
        Command::Scrape(args) => {
            let opts = ScrapeOptions {
                scrape_all: args.all,
                season: args.season,
                max_attempts: args.attempts,
                ..ScrapeOptions::for_league(args.league, &args.out)
            };
            let fetcher = Fetcher::http(opts.max_attempts)?;
            let summary = run_league(&fetcher, args.league, &opts, &mut ConsoleProgress::default())
                .wrap_err_with(|| format!("scrape of {} aborted", args.league))?;
            print!("{summary}");
        }
        Command::Teams { league, season } => {
            let fetcher = Fetcher::http(ROSTER_ATTEMPTS)?;
            let teams = discover_league(&fetcher, league, season)?;
            for t in teams.values() {
                println!("{}\t{}\t{}", t.team_id, t.label, t.roster_url);
            }
        }
        Command::Questions(args) => {
            let opts = range_options(RemoteKind::Questions, args.range, (140, 144));
            download(&opts)?;
            if args.combine {
                let (path, n) = combine_questions(&opts.out_dir)?;
                println!("combined {n} question(s) into {}", path.display());
            }
        }
        Command::Bingo(args) => {
            let opts = range_options(RemoteKind::Bingo, args, (720, 730));
            download(&opts)?;
        }
    }
    Ok(())
}
