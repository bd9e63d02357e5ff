// src/bin/serve.rs
use std::path::PathBuf;

use clap::Parser;
use futbol_scrape::config::consts::{
    DEFAULT_BINGO_DIR, DEFAULT_CORS_ORIGIN, DEFAULT_OUT_DIR, DEFAULT_PORT, QUESTIONS_FILE,
};
use futbol_scrape::config::options::ServerOptions;
use futbol_scrape::log::{self, LogConfig};
use futbol_scrape::server::{self, AppState};

#[derive(Debug, Parser)]
#[command(name = "futbol_serve", version, about = "Serve scraped team JSON over HTTP")]
struct ServeArgs {
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Holds one sub-directory per league.
    #[arg(long, env = "DATA_DIR", default_value = DEFAULT_OUT_DIR)]
    data_dir: PathBuf,

    /// Combined quiz file. Defaults to <data-dir>/all_questions.json
    #[arg(long, env = "QUESTIONS_FILE")]
    questions: Option<PathBuf>,

    #[arg(long, env = "BINGO_DIR", default_value = DEFAULT_BINGO_DIR)]
    bingo_dir: PathBuf,

    #[arg(long, env = "CORS_ORIGIN", default_value = DEFAULT_CORS_ORIGIN)]
    cors_origin: String,

    #[arg(long, env = "LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = ServeArgs::parse();
    let _guard = log::init(&LogConfig {
        dir: args.log_dir,
        default_filter: Some("info,tower_http=debug".into()),
    })?;

    let opts = ServerOptions {
        port: args.port,
        questions_file: args.questions.unwrap_or_else(|| args.data_dir.join(QUESTIONS_FILE)),
        data_dir: args.data_dir,
        bingo_dir: args.bingo_dir,
        cors_origin: args.cors_origin,
    };

    server::serve(AppState::from_options(opts)).await?;
    Ok(())
}
