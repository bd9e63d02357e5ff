// src/server.rs
//
// Read-only HTTP surface over the data directory: team files per league,
// team listings, the combined quiz questions and cached bingo boards.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rand::seq::SliceRandom;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::bingo::{BingoError, BingoService};
use crate::config::leagues::{self, LEAGUES, League};
use crate::config::options::ServerOptions;
use crate::download::QuestionsDocument;
use crate::store;

static VALID_TEAM_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._\-]+\.json$").expect("team file regex"));

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("league not found: {0}")]
    UnknownLeague(String),

    #[error("invalid team name: {0}")]
    InvalidTeam(String),

    #[error("invalid bingo id: {0}")]
    InvalidBingoId(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Bingo(#[from] BingoError),

    #[error("server I/O: {0}")]
    Io(#[from] io::Error),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownLeague(_) | ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidTeam(_) | ServerError::InvalidBingoId(_) => StatusCode::BAD_REQUEST,
            ServerError::Bingo(BingoError::Fetch(_)) => StatusCode::BAD_GATEWAY,
            ServerError::Bingo(_) | ServerError::Internal(_) | ServerError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ServerError>;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    opts: ServerOptions,
    bingo: BingoService,
}

impl AppState {
    pub fn new(opts: ServerOptions, bingo: BingoService) -> Self {
        Self { inner: Arc::new(Inner { opts, bingo }) }
    }

    /// Bingo boards from `opts.bingo_dir`, then the live site.
    pub fn from_options(opts: ServerOptions) -> Self {
        let bingo = BingoService::with_defaults(vec![opts.bingo_dir.clone()]);
        Self::new(opts, bingo)
    }

    fn league_dir(&self, key: &str) -> ApiResult<(&'static League, PathBuf)> {
        let league = leagues::by_key(key).ok_or_else(|| ServerError::UnknownLeague(s!(key)))?;
        Ok((league, self.inner.opts.data_dir.join(league.key)))
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow = if origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        match HeaderValue::from_str(origin.trim()) {
            Ok(v) => AllowOrigin::exact(v),
            Err(_) => {
                warn!(origin, "invalid CORS origin, allowing any");
                AllowOrigin::any()
            }
        }
    };
    CorsLayer::new()
        .allow_origin(allow)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.inner.opts.cors_origin);
    Router::new()
        .route("/", get(index))
        .route("/leagues/{league}/{team}", get(team_file))
        .route("/api/get/{league}/{team}", get(team_file))
        .route("/api/list/{league}", get(list_league))
        .route("/api/quiz/questions", get(quiz_questions))
        .route("/api/bingo/{id}", get(bingo_board))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Json<serde_json::Value> {
    let leagues: serde_json::Map<String, serde_json::Value> =
        LEAGUES.iter().map(|l| (s!(l.key), json!(l.name))).collect();
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "active",
        "endpoints": {
            "team": "/api/get/{league}/{team}.json",
            "list": "/api/list/{league}",
            "quiz": "/api/quiz/questions?count=10",
            "bingo": "/api/bingo/{id}"
        },
        "leagues": leagues,
        "examples": [
            "/api/get/premier/manchester-city.json",
            "/api/get/laligaes/real-madrid.json"
        ]
    }))
}

/// `^[A-Za-z0-9._-]+\.json$` and no `..` anywhere.
pub fn valid_team_file(name: &str) -> bool {
    VALID_TEAM_FILE.is_match(name) && !name.contains("..")
}

async fn team_file(
    State(state): State<AppState>,
    Path((league, team)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let (_, dir) = state.league_dir(&league)?;
    if !valid_team_file(&team) {
        return Err(ServerError::InvalidTeam(team));
    }

    let path = dir.join(&team);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "application/json")], bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(ServerError::NotFound(format!("team {league}/{team}")))
        }
        Err(e) => Err(e.into()),
    }
}

async fn list_league(
    State(state): State<AppState>,
    Path(league): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let (league, dir) = state.league_dir(&league)?;
    let teams = tokio::task::spawn_blocking(move || store::list_teams(&dir))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(Json(json!({ "league": league.key, "teams": teams })))
}

#[derive(Debug, Default, Deserialize)]
struct QuizParams {
    /// Kept as text: anything that is not a positive integer means "all".
    count: Option<String>,
}

async fn quiz_questions(
    State(state): State<AppState>,
    Query(params): Query<QuizParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let path = &state.inner.opts.questions_file;
    let text = match tokio::fs::read_to_string(path).await {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ServerError::NotFound(s!("questions file")));
        }
        Err(e) => return Err(e.into()),
    };
    let doc: QuestionsDocument = serde_json::from_str(&text)
        .map_err(|e| ServerError::Internal(format!("could not parse questions file: {e}")))?;

    let total = doc.questions.len();
    let mut questions = doc.questions;
    let count = params.count.as_deref().and_then(|c| c.trim().parse::<usize>().ok()).unwrap_or(0);
    if count > 0 {
        questions.shuffle(&mut rand::thread_rng());
        questions.truncate(count);
    }

    Ok(Json(json!({ "total": total, "returned": questions.len(), "questions": questions })))
}

async fn bingo_board(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id: u32 = raw.trim().parse().map_err(|_| ServerError::InvalidBingoId(raw.clone()))?;
    let board = tokio::task::spawn_blocking(move || state.inner.bingo.load(id))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;
    let value = serde_json::to_value(&*board).map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(Json(value))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

/// Bind `0.0.0.0:<port>` and serve until Ctrl-C.
pub async fn serve(state: AppState) -> Result<(), ServerError> {
    let port = state.inner.opts.port;
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, data_dir = %state.inner.opts.data_dir.display(), "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
