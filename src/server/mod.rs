//! Read-only JSON view of the stored movies
//!
//! Routes:
//! - `GET /` store overview
//! - `GET /search_movies?q=` and `GET /search_actors?q=`
//! - `GET /movie/{id}` and `GET /actor/{id}`

use crate::config::Config;
use crate::output::{load_statistics, StoreStatistics};
use crate::storage::{ActorRecord, MovieRecord, MovieStorage, SqliteMovieStore, StorageError};
use crate::ReelError;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<SqliteMovieStore>>,
}

impl AppState {
    pub fn new(store: SqliteMovieStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    fn with_store<T>(
        &self,
        f: impl FnOnce(&SqliteMovieStore) -> Result<T, StorageError>,
    ) -> Result<T, ApiError> {
        let store = self.store.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(f(&store)?)
    }
}

#[derive(Debug)]
enum ApiError {
    NotFound,
    Storage(StorageError),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "not_found" }))).into_response()
            }
            Self::Storage(err) => {
                tracing::error!("Request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal_server_error" })),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
struct MovieDetail {
    movie: MovieRecord,
    actors: Vec<ActorRecord>,
}

#[derive(Debug, Serialize)]
struct ActorDetail {
    actor: ActorRecord,
    movies: Vec<MovieRecord>,
}

/// Non-numeric ids are treated like unknown ones
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

async fn index(State(state): State<AppState>) -> Result<Json<StoreStatistics>, ApiError> {
    let stats = state.with_store(|store| load_statistics(store))?;
    Ok(Json(stats))
}

async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<MovieRecord>>, ApiError> {
    let movies = state.with_store(|store| store.search_movies(&params.q))?;
    Ok(Json(movies))
}

async fn search_actors(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ActorRecord>>, ApiError> {
    let actors = state.with_store(|store| store.search_actors(&params.q))?;
    Ok(Json(actors))
}

async fn movie_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MovieDetail>, ApiError> {
    let id = parse_id(&id)?;
    let detail = state.with_store(|store| {
        let Some(movie) = store.get_movie(id)? else {
            return Ok(None);
        };
        let actors = store.get_actors_for_movie(id)?;
        Ok(Some(MovieDetail { movie, actors }))
    })?;
    detail.map(Json).ok_or(ApiError::NotFound)
}

async fn actor_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActorDetail>, ApiError> {
    let id = parse_id(&id)?;
    let detail = state.with_store(|store| {
        let Some(actor) = store.get_actor(id)? else {
            return Ok(None);
        };
        let movies = store.get_movies_for_actor(id)?;
        Ok(Some(ActorDetail { actor, movies }))
    })?;
    detail.map(Json).ok_or(ApiError::NotFound)
}

/// Builds the router over an opened store
pub fn build_router(store: SqliteMovieStore) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search_movies", get(search_movies))
        .route("/search_actors", get(search_actors))
        .route("/movie/{id}", get(movie_detail))
        .route("/actor/{id}", get(actor_detail))
        .with_state(AppState::new(store))
}

/// Serves the stored data until interrupted
///
/// The database is opened read-only; a missing file serves an empty store.
pub async fn serve(config: &Config) -> Result<(), ReelError> {
    let store = SqliteMovieStore::open_read_only(std::path::Path::new(
        &config.output.database_path,
    ))?;
    let app = build_router(store);

    let listener = tokio::net::TcpListener::bind(config.server.bind_address.as_str()).await?;
    tracing::info!(
        "Serving {} on http://{}",
        config.output.database_path,
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
