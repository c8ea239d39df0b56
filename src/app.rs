use crate::config::AppConfig;
use crate::store::PreferenceStore;
use crate::tmdb::{CatalogError, DiscoverFilters, Title, TmdbApi, TmdbClient};
use crate::view::DetailView;
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::{CancellationToken, DropGuard};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
    pub image_base_url: String,
    pub preferences: Arc<PreferenceStore>,
}

pub async fn run_server(config: AppConfig) -> Result<()> {
    let image_base_url = config.tmdb.image_base_url.clone();
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(config.tmdb)?);

    let preferences = PreferenceStore::from_path(config.preferences_path);
    if !preferences.is_available() {
        warn!("No preference file location; preferences will not be persisted");
    }

    let state = AppState {
        tmdb,
        image_base_url,
        preferences: Arc::new(preferences),
    };

    let app = build_router(state);

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/movies/trending", get(trending_movies))
        .route("/api/movies/popular", get(popular_movies))
        .route("/api/movies/top-rated", get(top_rated_movies))
        .route("/api/movies/upcoming", get(upcoming_movies))
        .route("/api/movies/now-playing", get(now_playing_movies))
        .route("/api/tv/popular", get(popular_shows))
        .route("/api/tv/top-rated", get(top_rated_shows))
        .route("/api/tv/airing-today", get(airing_today_shows))
        .route("/api/tv/on-the-air", get(on_the_air_shows))
        .route("/api/tv/trending", get(trending_shows))
        .route("/api/movie/:id", get(movie_detail))
        .route("/api/tv/:id", get(show_detail))
        .route("/api/person/:id", get(person_detail))
        .route("/api/search", get(search))
        .route("/api/genres/movie", get(movie_genres))
        .route("/api/genres/tv", get(show_genres))
        .route("/api/discover/movie", get(discover_movies))
        .route("/api/discover/tv", get(discover_shows))
        .route(
            "/api/preferences/:key",
            get(read_preference).put(write_preference),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// Token for one request's upstream calls. The guard cancels it when the handler
/// future is dropped, e.g. because the client went away.
fn request_token() -> (CancellationToken, DropGuard) {
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    (token, guard)
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn list_response<T: Serialize>(what: &str, result: Result<Vec<T>, CatalogError>) -> Response {
    match result {
        Ok(results) => (StatusCode::OK, Json(json!({ "results": results }))).into_response(),
        Err(e) => {
            error!("Error fetching {}: {}", what, e);
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch {}", what),
            )
        }
    }
}

async fn trending_movies(State(state): State<AppState>) -> Response {
    let (cancel, _guard) = request_token();
    list_response("trending movies", state.tmdb.trending_movies(&cancel).await)
}

async fn popular_movies(State(state): State<AppState>) -> Response {
    let (cancel, _guard) = request_token();
    list_response("popular movies", state.tmdb.popular_movies(&cancel).await)
}

async fn top_rated_movies(State(state): State<AppState>) -> Response {
    let (cancel, _guard) = request_token();
    list_response("top rated movies", state.tmdb.top_rated_movies(&cancel).await)
}

async fn upcoming_movies(State(state): State<AppState>) -> Response {
    let (cancel, _guard) = request_token();
    list_response("upcoming movies", state.tmdb.upcoming_movies(&cancel).await)
}

async fn now_playing_movies(State(state): State<AppState>) -> Response {
    let (cancel, _guard) = request_token();
    list_response("now playing movies", state.tmdb.now_playing_movies(&cancel).await)
}

async fn popular_shows(State(state): State<AppState>) -> Response {
    let (cancel, _guard) = request_token();
    list_response("popular TV shows", state.tmdb.popular_shows(&cancel).await)
}

async fn top_rated_shows(State(state): State<AppState>) -> Response {
    let (cancel, _guard) = request_token();
    list_response("top rated TV shows", state.tmdb.top_rated_shows(&cancel).await)
}

async fn airing_today_shows(State(state): State<AppState>) -> Response {
    let (cancel, _guard) = request_token();
    list_response(
        "TV shows airing today",
        state.tmdb.airing_today_shows(&cancel).await,
    )
}

async fn on_the_air_shows(State(state): State<AppState>) -> Response {
    let (cancel, _guard) = request_token();
    list_response("on the air TV shows", state.tmdb.on_the_air_shows(&cancel).await)
}

async fn trending_shows(State(state): State<AppState>) -> Response {
    let (cancel, _guard) = request_token();
    list_response("trending TV shows", state.tmdb.trending_shows(&cancel).await)
}

async fn movie_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let (cancel, _guard) = request_token();
    match state.tmdb.movie_details(&id, &cancel).await {
        Ok(details) => Json(DetailView::from_movie(&details, &state.image_base_url)).into_response(),
        Err(e) => {
            warn!("Error fetching movie details for '{}': {}", id, e);
            error_body(StatusCode::NOT_FOUND, "Movie not found")
        }
    }
}

async fn show_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let (cancel, _guard) = request_token();
    match state.tmdb.show_details(&id, &cancel).await {
        Ok(details) => Json(DetailView::from_show(&details, &state.image_base_url)).into_response(),
        Err(e) => {
            warn!("Error fetching TV details for '{}': {}", id, e);
            error_body(StatusCode::NOT_FOUND, "TV show not found")
        }
    }
}

async fn person_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let (cancel, _guard) = request_token();
    match state.tmdb.person_details(&id, &cancel).await {
        Ok(person) => Json(person).into_response(),
        Err(e) => {
            warn!("Error fetching person details for '{}': {}", id, e);
            error_body(StatusCode::NOT_FOUND, "Person not found")
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Json(json!({ "query": "", "results": [] })).into_response();
    }

    let (cancel, _guard) = request_token();
    match state.tmdb.search_multi(&query, &cancel).await {
        Ok(hits) => {
            // Only movies and shows with some artwork make it to the results grid.
            let results: Vec<Title> = hits
                .into_iter()
                .filter_map(|hit| hit.into_title())
                .filter(|t| t.poster_path().is_some() || t.backdrop_path().is_some())
                .collect();
            Json(json!({ "query": query, "results": results })).into_response()
        }
        Err(e) => {
            error!("Error searching for '{}': {}", query, e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to search")
        }
    }
}

async fn movie_genres(State(state): State<AppState>) -> Response {
    let (cancel, _guard) = request_token();
    genre_response("movie genres", state.tmdb.movie_genres(&cancel).await)
}

async fn show_genres(State(state): State<AppState>) -> Response {
    let (cancel, _guard) = request_token();
    genre_response("TV genres", state.tmdb.show_genres(&cancel).await)
}

fn genre_response<T: Serialize>(what: &str, result: Result<Vec<T>, CatalogError>) -> Response {
    match result {
        Ok(genres) => Json(json!({ "genres": genres })).into_response(),
        Err(e) => {
            error!("Error fetching {}: {}", what, e);
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch {}", what),
            )
        }
    }
}

async fn discover_movies(
    State(state): State<AppState>,
    Query(filters): Query<DiscoverFilters>,
) -> Response {
    let (cancel, _guard) = request_token();
    list_response(
        "discovered movies",
        state.tmdb.discover_movies(&filters, &cancel).await,
    )
}

async fn discover_shows(
    State(state): State<AppState>,
    Query(filters): Query<DiscoverFilters>,
) -> Response {
    let (cancel, _guard) = request_token();
    list_response(
        "discovered TV shows",
        state.tmdb.discover_shows(&filters, &cancel).await,
    )
}

async fn read_preference(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    let store = state.preferences.clone();
    match tokio::task::spawn_blocking(move || store.read(&key, Value::Null)).await {
        Ok(value) => Json(value).into_response(),
        Err(e) => {
            error!("Preference read task failed: {}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read preference")
        }
    }
}

async fn write_preference(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(value): Json<Value>,
) -> Response {
    let store = state.preferences.clone();
    match tokio::task::spawn_blocking(move || store.write(&key, &value)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Preference write task failed: {}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store preference")
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
