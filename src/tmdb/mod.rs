use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

mod client;
pub mod models;

pub use client::TmdbClient;
pub use models::{
    CastMember, Credits, CrewMember, Detail, Genre, Movie, MovieDetails, Paged, PersonDetails,
    SearchResult, Show, ShowDetails, Title, Video,
};

/// Query parameters forwarded verbatim to the discover endpoints.
pub type DiscoverFilters = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("TMDB API error: {status} {status_text}")]
    Status { status: u16, status_text: String },

    #[error("TMDB request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("TMDB response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("TMDB request cancelled")]
    Cancelled,
}

impl CatalogError {
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn trending_movies(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Movie>>;
    async fn popular_movies(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Movie>>;
    async fn top_rated_movies(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Movie>>;
    async fn upcoming_movies(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Movie>>;
    async fn now_playing_movies(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Movie>>;

    async fn trending_shows(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Show>>;
    async fn popular_shows(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Show>>;
    async fn top_rated_shows(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Show>>;
    async fn airing_today_shows(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Show>>;
    async fn on_the_air_shows(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Show>>;

    async fn movie_details(&self, id: &str, cancel: &CancellationToken)
        -> CatalogResult<MovieDetails>;
    async fn show_details(&self, id: &str, cancel: &CancellationToken)
        -> CatalogResult<ShowDetails>;
    async fn person_details(&self, id: &str, cancel: &CancellationToken)
        -> CatalogResult<PersonDetails>;

    async fn search_multi(&self, query: &str, cancel: &CancellationToken)
        -> CatalogResult<Vec<SearchResult>>;
    async fn search_movies(&self, query: &str, cancel: &CancellationToken)
        -> CatalogResult<Vec<Movie>>;
    async fn search_shows(&self, query: &str, cancel: &CancellationToken)
        -> CatalogResult<Vec<Show>>;

    async fn movie_genres(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Genre>>;
    async fn show_genres(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Genre>>;

    async fn discover_movies(
        &self,
        filters: &DiscoverFilters,
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<Movie>>;
    async fn discover_shows(
        &self,
        filters: &DiscoverFilters,
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<Show>>;
}
