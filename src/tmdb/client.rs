use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::models::{GenreList, Paged};
use super::{
    CatalogError, CatalogResult, DiscoverFilters, Genre, Movie, MovieDetails, PersonDetails,
    SearchResult, Show, ShowDetails, TmdbApi,
};
use crate::config::TmdbConfig;

const DETAIL_APPENDS: &str = "videos,credits,similar,recommendations,reviews";
const PERSON_APPENDS: &str = "movie_credits,tv_credits,images";

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> anyhow::Result<Self> {
        let user_agent = format!("cinescope/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TmdbConfig {
        &self.config
    }

    /// `{base}{path}?api_key=..&k=v`, with every key and value percent-encoded.
    fn endpoint_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}",
            self.config.base_url,
            path,
            urlencoding::encode(&self.config.api_key)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> CatalogResult<T> {
        let url = self.endpoint_url(path, params);
        debug!(path = %path, "TMDB request");

        let request = async {
            let res = self.client.get(&url).send().await?;
            let status = res.status();
            if !status.is_success() {
                let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();
                warn!(path = %path, status = status.as_u16(), "TMDB returned an error status");
                return Err(CatalogError::Status {
                    status: status.as_u16(),
                    status_text,
                });
            }
            let bytes = res.bytes().await?;
            let parsed: T = serde_json::from_slice(&bytes)?;
            Ok::<T, CatalogError>(parsed)
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(path = %path, "TMDB request cancelled");
                Err(CatalogError::Cancelled)
            }
            result = request => result.map_err(strip_url),
        }
    }

    async fn results<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<T>> {
        let page: Paged<T> = self.get_json(path, params, cancel).await?;
        Ok(page.results)
    }

    async fn genres(&self, path: &str, cancel: &CancellationToken) -> CatalogResult<Vec<Genre>> {
        let list: GenreList = self.get_json(path, &[], cancel).await?;
        Ok(list.genres)
    }

    async fn discover<T: DeserializeOwned>(
        &self,
        path: &str,
        filters: &DiscoverFilters,
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<T>> {
        let params: Vec<(&str, &str)> = filters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        self.results(path, &params, cancel).await
    }
}

/// reqwest errors embed the request URL, which carries the API key.
fn strip_url(err: CatalogError) -> CatalogError {
    match err {
        CatalogError::Transport(e) => CatalogError::Transport(e.without_url()),
        other => other,
    }
}

fn id_segment(id: &str) -> String {
    urlencoding::encode(id.trim()).into_owned()
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn trending_movies(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Movie>> {
        self.results("/trending/movie/day", &[], cancel).await
    }

    async fn popular_movies(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Movie>> {
        self.results("/movie/popular", &[], cancel).await
    }

    async fn top_rated_movies(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Movie>> {
        self.results("/movie/top_rated", &[], cancel).await
    }

    async fn upcoming_movies(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Movie>> {
        self.results("/movie/upcoming", &[], cancel).await
    }

    async fn now_playing_movies(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Movie>> {
        self.results("/movie/now_playing", &[], cancel).await
    }

    async fn trending_shows(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Show>> {
        self.results("/trending/tv/day", &[], cancel).await
    }

    async fn popular_shows(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Show>> {
        self.results("/tv/popular", &[], cancel).await
    }

    async fn top_rated_shows(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Show>> {
        self.results("/tv/top_rated", &[], cancel).await
    }

    async fn airing_today_shows(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Show>> {
        self.results("/tv/airing_today", &[], cancel).await
    }

    async fn on_the_air_shows(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Show>> {
        self.results("/tv/on_the_air", &[], cancel).await
    }

    async fn movie_details(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> CatalogResult<MovieDetails> {
        let path = format!("/movie/{}", id_segment(id));
        self.get_json(&path, &[("append_to_response", DETAIL_APPENDS)], cancel)
            .await
    }

    async fn show_details(&self, id: &str, cancel: &CancellationToken) -> CatalogResult<ShowDetails> {
        let path = format!("/tv/{}", id_segment(id));
        self.get_json(&path, &[("append_to_response", DETAIL_APPENDS)], cancel)
            .await
    }

    async fn person_details(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> CatalogResult<PersonDetails> {
        let path = format!("/person/{}", id_segment(id));
        self.get_json(&path, &[("append_to_response", PERSON_APPENDS)], cancel)
            .await
    }

    async fn search_multi(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<SearchResult>> {
        self.results("/search/multi", &[("query", query)], cancel).await
    }

    async fn search_movies(&self, query: &str, cancel: &CancellationToken) -> CatalogResult<Vec<Movie>> {
        self.results("/search/movie", &[("query", query)], cancel).await
    }

    async fn search_shows(&self, query: &str, cancel: &CancellationToken) -> CatalogResult<Vec<Show>> {
        self.results("/search/tv", &[("query", query)], cancel).await
    }

    async fn movie_genres(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Genre>> {
        self.genres("/genre/movie/list", cancel).await
    }

    async fn show_genres(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Genre>> {
        self.genres("/genre/tv/list", cancel).await
    }

    async fn discover_movies(
        &self,
        filters: &DiscoverFilters,
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<Movie>> {
        self.discover("/discover/movie", filters, cancel).await
    }

    async fn discover_shows(
        &self,
        filters: &DiscoverFilters,
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<Show>> {
        self.discover("/discover/tv", filters, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        TmdbClient::new(TmdbConfig::new("k3y").with_base_url("http://upstream.test/3")).unwrap()
    }

    #[test]
    fn credential_comes_first_and_params_are_encoded() {
        let url = client().endpoint_url("/search/multi", &[("query", "fast & furious")]);
        assert_eq!(
            url,
            "http://upstream.test/3/search/multi?api_key=k3y&query=fast%20%26%20furious"
        );
    }

    #[test]
    fn path_ids_stay_a_single_segment() {
        assert_eq!(id_segment("550"), "550");
        assert_eq!(id_segment("../credits"), "..%2Fcredits");
    }
}
