use std::{collections::BTreeSet, num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::AppResult,
    models::{Genre, MovieResource, Video},
};

pub struct TmdbClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    language: Option<String>,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        access_token: String,
        base_url: String,
        language: Option<String>,
        rps: u32,
    ) -> Self {
        if access_token.trim().is_empty() {
            tracing::warn!("no TMDB_ACCESS_TOKEN provided, TMDB calls will be rejected");
        }

        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self { client, access_token, base_url, language, limiter }
    }

    /// `GET movie/{id}`
    pub async fn movie(&self, id: i32) -> AppResult<MovieResource> {
        self.get_json(&format!("movie/{id}"), &[]).await
    }

    /// `GET movie/top_rated`, first page only.
    pub async fn top_rated(&self) -> AppResult<Vec<MovieResource>> {
        let page: Paged<MovieResource> = self.get_json("movie/top_rated", &[]).await?;
        Ok(page.results)
    }

    /// `GET discover/movie`, first page only.
    pub async fn discover(&self, genre_ids: &BTreeSet<i32>) -> AppResult<Vec<MovieResource>> {
        let page: Paged<MovieResource> =
            self.get_json("discover/movie", &discover_query(genre_ids)).await?;
        Ok(page.results)
    }

    /// `GET search/movie`, first page only.
    pub async fn search_movie(&self, query: &str) -> AppResult<Vec<MovieResource>> {
        let page: Paged<MovieResource> =
            self.get_json("search/movie", &[("query", query.to_string())]).await?;
        Ok(page.results)
    }

    /// `GET movie/{id}/videos`, every provider.
    pub async fn movie_videos(&self, id: i32) -> AppResult<Vec<Video>> {
        let page: Paged<Video> = self.get_json(&format!("movie/{id}/videos"), &[]).await?;
        Ok(page.results)
    }

    /// `GET genre/movie/list`
    pub async fn movie_genres(&self) -> AppResult<Vec<Genre>> {
        let list: GenreList = self.get_json("genre/movie/list", &[]).await?;
        Ok(list.genres)
    }

    /// `GET configuration`, image section only.
    pub async fn image_configuration(&self) -> AppResult<ImagesConfiguration> {
        let config: Configuration = self.get_json("configuration", &[]).await?;
        Ok(config.images)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        self.limiter.until_ready().await;

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let mut req = self.client.get(&url).bearer_auth(&self.access_token).query(query);
        if let Some(language) = &self.language {
            req = req.query(&[("language", language)]);
        }

        tracing::debug!(url = %url, "TMDB request");

        let body = req.send().await?.error_for_status()?.json().await?;
        Ok(body)
    }
}

/// Query for `discover/movie`: always sorted by vote count, genre filter only
/// when some genre is selected.
pub fn discover_query(genre_ids: &BTreeSet<i32>) -> Vec<(&'static str, String)> {
    let mut query = vec![("sort_by", "vote_count.desc".to_string())];
    if !genre_ids.is_empty() {
        let joined = genre_ids.iter().map(i32::to_string).collect::<Vec<_>>().join(",");
        query.push(("with_genres", joined));
    }
    query
}

#[derive(Debug, Deserialize)]
struct Paged<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct GenreList {
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct Configuration {
    images: ImagesConfiguration,
}

#[derive(Debug, Deserialize)]
pub struct ImagesConfiguration {
    pub secure_base_url: String,
    pub poster_sizes: Vec<String>,
}
