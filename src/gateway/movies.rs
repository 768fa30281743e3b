use std::{collections::BTreeSet, sync::Arc};

use super::fail_soft;
use crate::{
    error::AppError,
    models::{ModelError, Movie, MovieResource, Video},
    tmdb::TmdbClient,
};

#[derive(Clone, Debug)]
pub struct MovieGateway {
    tmdb: Arc<TmdbClient>,
}

impl MovieGateway {
    pub fn new(tmdb: Arc<TmdbClient>) -> Self {
        Self { tmdb }
    }

    pub async fn get_movie(&self, id: i32) -> Option<Movie> {
        let result = async { Ok::<_, AppError>(Movie::try_from(self.tmdb.movie(id).await?)?) }.await;
        fail_soft("movie", result)
    }

    /// First entry of the top-rated page. An empty page is not an error.
    pub async fn get_top_rated_movie(&self) -> Option<Movie> {
        let result = async {
            let first = self.tmdb.top_rated().await?.into_iter().next();
            Ok::<_, AppError>(first.map(Movie::try_from).transpose()?)
        }
        .await;
        fail_soft("movie/top_rated", result).flatten()
    }

    /// Movies sorted by vote count, restricted to `genre_ids` when non-empty.
    pub async fn get_movies_by_genre(&self, genre_ids: &BTreeSet<i32>) -> Vec<Movie> {
        let result = async { Ok::<_, AppError>(to_movies(self.tmdb.discover(genre_ids).await?)?) }
            .await;
        fail_soft("discover/movie", result).unwrap_or_default()
    }

    pub async fn search(&self, query: &str) -> Vec<Movie> {
        if query.is_empty() {
            return Vec::new();
        }

        let result =
            async { Ok::<_, AppError>(to_movies(self.tmdb.search_movie(query).await?)?) }.await;
        fail_soft("search/movie", result).unwrap_or_default()
    }

    /// YouTube videos of a movie, in TMDB order.
    pub async fn get_movie_videos(&self, movie_id: i32) -> Vec<Video> {
        fail_soft("movie/videos", self.tmdb.movie_videos(movie_id).await)
            .unwrap_or_default()
            .into_iter()
            .filter(Video::is_youtube)
            .collect()
    }
}

fn to_movies(resources: Vec<MovieResource>) -> Result<Vec<Movie>, ModelError> {
    resources.into_iter().map(Movie::try_from).collect()
}
