use std::sync::Arc;

use super::fail_soft;
use crate::{models::Genre, tmdb::TmdbClient};

#[derive(Clone, Debug)]
pub struct GenreGateway {
    tmdb: Arc<TmdbClient>,
}

impl GenreGateway {
    pub fn new(tmdb: Arc<TmdbClient>) -> Self {
        Self { tmdb }
    }

    /// The whole movie genre taxonomy, in TMDB order.
    pub async fn get_genres(&self) -> Vec<Genre> {
        fail_soft("genre/movie/list", self.tmdb.movie_genres().await).unwrap_or_default()
    }
}
