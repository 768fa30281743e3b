mod cache;
mod config;
mod error;
mod gateway;
mod models;
mod routes;
mod templates;
#[cfg(test)]
mod test_support;
mod tmdb;

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    cache::{Clock, SystemClock},
    config::Config,
    gateway::{genres::GenreGateway, images::ImageBaseUrlCache, movies::MovieGateway},
    tmdb::TmdbClient,
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub movies: MovieGateway,
    pub genres: GenreGateway,
    pub images: ImageBaseUrlCache,
}

impl AppState {
    pub fn new(tmdb: Arc<TmdbClient>, image_cache_ttl_secs: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            movies: MovieGateway::new(tmdb.clone()),
            genres: GenreGateway::new(tmdb.clone()),
            images: ImageBaseUrlCache::new(tmdb, image_cache_ttl_secs, clock),
        }
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/movies/{id}", get(routes::movie))
        .route("/search", get(routes::search))
        .fallback(routes::not_found)
        .with_state(Arc::new(state))
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,wemovies=debug".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("wemovies/0.1")
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let tmdb = TmdbClient::new(
        http,
        config.tmdb_access_token.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_language.clone(),
        config.tmdb_rps,
    );

    let state = AppState::new(Arc::new(tmdb), config.image_cache_ttl_secs, Arc::new(SystemClock));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
