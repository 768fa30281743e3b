use std::sync::Arc;

use super::fail_soft;
use crate::{
    cache::{Clock, TtlCache},
    error::{AppError, AppResult},
    tmdb::{ImagesConfiguration, TmdbClient},
};

/// Three days.
pub const DEFAULT_TTL_SECS: i64 = 259_200;

const CACHE_KEY: &str = "image_base_url";
const PREFERRED_POSTER_SIZE: &str = "original";

#[derive(Clone, Debug)]
pub struct ImageBaseUrlCache {
    tmdb: Arc<TmdbClient>,
    cache: TtlCache<String>,
}

impl ImageBaseUrlCache {
    pub fn new(tmdb: Arc<TmdbClient>, ttl_seconds: i64, clock: Arc<dyn Clock>) -> Self {
        Self { tmdb, cache: TtlCache::new(ttl_seconds, clock) }
    }

    /// Base URL to prefix poster and backdrop paths with, e.g.
    /// `https://image.tmdb.org/t/p/original`.
    ///
    /// Failed lookups are not cached.
    pub async fn get_image_base_url(&self) -> Option<String> {
        self.cache
            .get_or_compute(CACHE_KEY, move || async move {
                let result = self.tmdb.image_configuration().await.and_then(|images| {
                    tracing::debug!("refreshing image base URL");
                    compose_base_url(&images)
                });
                fail_soft("configuration", result)
            })
            .await
    }
}

fn compose_base_url(images: &ImagesConfiguration) -> AppResult<String> {
    let size = if images.poster_sizes.iter().any(|s| s == PREFERRED_POSTER_SIZE) {
        PREFERRED_POSTER_SIZE
    } else {
        images.poster_sizes.first().map(String::as_str).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("configuration lists no poster sizes"))
        })?
    };

    Ok(format!("{}/{}", images.secure_base_url.trim_end_matches('/'), size))
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;
    use crate::test_support::{ErrorLog, ManualClock, client_for, fixture};

    fn images(sizes: &[&str]) -> ImagesConfiguration {
        ImagesConfiguration {
            secure_base_url: "https://image.tmdb.org/t/p/".to_string(),
            poster_sizes: sizes.iter().map(|s| s.to_string()).collect(),
        }
    }

    async fn requests(server: &MockServer) -> usize {
        server.received_requests().await.map_or(0, |r| r.len())
    }

    #[test]
    fn prefers_original_size() {
        let url = compose_base_url(&images(&["w92", "original", "w500"])).unwrap();
        assert_eq!(url, "https://image.tmdb.org/t/p/original");
    }

    #[test]
    fn falls_back_to_first_size() {
        let url = compose_base_url(&images(&["w342", "w500"])).unwrap();
        assert_eq!(url, "https://image.tmdb.org/t/p/w342");
    }

    #[test]
    fn no_sizes_is_an_error() {
        assert!(compose_base_url(&images(&[])).is_err());
    }

    #[tokio::test]
    async fn caches_until_ttl_expires() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_string(fixture::CONFIGURATION))
            .mount(&server)
            .await;
        let clock = ManualClock::new();
        let images = ImageBaseUrlCache::new(client_for(&server), DEFAULT_TTL_SECS, clock.clone());

        let first = images.get_image_base_url().await;
        let second = images.get_image_base_url().await;
        assert_eq!(first.as_deref(), Some("https://image.tmdb.org/t/p/original"));
        assert_eq!(first, second);
        assert_eq!(requests(&server).await, 1);

        clock.advance(DEFAULT_TTL_SECS - 1);
        images.get_image_base_url().await;
        assert_eq!(requests(&server).await, 1);

        clock.advance(1);
        assert_eq!(images.get_image_base_url().await, first);
        assert_eq!(requests(&server).await, 2);

        images.get_image_base_url().await;
        assert_eq!(requests(&server).await, 2);
    }

    #[tokio::test]
    async fn failure_is_logged_and_retried_on_next_access() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let (log, _guard) = ErrorLog::install();
        let images = ImageBaseUrlCache::new(client_for(&server), DEFAULT_TTL_SECS, ManualClock::new());

        assert_eq!(images.get_image_base_url().await, None);
        assert_eq!(images.get_image_base_url().await, None);
        assert_eq!(requests(&server).await, 2);
        assert_eq!(log.count(), 2);
    }
}
