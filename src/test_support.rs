//! Shared helpers for unit tests: mock TMDB client, fixtures, a manual
//! clock and an error-log recorder.

use std::sync::{Arc, Mutex};

use jiff::Timestamp;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    layer::{Context, Layer, SubscriberExt},
    registry,
};
use wiremock::MockServer;

use crate::{cache::Clock, tmdb::TmdbClient};

pub mod fixture {
    pub const MOVIE_DETAIL: &str = include_str!("../fixtures/tmdb/movie_detail.json");
    pub const MOVIE_LIST: &str = include_str!("../fixtures/tmdb/movie_list.json");
    pub const VIDEOS: &str = include_str!("../fixtures/tmdb/videos.json");
    pub const GENRES: &str = include_str!("../fixtures/tmdb/genres.json");
    pub const CONFIGURATION: &str = include_str!("../fixtures/tmdb/configuration.json");
}

pub fn client_for(server: &MockServer) -> Arc<TmdbClient> {
    Arc::new(TmdbClient::new(
        reqwest::Client::new(),
        "test-token".to_string(),
        format!("{}/3/", server.uri()),
        None,
        50,
    ))
}

#[derive(Debug)]
pub struct ManualClock(Mutex<Timestamp>);

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Timestamp::from_second(1_700_000_000).unwrap())))
    }

    pub fn advance(&self, seconds: i64) {
        let mut now = self.0.lock().unwrap();
        *now = Timestamp::from_second(now.as_second() + seconds).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.0.lock().unwrap()
    }
}

/// Records the target of every ERROR event emitted on the current thread
/// while the returned guard is alive.
#[derive(Clone, Debug, Default)]
pub struct ErrorLog(Arc<Mutex<Vec<String>>>);

impl ErrorLog {
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let log = Self::default();
        let guard = tracing::subscriber::set_default(registry().with(log.clone()));
        (log, guard)
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

impl<S: Subscriber> Layer<S> for ErrorLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.lock().unwrap().push(event.metadata().target().to_string());
        }
    }
}
