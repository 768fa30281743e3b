use std::{collections::HashMap, future::Future, sync::Arc};

use jiff::Timestamp;
use tokio::sync::RwLock;

pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Timestamp;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[derive(Clone, Debug)]
struct Entry<V> {
    value: V,
    expires_at: i64,
}

/// In-memory key/value store where every entry lives for a fixed TTL.
///
/// Expired entries are recomputed on the next access; there is no other
/// eviction. The lock is released while computing, so concurrent misses may
/// each compute and the last writer wins.
#[derive(Clone, Debug)]
pub struct TtlCache<V> {
    entries: Arc<RwLock<HashMap<String, Entry<V>>>>,
    ttl_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl_seconds: i64, clock: Arc<dyn Clock>) -> Self {
        Self { entries: Arc::new(RwLock::new(HashMap::new())), ttl_seconds, clock }
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        let now = self.now_sec();
        let entries = self.entries.read().await;
        entries.get(key).filter(|e| now < e.expires_at).map(|e| e.value.clone())
    }

    pub async fn insert(&self, key: &str, value: V) {
        let expires_at = self.now_sec().saturating_add(self.ttl_seconds);
        self.entries.write().await.insert(key.to_string(), Entry { value, expires_at });
    }

    /// Returns the fresh value under `key`, or computes and stores it.
    /// A `None` from `compute` is returned as-is and not stored.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Option<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<V>>,
    {
        if let Some(hit) = self.get(key).await {
            return Some(hit);
        }

        let value = compute().await?;
        self.insert(key, value.clone()).await;
        Some(value)
    }

    fn now_sec(&self) -> i64 {
        self.clock.now().as_second()
    }
}
