use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// Stored value with the moment it was written
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() > ttl
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Stored entries, expired ones included
    pub entries_count: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Key -> value store with per-instance TTL and passive expiry.
///
/// Expired entries stay in the map until the same key is written again;
/// `get` simply reports them as absent.
#[derive(Debug)]
pub struct TtlCache<V> {
    name: &'static str,
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            entries: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Value for `key` if it was set within the TTL window
    pub fn get(&self, key: &str) -> Option<V> {
        let fresh = self
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(self.ttl))
            .map(|entry| entry.value.clone());

        match fresh {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(cache = self.name, key, "cache hit");
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(cache = self.name, key, "cache miss");
                None
            }
        }
    }

    /// Store `value`, overwriting whatever was under `key`
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        debug!(cache = self.name, key = key.as_str(), ttl = ?self.ttl, "cache store");
        self.entries.insert(key, CacheEntry::new(value));
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries_count: self.entries.len(),
        }
    }
}

/// Deterministic cache key: a resource class followed by every
/// request-shaping part, each percent-encoded and joined with `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    key: String,
}

impl CacheKey {
    pub fn new(class: &str) -> Self {
        Self {
            key: class.to_string(),
        }
    }

    pub fn part(mut self, part: impl ToString) -> Self {
        self.key.push(':');
        self.key.push_str(&urlencoding::encode(&part.to_string()));
        self
    }

    /// Optional parts are encoded as an empty segment when absent
    pub fn opt_part<T: ToString>(self, part: Option<T>) -> Self {
        match part {
            Some(value) => self.part(value),
            None => self.part(""),
        }
    }

    pub fn build(self) -> String {
        self.key
    }
}
