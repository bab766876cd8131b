use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Cache key over the normalized text. Two lookups only collide when
/// the language pair and the normalized form both match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: String,
    pub target: String,
    pub text: String,
}

impl CacheKey {
    pub fn new(source: &str, target: &str, text: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            text: text.to_string(),
        }
    }
}

struct Entry {
    value: String,
    created: Instant,
}

struct Inner {
    map: HashMap<CacheKey, Entry>,
    order: VecDeque<CacheKey>,
}

/// Bounded memo of (source, target, text) -> translation.
///
/// Eviction is least-recently-used: `get` refreshes recency, `put` at
/// capacity drops the stalest key. Expiry is lazy — an entry past its
/// TTL is treated as absent and removed when it is next read.
pub struct TranslationCache {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
}

impl TranslationCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        let expired = match inner.map.get(key) {
            Some(entry) => entry.created.elapsed() >= self.ttl,
            None => return None,
        };

        if expired {
            inner.map.remove(key);
            if let Some(pos) = inner.order.iter().position(|k| k == key) {
                inner.order.remove(pos);
            }
            return None;
        }

        if let Some(pos) = inner.order.iter().position(|k| k == key) {
            inner.order.remove(pos);
        }
        inner.order.push_back(key.clone());
        inner.map.get(key).map(|entry| entry.value.clone())
    }

    pub fn put(&self, key: CacheKey, value: String) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if inner.map.contains_key(&key) {
            inner.map.insert(
                key.clone(),
                Entry {
                    value,
                    created: Instant::now(),
                },
            );
            if let Some(pos) = inner.order.iter().position(|k| k == &key) {
                inner.order.remove(pos);
            }
            inner.order.push_back(key);
            return;
        }

        if inner.map.len() >= self.capacity {
            if let Some(old) = inner.order.pop_front() {
                inner.map.remove(&old);
            }
        }
        inner.map.insert(
            key.clone(),
            Entry {
                value,
                created: Instant::now(),
            },
        );
        inner.order.push_back(key);
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .map
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.map.clear();
        inner.order.clear();
    }
}
