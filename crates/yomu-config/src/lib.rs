use std::env;

use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::translator::TranslatorConfig;
use self::watcher::WatcherConfig;

pub mod cache;
pub mod translator;
pub mod watcher;

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub watcher: WatcherConfig,
    pub translator: TranslatorConfig,
    pub cache: CacheConfig,
}

impl Config {
    /// Build a config from defaults with `YOMU_*` environment overrides.
    pub fn new() -> Self {
        let mut config = Config::default();

        if let Some(interval) = env_parse("YOMU_POLL_INTERVAL_MS") {
            config.watcher.poll_interval_ms = interval;
        }
        if let Some(threshold) = env_parse("YOMU_EMPTY_THRESHOLD") {
            config.watcher.empty_threshold = threshold;
        }
        if let Ok(url) = env::var("YOMU_API_URL") {
            config.translator.api_url = url;
        }
        if let Some(retries) = env_parse("YOMU_MAX_RETRIES") {
            config.translator.max_retries = retries;
        }
        if let Some(capacity) = env_parse("YOMU_CACHE_CAPACITY") {
            config.cache.capacity = capacity;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.watcher.empty_threshold, 3);
        assert!(config.watcher.poll_interval_ms > 0);
        assert!(config.translator.max_retries >= 1);
        assert!(config.cache.capacity > 0);
    }
}
