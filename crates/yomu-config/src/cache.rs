use serde::{Deserialize, Serialize};

fn default_capacity() -> usize {
    256
}

fn default_ttl_secs() -> u64 {
    3600
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum entries before LRU eviction kicks in
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Entry lifetime; expired entries are dropped on read
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            ttl_secs: default_ttl_secs(),
        }
    }
}
