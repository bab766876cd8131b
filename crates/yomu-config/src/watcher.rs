use serde::{Deserialize, Serialize};

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_empty_threshold() -> u32 {
    3
}

fn default_registry_tick_ms() -> u64 {
    100
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct WatcherConfig {
    /// Delay between detection cycles for a single target
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Consecutive empty cycles before "no regions" is published
    #[serde(default = "default_empty_threshold")]
    pub empty_threshold: u32,
    /// How often the region watcher re-checks which regions are due
    #[serde(default = "default_registry_tick_ms")]
    pub registry_tick_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            empty_threshold: default_empty_threshold(),
            registry_tick_ms: default_registry_tick_ms(),
        }
    }
}
