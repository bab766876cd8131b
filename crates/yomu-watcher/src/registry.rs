use std::time::{Duration, Instant};

use uuid::Uuid;
use yomu_types::Rect;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("region {0} already registered")]
    DuplicateRegion(Uuid),

    #[error("region {0} has empty bounds")]
    InvalidBounds(Uuid),
}

/// A user-selected rectangle to monitor for text.
#[derive(Debug, Clone)]
pub struct WatchRegion {
    pub id: Uuid,
    pub bounds: Rect,
    pub active: bool,
    pub interval: Duration,
    pub last_checked: Instant,
}

impl WatchRegion {
    pub fn new(bounds: Rect, interval: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            bounds,
            active: true,
            interval,
            last_checked: Instant::now(),
        }
    }

    fn has_valid_bounds(&self) -> bool {
        self.bounds.width > 0 && self.bounds.height > 0
    }
}

/// Owns the set of watch regions and answers which are due for a check.
///
/// Vec-backed so listing order is insertion order. Carries no locking
/// of its own; the region watcher serializes access.
#[derive(Default)]
pub struct RegionRegistry {
    regions: Vec<WatchRegion>,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a region. Fails without mutating the registry when the id
    /// is already present or an active region has empty bounds.
    pub fn add(&mut self, region: WatchRegion) -> Result<(), RegistryError> {
        if self.regions.iter().any(|r| r.id == region.id) {
            return Err(RegistryError::DuplicateRegion(region.id));
        }
        if region.active && !region.has_valid_bounds() {
            return Err(RegistryError::InvalidBounds(region.id));
        }
        self.regions.push(region);
        Ok(())
    }

    /// Remove by id. Unknown ids are "not found", not an error.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.regions.len();
        self.regions.retain(|r| r.id != id);
        self.regions.len() != before
    }

    pub fn get(&self, id: Uuid) -> Option<&WatchRegion> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn list_active(&self) -> Vec<WatchRegion> {
        self.regions.iter().filter(|r| r.active).cloned().collect()
    }

    /// Active regions whose interval has elapsed at `now`. The caller
    /// is expected to `mark_checked` whatever it dispatches.
    pub fn list_due(&self, now: Instant) -> Vec<WatchRegion> {
        self.regions
            .iter()
            .filter(|r| r.active && now.saturating_duration_since(r.last_checked) >= r.interval)
            .cloned()
            .collect()
    }

    pub fn mark_checked(&mut self, id: Uuid, now: Instant) {
        if let Some(region) = self.regions.iter_mut().find(|r| r.id == id) {
            region.last_checked = now;
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
