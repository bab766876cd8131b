use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use yomu_config::watcher::WatcherConfig;
use yomu_ocr::{CaptureProvider, OcrProvider};
use yomu_types::{CaptureTarget, WatcherEvent};

use crate::detector::{CycleContext, DetectorHandle, PresenceTracker, run_cycle};
use crate::registry::{RegionRegistry, RegistryError, WatchRegion};

/// Watcher notification tagged with the region that produced it.
#[derive(Debug, Clone)]
pub struct RegionEvent {
    pub region_id: Uuid,
    pub event: WatcherEvent,
}

struct RegionState {
    /// Taken out while a cycle is in flight; a region whose tracker is
    /// checked out is skipped, which bounds it to one concurrent pass.
    tracker: Option<PresenceTracker>,
    handle: DetectorHandle,
}

/// Registry-driven variant of the detection loop: one driver task asks
/// the registry which regions are due each tick and runs every due
/// region's cycle as its own task. Distinct regions poll concurrently;
/// a single region never overlaps itself.
pub struct RegionWatcher {
    registry: Arc<Mutex<RegionRegistry>>,
    states: Arc<Mutex<HashMap<Uuid, RegionState>>>,
    capture: Arc<dyn CaptureProvider>,
    ocr: Arc<dyn OcrProvider>,
    config: WatcherConfig,
    event_tx: AsyncSender<RegionEvent>,
    cancel: CancellationToken,
    started: AtomicBool,
}

impl RegionWatcher {
    pub fn new(
        capture: Arc<dyn CaptureProvider>,
        ocr: Arc<dyn OcrProvider>,
        config: WatcherConfig,
        event_tx: AsyncSender<RegionEvent>,
    ) -> Self {
        Self {
            registry: Arc::new(Mutex::new(RegionRegistry::new())),
            states: Arc::new(Mutex::new(HashMap::new())),
            capture,
            ocr,
            config,
            event_tx,
            cancel: CancellationToken::new(),
            started: AtomicBool::new(false),
        }
    }

    pub fn add_region(&self, region: WatchRegion) -> Result<Uuid, RegistryError> {
        let id = region.id;
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .add(region)?;
        Ok(id)
    }

    pub fn remove_region(&self, id: Uuid) -> bool {
        let removed = self
            .registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
        if removed {
            self.states
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&id);
        }
        removed
    }

    pub fn active_regions(&self) -> Vec<WatchRegion> {
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .list_active()
    }

    /// Snapshot surface for one region, if it has ever been polled.
    pub fn region_handle(&self, id: Uuid) -> Option<DetectorHandle> {
        self.states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .map(|s| s.handle.clone())
    }

    /// Spawn the driver loop. Calling `start` again while running is a
    /// no-op.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        let registry = self.registry.clone();
        let states = self.states.clone();
        let capture = self.capture.clone();
        let ocr = self.ocr.clone();
        let event_tx = self.event_tx.clone();
        let cancel = self.cancel.clone();
        let tick = Duration::from_millis(self.config.registry_tick_ms);
        let threshold = self.config.empty_threshold;

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(tick) => {}
                }

                let now = Instant::now();
                let due = {
                    let mut registry = registry.lock().unwrap_or_else(|e| e.into_inner());
                    let due = registry.list_due(now);
                    // Marked at dispatch so a failing region is not
                    // re-dispatched every tick
                    for region in &due {
                        registry.mark_checked(region.id, now);
                    }
                    due
                };

                for region in due {
                    let Some((mut tracker, handle)) = checkout(&states, region.id, threshold)
                    else {
                        // Previous cycle for this region still running
                        continue;
                    };

                    let states = states.clone();
                    let tx = event_tx.clone();
                    let ctx = CycleContext {
                        capture: capture.clone(),
                        ocr: ocr.clone(),
                        shared: handle.shared(),
                    };

                    tokio::spawn(async move {
                        let target = CaptureTarget::Region(region.bounds);
                        let event = run_cycle(&ctx, &target, &mut tracker).await;

                        // Region may have been removed mid-cycle; a
                        // removed region gets no tracker restore and no
                        // event tagged with its id
                        let still_watched = {
                            let mut states = states.lock().unwrap_or_else(|e| e.into_inner());
                            match states.get_mut(&region.id) {
                                Some(state) => {
                                    state.tracker = Some(tracker);
                                    true
                                }
                                None => false,
                            }
                        };

                        if still_watched {
                            if let Some(event) = event {
                                let _ = tx
                                    .send(RegionEvent {
                                        region_id: region.id,
                                        event,
                                    })
                                    .await;
                            }
                        }
                    });
                }
            }
            tracing::debug!("region watcher stopped");
        });
    }

    /// Request the driver to stop; in-flight region cycles complete.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

/// Take the region's tracker out of the shared map, creating state on
/// first dispatch. `None` means a cycle is already in flight.
fn checkout(
    states: &Arc<Mutex<HashMap<Uuid, RegionState>>>,
    id: Uuid,
    threshold: u32,
) -> Option<(PresenceTracker, DetectorHandle)> {
    let mut states = states.lock().unwrap_or_else(|e| e.into_inner());
    let state = states.entry(id).or_insert_with(|| RegionState {
        tracker: Some(PresenceTracker::new(threshold)),
        handle: DetectorHandle::default(),
    });
    let tracker = state.tracker.take()?;
    Some((tracker, state.handle.clone()))
}
