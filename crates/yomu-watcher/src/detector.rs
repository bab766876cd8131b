use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;
use yomu_config::watcher::WatcherConfig;
use yomu_ocr::{CaptureProvider, OcrProvider};
use yomu_types::{CaptureTarget, DetectedTextRegion, Point, WatcherEvent};

/// Debounces the raw per-cycle OCR signal into presence transitions.
///
/// Finding regions always publishes. Losing them publishes only after
/// `threshold` consecutive empty cycles, so a single-frame OCR miss
/// never flaps the downstream consumer. Cycles that could not check at
/// all (capture or OCR failure) leave the streak untouched.
pub(crate) struct PresenceTracker {
    threshold: u32,
    empty_streak: u32,
    has_regions: bool,
}

#[derive(Debug)]
pub(crate) enum CycleOutcome {
    Detected(Vec<DetectedTextRegion>),
    Cleared,
    Unchanged,
}

impl PresenceTracker {
    pub(crate) fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            empty_streak: 0,
            has_regions: false,
        }
    }

    pub(crate) fn observe(&mut self, regions: Vec<DetectedTextRegion>) -> CycleOutcome {
        if !regions.is_empty() {
            self.empty_streak = 0;
            self.has_regions = true;
            return CycleOutcome::Detected(regions);
        }

        if !self.has_regions {
            // Already published as empty; nothing to debounce.
            self.empty_streak = 0;
            return CycleOutcome::Unchanged;
        }

        self.empty_streak += 1;
        if self.empty_streak >= self.threshold {
            self.empty_streak = 0;
            self.has_regions = false;
            CycleOutcome::Cleared
        } else {
            CycleOutcome::Unchanged
        }
    }

    pub(crate) fn empty_streak(&self) -> u32 {
        self.empty_streak
    }
}

#[derive(Default)]
pub(crate) struct Shared {
    snapshot: RwLock<Vec<DetectedTextRegion>>,
    cycles: AtomicU64,
    errors: AtomicU64,
}

impl Shared {
    fn publish(&self, regions: Vec<DetectedTextRegion>) {
        *self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = regions;
    }

    fn clear(&self) {
        self.snapshot
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// Cloneable query surface over a detector's last published snapshot.
#[derive(Clone, Default)]
pub struct DetectorHandle {
    shared: Arc<Shared>,
}

impl DetectorHandle {
    /// Defensive copy of the last published regions.
    pub fn current_regions(&self) -> Vec<DetectedTextRegion> {
        self.shared
            .snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// First published region containing `point`, if any.
    pub fn region_at(&self, point: Point) -> Option<DetectedTextRegion> {
        self.shared
            .snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|r| r.bounds.contains(point))
            .cloned()
    }

    pub fn cycles(&self) -> u64 {
        self.shared.cycles.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.shared.errors.load(Ordering::Relaxed)
    }

    pub(crate) fn shared(&self) -> Arc<Shared> {
        self.shared.clone()
    }
}

pub(crate) struct CycleContext {
    pub capture: Arc<dyn CaptureProvider>,
    pub ocr: Arc<dyn OcrProvider>,
    pub shared: Arc<Shared>,
}

/// One capture → OCR → diff pass. Capture and OCR failures are logged
/// and swallowed here so they never reach the polling loop; the pixel
/// buffer lives only for the duration of this call. Returns the
/// notification to publish, if this cycle produced one.
pub(crate) async fn run_cycle(
    ctx: &CycleContext,
    target: &CaptureTarget,
    tracker: &mut PresenceTracker,
) -> Option<WatcherEvent> {
    if !ctx.capture.target_exists(target) {
        tracing::debug!(?target, "target gone, skipping cycle");
        return None;
    }

    let Some(pixels) = ctx.capture.capture(target).await else {
        tracing::debug!(?target, "capture failed, skipping cycle");
        return None;
    };

    ctx.shared.cycles.fetch_add(1, Ordering::Relaxed);

    let regions = match ctx.ocr.detect_regions(&pixels).await {
        Ok(mut regions) => {
            if let Some(origin) = ctx.capture.origin(target) {
                for region in &mut regions {
                    region.bounds = region.bounds.translated(origin);
                }
            }
            regions
        }
        Err(e) => {
            // "Could not check" is not "no text": the hysteresis streak
            // stays where it is.
            ctx.shared.errors.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %e, "OCR failed, cycle skipped");
            return None;
        }
    };
    drop(pixels);

    match tracker.observe(regions) {
        CycleOutcome::Detected(regions) => {
            ctx.shared.publish(regions.clone());
            Some(WatcherEvent::RegionsDetected(regions))
        }
        CycleOutcome::Cleared => {
            ctx.shared.clear();
            Some(WatcherEvent::RegionsLost)
        }
        CycleOutcome::Unchanged => None,
    }
}

/// Polls one target for text and publishes presence transitions.
///
/// Idle until a target is set; `start` spawns a single loop task that
/// runs one full cycle, then sleeps the poll interval, so two cycles
/// for the same target can never overlap. `stop` is safe while a cycle
/// is in flight: the cycle completes and the loop does not reschedule.
pub struct Detector {
    capture: Arc<dyn CaptureProvider>,
    ocr: Arc<dyn OcrProvider>,
    config: WatcherConfig,
    event_tx: AsyncSender<WatcherEvent>,
    target: Arc<RwLock<Option<CaptureTarget>>>,
    handle: DetectorHandle,
    cancel: CancellationToken,
    started: AtomicBool,
}

impl Detector {
    pub fn new(
        capture: Arc<dyn CaptureProvider>,
        ocr: Arc<dyn OcrProvider>,
        config: WatcherConfig,
        event_tx: AsyncSender<WatcherEvent>,
    ) -> Self {
        Self {
            capture,
            ocr,
            config,
            event_tx,
            target: Arc::new(RwLock::new(None)),
            handle: DetectorHandle::default(),
            cancel: CancellationToken::new(),
            started: AtomicBool::new(false),
        }
    }

    pub fn set_target(&self, target: CaptureTarget) {
        *self.target.write().unwrap_or_else(|e| e.into_inner()) = Some(target);
    }

    pub fn clear_target(&self) {
        *self.target.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn handle(&self) -> DetectorHandle {
        self.handle.clone()
    }

    pub fn current_regions(&self) -> Vec<DetectedTextRegion> {
        self.handle.current_regions()
    }

    pub fn region_at(&self, point: Point) -> Option<DetectedTextRegion> {
        self.handle.region_at(point)
    }

    /// Spawn the polling loop. Calling `start` again while running is a
    /// no-op.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        let ctx = CycleContext {
            capture: self.capture.clone(),
            ocr: self.ocr.clone(),
            shared: self.handle.shared.clone(),
        };
        let event_tx = self.event_tx.clone();
        let target = self.target.clone();
        let cancel = self.cancel.clone();
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        let mut tracker = PresenceTracker::new(self.config.empty_threshold);

        tokio::spawn(async move {
            loop {
                if cancel.is_cancelled() {
                    break;
                }

                let current = *target.read().unwrap_or_else(|e| e.into_inner());
                if let Some(current) = current {
                    if let Some(event) = run_cycle(&ctx, &current, &mut tracker).await {
                        if event_tx.send(event).await.is_err() {
                            tracing::warn!("event channel closed, stopping detector");
                            break;
                        }
                    }
                }

                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            tracing::debug!("detector loop stopped");
        });
    }

    /// Request the loop to stop after the in-flight cycle, if any.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}
