use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use yomu_ocr::{CaptureProvider, OcrProvider};
use yomu_watcher::{RegionEvent, RegionWatcher};

use crate::events::translation_loop;
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub watcher_events: (AsyncSender<RegionEvent>, AsyncReceiver<RegionEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            // Detection burst capacity
            watcher_events: kanal::bounded_async(256),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub async fn spawn_tasks(
        &self,
        capture: Arc<dyn CaptureProvider>,
        ocr: Arc<dyn OcrProvider>,
    ) -> (RegionWatcher, JoinSet<anyhow::Result<()>>) {
        let mut tasks = JoinSet::new();

        let watcher_config = self.state.config.read().await.watcher.clone();
        let watcher = RegionWatcher::new(
            capture,
            ocr,
            watcher_config,
            self.channels.watcher_events.0.clone(),
        );
        watcher.start();

        tasks.spawn(translation_loop(
            self.state.clone(),
            self.channels.watcher_events.1.clone(),
            self.cancel_token.child_token(),
        ));

        (watcher, tasks)
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
