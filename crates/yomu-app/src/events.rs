use std::sync::Arc;

use kanal::AsyncReceiver;
use tokio_util::sync::CancellationToken;
use yomu_translator::{HttpTransport, TranslateError, TranslationClient};
use yomu_types::WatcherEvent;
use yomu_watcher::RegionEvent;

use crate::state::AppState;

/// Consumes detection events and forwards newly seen text to the
/// translation client. Translation failures are logged, never fatal to
/// the loop; the client's cache keeps repeated detections of the same
/// text from hitting the network again. Exits cleanly when `cancel`
/// fires.
pub async fn translation_loop(
    state: Arc<AppState>,
    event_rx: AsyncReceiver<RegionEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let (client, from, to) = {
        let config = state.config.read().await;
        let client = TranslationClient::new(
            HttpTransport::new(config.translator.api_url.clone()),
            &config.translator,
            &config.cache,
        );
        (
            client,
            config.translator.from_lang.clone(),
            config.translator.to_lang.clone(),
        )
    };

    if let Err(e) = client.initialize().await {
        tracing::warn!(error = %e, "translation service unavailable, running detection only");
    }

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("translation loop stopping");
                return Ok(());
            }
            event = event_rx.recv() => event?,
        };
        match event.event {
            WatcherEvent::RegionsDetected(regions) => {
                tracing::debug!(
                    region = %event.region_id,
                    count = regions.len(),
                    "text detected"
                );
                for region in regions {
                    match client.translate(&region.text, &from, &to).await {
                        Ok(translated) if !translated.is_empty() => {
                            tracing::info!(
                                source = %region.text,
                                translated = %translated,
                                "translation"
                            );
                        }
                        Ok(_) => {}
                        Err(TranslateError::NotInitialized) => {
                            tracing::debug!("translator offline, dropping text");
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "translation failed");
                        }
                    }
                }
            }
            WatcherEvent::RegionsLost => {
                tracing::debug!(region = %event.region_id, "text gone");
            }
        }
    }
}
