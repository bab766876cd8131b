use async_trait::async_trait;
use yomu_types::{DetectedTextRegion, Rect};

use crate::capture::PixelBuffer;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine failed: {0}")]
    Engine(String),

    #[error("unsupported image format: {0}")]
    BadImage(String),
}

/// Text recognition backend.
///
/// Backends are selected by configuration and injected; the detector
/// only sees this interface. Errors from either call are caught at the
/// cycle boundary and logged, never propagated into the polling loop.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Locate every text region in the capture, with bounds in the
    /// capture source's coordinate space.
    async fn detect_regions(
        &self,
        image: &PixelBuffer,
    ) -> Result<Vec<DetectedTextRegion>, OcrError>;

    /// Recognize text within one rectangle of the capture.
    async fn recognize_text(&self, image: &PixelBuffer, rect: Rect) -> Result<String, OcrError>;
}
