use async_trait::async_trait;
use yomu_ocr::{CaptureProvider, OcrError, OcrProvider, PixelBuffer};
use yomu_types::{CaptureTarget, DetectedTextRegion, Point, Rect};

/// Placeholder capture backend for builds without a platform grabber.
///
/// Every capture reports failure, which the detector treats as a skip,
/// so the daemon runs (and translates text fed in by other means)
/// without ever detecting anything on screen.
pub struct NullCapture;

#[async_trait]
impl CaptureProvider for NullCapture {
    fn target_exists(&self, _target: &CaptureTarget) -> bool {
        true
    }

    fn origin(&self, _target: &CaptureTarget) -> Option<Point> {
        None
    }

    async fn capture(&self, _target: &CaptureTarget) -> Option<PixelBuffer> {
        None
    }
}

/// Placeholder OCR backend paired with [`NullCapture`].
pub struct NullOcr;

#[async_trait]
impl OcrProvider for NullOcr {
    async fn detect_regions(
        &self,
        _image: &PixelBuffer,
    ) -> Result<Vec<DetectedTextRegion>, OcrError> {
        Ok(vec![])
    }

    async fn recognize_text(&self, _image: &PixelBuffer, _rect: Rect) -> Result<String, OcrError> {
        Ok(String::new())
    }
}
