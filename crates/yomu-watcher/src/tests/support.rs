use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use yomu_ocr::{CaptureProvider, OcrError, OcrProvider, PixelBuffer};
use yomu_types::{CaptureTarget, DetectedTextRegion, Point, Rect};

pub fn hit() -> Vec<DetectedTextRegion> {
    vec![DetectedTextRegion::new(
        Rect::new(5, 5, 40, 12),
        "hello",
        0.95,
    )]
}

/// Capture stub: 1x1 buffer, optional scripted failure modes.
pub struct StubCapture {
    pub exists: AtomicBool,
    pub fail_capture: AtomicBool,
    pub origin: Option<Point>,
    pub captures: AtomicUsize,
}

impl StubCapture {
    pub fn new() -> Self {
        Self {
            exists: AtomicBool::new(true),
            fail_capture: AtomicBool::new(false),
            origin: None,
            captures: AtomicUsize::new(0),
        }
    }

    pub fn with_origin(origin: Point) -> Self {
        Self {
            origin: Some(origin),
            ..Self::new()
        }
    }
}

#[async_trait]
impl CaptureProvider for StubCapture {
    fn target_exists(&self, _target: &CaptureTarget) -> bool {
        self.exists.load(Ordering::SeqCst)
    }

    fn origin(&self, _target: &CaptureTarget) -> Option<Point> {
        self.origin
    }

    async fn capture(&self, _target: &CaptureTarget) -> Option<PixelBuffer> {
        if self.fail_capture.load(Ordering::SeqCst) {
            return None;
        }
        self.captures.fetch_add(1, Ordering::SeqCst);
        Some(PixelBuffer::new(vec![0; 4], 1, 1))
    }
}

/// OCR stub that replays a script of per-cycle results, then (when the
/// script runs dry) repeats either a hit or an empty result forever.
pub struct ScriptedOcr {
    script: Mutex<VecDeque<Result<Vec<DetectedTextRegion>, OcrError>>>,
    repeat_hit: bool,
    pub calls: AtomicUsize,
}

impl ScriptedOcr {
    pub fn new(script: Vec<Result<Vec<DetectedTextRegion>, OcrError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            repeat_hit: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always_hit() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            repeat_hit: true,
            calls: AtomicUsize::new(0),
        }
    }
}

/// OCR stub that takes a fixed amount of time per call before
/// reporting a hit, for exercising in-flight cycles.
pub struct SlowOcr {
    pub delay: std::time::Duration,
}

#[async_trait]
impl OcrProvider for SlowOcr {
    async fn detect_regions(
        &self,
        _image: &PixelBuffer,
    ) -> Result<Vec<DetectedTextRegion>, OcrError> {
        tokio::time::sleep(self.delay).await;
        Ok(hit())
    }

    async fn recognize_text(&self, _image: &PixelBuffer, _rect: Rect) -> Result<String, OcrError> {
        tokio::time::sleep(self.delay).await;
        Ok("hello".to_string())
    }
}

#[async_trait]
impl OcrProvider for ScriptedOcr {
    async fn detect_regions(
        &self,
        _image: &PixelBuffer,
    ) -> Result<Vec<DetectedTextRegion>, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(result) => result,
            None if self.repeat_hit => Ok(hit()),
            None => Ok(vec![]),
        }
    }

    async fn recognize_text(&self, _image: &PixelBuffer, _rect: Rect) -> Result<String, OcrError> {
        Ok("hello".to_string())
    }
}
