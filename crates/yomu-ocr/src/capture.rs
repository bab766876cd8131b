use async_trait::async_trait;
use yomu_types::{CaptureTarget, Point};

/// Raw RGBA pixels from one capture. Scoped to a single detection
/// cycle; dropped before the next capture is taken.
pub struct PixelBuffer {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PixelBuffer {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }
}

/// Screen/window capture backend.
///
/// Implemented outside this core (platform capture, test stubs).
/// `capture` signals failure by returning `None`; a failed grab is a
/// skip, never an error the caller has to handle.
#[async_trait]
pub trait CaptureProvider: Send + Sync {
    /// Whether the target can still be captured (window still open,
    /// region on a connected display).
    fn target_exists(&self, target: &CaptureTarget) -> bool;

    /// Screen-space origin of the target. Window captures come back in
    /// window-relative coordinates and need this to be published in
    /// screen space; `None` means bounds are already absolute.
    fn origin(&self, target: &CaptureTarget) -> Option<Point>;

    async fn capture(&self, target: &CaptureTarget) -> Option<PixelBuffer>;
}
