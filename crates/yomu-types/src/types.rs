use serde::{Deserialize, Serialize};

pub type WindowId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangle in screen (or capture-source) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width as i32
            && point.y < self.y + self.height as i32
    }

    /// Shift by an origin, used to map window-relative bounds into
    /// absolute screen coordinates.
    pub fn translated(&self, origin: Point) -> Rect {
        Rect {
            x: self.x + origin.x,
            y: self.y + origin.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// What a detector polls: a whole window or a fixed screen rectangle.
///
/// Window captures come back in window-relative coordinates and are
/// translated by the window origin before publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTarget {
    Window(WindowId),
    Region(Rect),
}

/// One piece of text located by OCR in a single capture.
#[derive(Debug, Clone)]
pub struct DetectedTextRegion {
    pub bounds: Rect,
    pub text: String,
    pub confidence: f32,
}

impl DetectedTextRegion {
    pub fn new(bounds: Rect, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            bounds,
            text: text.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

// Equality is (bounds, text); confidence jitters between frames and
// must not make otherwise identical detections unequal.
impl PartialEq for DetectedTextRegion {
    fn eq(&self, other: &Self) -> bool {
        self.bounds == other.bounds && self.text == other.text
    }
}

/// Language entry as served by the translation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedLanguage {
    pub code: String,
    pub name: String,
}

/// Notifications published by a detection loop.
#[derive(Debug, Clone)]
pub enum WatcherEvent {
    RegionsDetected(Vec<DetectedTextRegion>),
    RegionsLost,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::new(10, 10, 100, 50);
        assert!(rect.contains(Point::new(10, 10)));
        assert!(rect.contains(Point::new(109, 59)));
        assert!(!rect.contains(Point::new(110, 10)));
        assert!(!rect.contains(Point::new(10, 60)));
        assert!(!rect.contains(Point::new(9, 10)));
    }

    #[test]
    fn translated_shifts_origin_only() {
        let rect = Rect::new(5, 5, 20, 10).translated(Point::new(100, 200));
        assert_eq!(rect, Rect::new(105, 205, 20, 10));
    }

    #[test]
    fn detection_equality_ignores_confidence() {
        let a = DetectedTextRegion::new(Rect::new(0, 0, 10, 10), "hello", 0.9);
        let b = DetectedTextRegion::new(Rect::new(0, 0, 10, 10), "hello", 0.4);
        assert_eq!(a, b);
    }
}
