pub mod types;

pub use types::{
    CaptureTarget, DetectedTextRegion, Point, Rect, SupportedLanguage, WatcherEvent, WindowId,
};
