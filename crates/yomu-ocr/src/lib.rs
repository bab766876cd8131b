pub mod capture;
pub mod ocr;

pub use capture::{CaptureProvider, PixelBuffer};
pub use ocr::{OcrError, OcrProvider};
