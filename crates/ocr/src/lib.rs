//! Image-to-text front-end for coupon submissions.
//!
//! The rest of the service consumes OCR as a black box `image bytes ->
//! text`; [`TextRecognizer`] is that boundary. [`PureOcrEngine`] implements
//! it with pure-Rust ONNX models, so the binary needs no external runtime.

pub mod engine;
pub mod error;

pub use engine::PureOcrEngine;
pub use error::OcrError;

use image::DynamicImage;

/// Recognizes text in images.
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in a decoded image.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;

    /// Decode raw uploaded bytes, then recognize.
    fn recognize_bytes(&self, bytes: &[u8]) -> Result<String, OcrError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        self.recognize(&image)
    }
}
