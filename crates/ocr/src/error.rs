//! OCR error taxonomy.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    /// The uploaded bytes could not be decoded as an image.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// OCR model files could not be loaded.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Detection or recognition failed on a decoded image.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}
