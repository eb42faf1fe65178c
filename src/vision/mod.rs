//! Vision Layer
//!
//! Text recognition over captured frames. The recognizer consumes a
//! normalized image reference (see [`imageref`]) and reports text blocks in
//! backend order; callers must preserve that order.

pub mod imageref;
pub mod paddle;

pub use imageref::{from_image_ref, to_image_ref};
pub use paddle::PaddleRecognizer;

use async_trait::async_trait;
use thiserror::Error;

/// One block of text recognized in a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedLine {
    pub text: String,
}

/// Failure reported by the recognition backend.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("unreadable image `{path}`: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("recognition backend error: {0}")]
    Backend(String),
}

/// Port over an OCR engine.
#[async_trait]
pub trait TextRecognizer {
    /// Recognize text blocks in the referenced image, in backend order.
    async fn recognize(
        &mut self,
        image_ref: &str,
    ) -> Result<Vec<RecognizedLine>, RecognitionError>;
}
