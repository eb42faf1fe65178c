//! PaddleOCR recognition backend
//!
//! Runs the PaddleOCR model pair through `ocr-rs`. OCR engines are sensitive
//! to input quality; labels photographed at an angle or under glare recognize
//! poorly, which the scan loop absorbs by simply trying again on the next
//! frame.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use super::{from_image_ref, RecognitionError, RecognizedLine, TextRecognizer};

/// Text recognizer backed by PaddleOCR models.
pub struct PaddleRecognizer {
    engine: ocr_rs::OcrEngine,
    min_confidence: f32,
}

impl PaddleRecognizer {
    /// Load the detection/recognition models and the character set.
    ///
    /// Failing to load the models is a hard configuration error; there is no
    /// fallback backend.
    pub fn new(
        detection: &Path,
        recognition: &Path,
        charset: &Path,
        min_confidence: f32,
    ) -> Result<Self> {
        let thread_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        info!("initializing PaddleOCR engine ({} threads)", thread_count);

        let engine = ocr_rs::OcrEngine::new(
            detection,
            recognition,
            charset,
            Some(ocr_rs::OcrEngineConfig {
                backend: ocr_rs::Backend::CPU,
                thread_count,
                enable_parallel: thread_count > 1,
                min_result_confidence: min_confidence,
                ..Default::default()
            }),
        )
        .context("failed to initialize OCR engine (missing or invalid model files?)")?;

        Ok(Self {
            engine,
            min_confidence,
        })
    }
}

#[async_trait]
impl TextRecognizer for PaddleRecognizer {
    async fn recognize(
        &mut self,
        image_ref: &str,
    ) -> Result<Vec<RecognizedLine>, RecognitionError> {
        let path = from_image_ref(image_ref);

        let img = image::open(path).map_err(|source| RecognitionError::Decode {
            path: image_ref.to_string(),
            source,
        })?;

        let results = self
            .engine
            .recognize(&img)
            .map_err(|e| RecognitionError::Backend(e.to_string()))?;

        let lines: Vec<RecognizedLine> = results
            .into_iter()
            .filter(|r| r.confidence >= self.min_confidence)
            .map(|r| RecognizedLine { text: r.text })
            .collect();

        debug!("recognized {} text blocks in {}", lines.len(), image_ref);

        Ok(lines)
    }
}
