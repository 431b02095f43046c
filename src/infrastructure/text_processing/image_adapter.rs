use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::ImageFormat;

use crate::application::ports::{FileLoader, FileLoaderError, OcrEngine};
use crate::domain::{ContentType, Document, ExtractionResult};

use super::table_detector::BorderlessTableDetector;

const DECODE_TIMEOUT: Duration = Duration::from_secs(30);

/// OCRs an image for prose and at most one borderless table.
pub struct ImageAdapter {
    ocr: Arc<dyn OcrEngine>,
    detector: Option<BorderlessTableDetector>,
}

impl ImageAdapter {
    /// `detector` of `None` disables table detection.
    pub fn new(ocr: Arc<dyn OcrEngine>, detector: Option<BorderlessTableDetector>) -> Self {
        Self { ocr, detector }
    }

    /// Decodes any supported format and re-encodes it as PNG for the OCR
    /// engine.
    fn normalize(data: &[u8]) -> Result<Vec<u8>, FileLoaderError> {
        let decoded = image::load_from_memory(data)
            .map_err(|e| FileLoaderError::InvalidImage(e.to_string()))?;

        let mut png = Cursor::new(Vec::new());
        decoded
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("PNG encoding failed: {e}")))?;

        Ok(png.into_inner())
    }
}

#[async_trait]
impl FileLoader for ImageAdapter {
    #[tracing::instrument(
        skip(self, data),
        fields(document_id = %document.id, filename = %document.filename)
    )]
    async fn extract(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<ExtractionResult, FileLoaderError> {
        if document.content_type != ContentType::Image {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let owned = data.to_vec();
        let png = tokio::time::timeout(
            DECODE_TIMEOUT,
            tokio::task::spawn_blocking(move || Self::normalize(&owned)),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("image decoding timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))??;

        let tables = match &self.detector {
            Some(detector) => {
                let words = self.ocr.image_to_words(&png).await?;
                detector.detect(&words).into_iter().take(1).collect()
            }
            None => Vec::new(),
        };

        let full_text = self.ocr.image_to_string(&png).await?;

        tracing::info!(
            text_len = full_text.len(),
            table_found = !tables.is_empty(),
            "Image OCR complete"
        );

        if full_text.trim().is_empty() && tables.is_empty() {
            return Err(FileLoaderError::NoContentFound(document.filename.clone()));
        }

        Ok(ExtractionResult {
            full_text,
            tables,
            image_count: 0,
        })
    }
}
