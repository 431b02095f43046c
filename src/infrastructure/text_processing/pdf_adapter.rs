use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use pdf_oxide::PdfDocument;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, ExtractionResult};

use super::table_detector::{BorderlessTableDetector, text_lines_to_words};

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Extracts page text, image counts and text-aligned tables from a PDF.
/// Problems with a single page are logged and skipped.
#[derive(Default)]
pub struct PdfAdapter {
    detector: BorderlessTableDetector,
}

impl PdfAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn extract_pages(
        path: &std::path::Path,
        detector: BorderlessTableDetector,
    ) -> Result<ExtractionResult, FileLoaderError> {
        let mut doc = PdfDocument::open(path)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to parse PDF: {e}")))?;

        let page_count = doc.page_count().map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to read page count: {e}"))
        })?;

        let pages = (0..page_count).map(|page_index| PageContent {
            text: doc.extract_text(page_index).map_err(|e| e.to_string()),
            image_count: doc
                .extract_images(page_index)
                .map(|images| images.len())
                .map_err(|e| e.to_string()),
        });
        let result = assemble_pages(pages, &detector);

        tracing::debug!(page_count, "PDF pages processed");
        Ok(result)
    }
}

/// What one page yielded. Text and images are read separately, so either
/// can fail on its own.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub text: Result<String, String>,
    pub image_count: Result<usize, String>,
}

/// Joins page text, each page followed by a newline, sums image counts and
/// collects non-empty tables in page order. Failed parts are logged and
/// skipped.
pub fn assemble_pages(
    pages: impl IntoIterator<Item = PageContent>,
    detector: &BorderlessTableDetector,
) -> ExtractionResult {
    let mut result = ExtractionResult::default();

    for (page_index, content) in pages.into_iter().enumerate() {
        let page = page_index + 1;

        match content.text {
            Ok(text) => {
                result.full_text.push_str(&text);
                result.full_text.push('\n');

                let tables = detector.detect(&text_lines_to_words(&text));
                result
                    .tables
                    .extend(tables.into_iter().filter(|t| !t.is_empty()));
            }
            Err(error) => tracing::warn!(page, %error, "Skipping page text"),
        }

        match content.image_count {
            Ok(count) => result.image_count += count,
            Err(error) => tracing::warn!(page, %error, "Skipping page images"),
        }
    }

    result
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(
        skip(self, data),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn extract(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<ExtractionResult, FileLoaderError> {
        if document.content_type != ContentType::Pdf {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let mut temp_file = tempfile::NamedTempFile::new().map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to create temp file: {e}"))
        })?;

        temp_file.write_all(data).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to write temp file: {e}"))
        })?;

        let temp_path = temp_file.path().to_path_buf();
        let detector = self.detector;

        let result = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || Self::extract_pages(&temp_path, detector)),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))??;

        tracing::info!(
            text_len = result.full_text.len(),
            tables = result.tables.len(),
            images = result.image_count,
            "PDF extraction complete"
        );

        Ok(result)
    }
}
