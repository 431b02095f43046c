use std::sync::Mutex;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, ExtractionResult};

/// Returns a canned extraction and records the content types it was asked
/// for. Text and CSV payloads without a canned result pass through as text.
#[derive(Default)]
pub struct MockFileLoader {
    result: Option<ExtractionResult>,
    requested: Mutex<Vec<ContentType>>,
}

impl MockFileLoader {
    pub fn returning(result: ExtractionResult) -> Self {
        Self {
            result: Some(result),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<ContentType> {
        self.requested
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl FileLoader for MockFileLoader {
    async fn extract(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<ExtractionResult, FileLoaderError> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(document.content_type);
        }

        match &self.result {
            Some(result) => Ok(result.clone()),
            None => String::from_utf8(data.to_vec())
                .map(ExtractionResult::text)
                .map_err(|e| FileLoaderError::ExtractionFailed(e.to_string())),
        }
    }
}
