use async_trait::async_trait;

use crate::domain::{Document, ExtractionResult};

#[async_trait]
pub trait FileLoader: Send + Sync {
    async fn extract(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<ExtractionResult, FileLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("malformed table: {0}")]
    MalformedTable(String),
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("ocr failed: {0}")]
    Ocr(#[from] super::OcrError),
    #[error("no text or table found in {0}")]
    NoContentFound(String),
}

impl FileLoaderError {
    /// Short failure kind used in client-facing error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedContentType(_) => "UnsupportedContentType",
            Self::ExtractionFailed(_) => "ExtractionFailed",
            Self::MalformedTable(_) => "MalformedTable",
            Self::InvalidImage(_) => "InvalidImage",
            Self::Ocr(_) => "OcrError",
            Self::NoContentFound(_) => "NoContentFound",
        }
    }
}
