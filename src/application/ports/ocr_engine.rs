use async_trait::async_trait;

/// A recognized word with its bounding box, in image pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct WordBox {
    pub text: String,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Recognition confidence, 0-100.
    pub confidence: f32,
    /// Identifies the text line the word belongs to; words sharing a key are
    /// on the same line.
    pub line: (u32, u32, u32),
}

impl WordBox {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

/// Black-box OCR: plain text and word layout from an encoded image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn image_to_string(&self, image: &[u8]) -> Result<String, OcrError>;

    async fn image_to_words(&self, image: &[u8]) -> Result<Vec<WordBox>, OcrError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("ocr engine unavailable: {0}")]
    Unavailable(String),
    #[error("ocr process failed: {0}")]
    ProcessFailed(String),
    #[error("ocr output unreadable: {0}")]
    InvalidOutput(String),
}
