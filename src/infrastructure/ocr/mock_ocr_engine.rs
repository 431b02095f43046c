use async_trait::async_trait;

use crate::application::ports::{OcrEngine, OcrError, WordBox};

/// Returns fixed text and word boxes regardless of the image.
#[derive(Debug, Clone, Default)]
pub struct MockOcrEngine {
    pub text: String,
    pub words: Vec<WordBox>,
}

impl MockOcrEngine {
    pub fn new(text: impl Into<String>, words: Vec<WordBox>) -> Self {
        Self {
            text: text.into(),
            words,
        }
    }
}

#[async_trait]
impl OcrEngine for MockOcrEngine {
    async fn image_to_string(&self, _image: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }

    async fn image_to_words(&self, _image: &[u8]) -> Result<Vec<WordBox>, OcrError> {
        Ok(self.words.clone())
    }
}
