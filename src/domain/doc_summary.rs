use serde::{Deserialize, Serialize};

pub const NO_TEXT_SUMMARY: &str = "No text provided.";
pub const BAD_RESPONSE_SUMMARY: &str = "Error: Bad AI response.";
pub const RETRIES_EXHAUSTED_SUMMARY: &str = "Error: AI call failed after retries.";
pub const MISSING_SUMMARY: &str = "Summary failed.";
pub const IMAGE_TABLE_SUMMARY: &str = "Image identified as table. See insights below.";

/// Narrative summary of free text. `entities` is a placeholder kept for
/// response-shape compatibility and is always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSummary {
    pub summary: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    pub image_count: usize,
}

impl DocSummary {
    pub fn new(summary: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            summary: summary.into(),
            keywords,
            entities: Vec::new(),
            image_count: 0,
        }
    }

    pub fn no_text() -> Self {
        Self::new(NO_TEXT_SUMMARY, Vec::new())
    }

    pub fn bad_response() -> Self {
        Self::new(BAD_RESPONSE_SUMMARY, Vec::new())
    }

    pub fn retries_exhausted() -> Self {
        Self::new(RETRIES_EXHAUSTED_SUMMARY, Vec::new())
    }

    pub fn with_image_count(mut self, image_count: usize) -> Self {
        self.image_count = image_count;
        self
    }
}
