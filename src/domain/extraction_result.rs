use super::table::RawTable;

/// Normalized output of an extraction adapter, consumed once by a handler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractionResult {
    pub full_text: String,
    /// Cell grids in document order, unvalidated.
    pub tables: Vec<RawTable>,
    pub image_count: usize,
}

impl ExtractionResult {
    pub fn text(full_text: impl Into<String>) -> Self {
        Self {
            full_text: full_text.into(),
            ..Self::default()
        }
    }

    pub fn first_table(&self) -> Option<&RawTable> {
        self.tables.first()
    }
}
