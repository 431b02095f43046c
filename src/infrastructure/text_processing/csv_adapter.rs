use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::application::services::parse_csv;
use crate::domain::{ContentType, Document, ExtractionResult};

/// Parses CSV into a single grid whose first row is the normalized header.
pub struct CsvAdapter;

#[async_trait]
impl FileLoader for CsvAdapter {
    async fn extract(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<ExtractionResult, FileLoaderError> {
        if document.content_type != ContentType::Csv {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let text = std::str::from_utf8(data)
            .map_err(|e| FileLoaderError::MalformedTable(format!("invalid UTF-8: {e}")))?;
        let table = parse_csv(text).map_err(|e| FileLoaderError::MalformedTable(e.to_string()))?;

        let mut grid = Vec::with_capacity(table.rows.len() + 1);
        grid.push(table.header);
        grid.extend(table.rows);

        Ok(ExtractionResult {
            tables: vec![grid],
            ..ExtractionResult::default()
        })
    }
}
