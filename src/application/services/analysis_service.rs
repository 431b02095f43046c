use std::sync::Arc;

use crate::application::ports::{FileLoader, FileLoaderError, LlmClient};
use crate::domain::{
    Analysis, ContentType, DocSummary, Document, IMAGE_TABLE_SUMMARY, RawTable, Table, TableError,
    TableSummary,
};

use super::summarization_service::SummarizationService;
use super::table_insight_formatter::{EMPTY_TABLE_ERROR, TableInsightFormatter};

pub const NO_TABLE_DETECTED: &str = "No table detected.";
pub const TABLE_WITHOUT_DATA: &str = "Detected table structure, but no data found.";
pub const NO_TABLES_FOUND: &str = "No tables found.";
pub const TABLE_EMPTY_OR_INVALID: &str = "Found table, but it was empty/invalid.";
pub const TABLE_HEADER_INVALID: &str = "Found table structure, but header/data invalid.";
pub const TABLE_DATA_UNPROCESSABLE: &str = "Found table, but failed to process data.";

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("unsupported document type: {0}")]
    UnsupportedType(String),
    #[error(transparent)]
    Extraction(#[from] FileLoaderError),
}

/// Composes extraction, summarization and table description for each
/// endpoint.
pub struct AnalysisService<L>
where
    L: LlmClient,
{
    file_loader: Arc<dyn FileLoader>,
    summarizer: Arc<SummarizationService<L>>,
    formatter: TableInsightFormatter,
}

impl<L> AnalysisService<L>
where
    L: LlmClient,
{
    pub fn new(file_loader: Arc<dyn FileLoader>, summarizer: Arc<SummarizationService<L>>) -> Self {
        Self {
            file_loader,
            summarizer,
            formatter: TableInsightFormatter::new(),
        }
    }

    pub async fn summarize_text(&self, text: &str) -> Result<DocSummary, AnalysisError> {
        let document = Document::new("pasted.txt".to_string(), ContentType::Text, text.len() as u64);
        let extraction = self.file_loader.extract(text.as_bytes(), &document).await?;

        Ok(self.summarizer.summarize(&extraction.full_text).await)
    }

    /// Runs CSV text through the CSV adapter and describes the table. Parse
    /// failures come back as the error variant.
    pub async fn summarize_csv(&self, csv_text: &str) -> Result<TableSummary, AnalysisError> {
        let document = Document::new("pasted.csv".to_string(), ContentType::Csv, csv_text.len() as u64);

        let extraction = match self.file_loader.extract(csv_text.as_bytes(), &document).await {
            Ok(extraction) => extraction,
            Err(FileLoaderError::MalformedTable(reason)) => {
                tracing::warn!(%reason, "Error parsing table");
                return Ok(TableInsightFormatter::unparseable(&reason));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(match extraction.first_table().and_then(|grid| grid.split_first()) {
            Some((header, rows)) => self
                .formatter
                .summarize(&Table::new(header.clone(), rows.to_vec())),
            None => TableSummary::error(EMPTY_TABLE_ERROR),
        })
    }

    /// OCR an image for prose and at most one table. When a table is found
    /// the narrative summary is replaced by a pointer to the table insights.
    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn analyze_image(&self, data: &[u8], filename: &str) -> Result<Analysis, AnalysisError> {
        let document = Document::new(filename.to_string(), ContentType::Image, data.len() as u64);
        let extraction = self.file_loader.extract(data, &document).await?;

        let table_summary = match extraction.first_table() {
            None => TableSummary::error(NO_TABLE_DETECTED),
            Some(grid) => self.describe_detected_table(grid),
        };

        let mut doc_summary = self.summarizer.summarize(&extraction.full_text).await;
        if extraction.first_table().is_some() {
            doc_summary.summary = IMAGE_TABLE_SUMMARY.to_string();
        }

        Ok(Analysis {
            doc_summary,
            table_summary,
        })
    }

    /// Summarizes a PDF or DOCX: prose through the model with the document's
    /// image count attached, and the first extracted table through the
    /// formatter.
    #[tracing::instrument(skip(self, data), fields(document_id = %document.id, filename = %document.filename))]
    pub async fn analyze_document(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Analysis, AnalysisError> {
        match document.content_type {
            ContentType::Pdf | ContentType::Docx => {}
            ContentType::Text | ContentType::Csv | ContentType::Image => {
                return Err(AnalysisError::UnsupportedType(
                    document.content_type.as_mime().to_string(),
                ));
            }
        }

        let extraction = self.file_loader.extract(data, document).await?;

        tracing::info!(
            text_len = extraction.full_text.len(),
            tables = extraction.tables.len(),
            images = extraction.image_count,
            "Document extracted"
        );

        let doc_summary = self
            .summarizer
            .summarize(&extraction.full_text)
            .await
            .with_image_count(extraction.image_count);

        let table_summary = match extraction.first_table() {
            None => TableSummary::error(NO_TABLES_FOUND),
            Some(grid) => self.describe_document_table(grid),
        };

        Ok(Analysis {
            doc_summary,
            table_summary,
        })
    }

    fn describe_detected_table(&self, grid: &RawTable) -> TableSummary {
        match grid.split_first() {
            Some((header, rows)) if !rows.is_empty() => self
                .formatter
                .summarize(&Table::new(header.clone(), rows.to_vec())),
            _ => TableSummary::error(TABLE_WITHOUT_DATA),
        }
    }

    fn describe_document_table(&self, grid: &RawTable) -> TableSummary {
        match Table::from_rows(grid.clone()) {
            Ok(table) => self.formatter.summarize(&table),
            Err(e) => {
                tracing::warn!(error = %e, "First table rejected");
                TableSummary::error(match e {
                    TableError::Empty => TABLE_EMPTY_OR_INVALID,
                    TableError::InvalidHeader => TABLE_HEADER_INVALID,
                    TableError::RaggedRow { .. } => TABLE_DATA_UNPROCESSABLE,
                })
            }
        }
    }
}
