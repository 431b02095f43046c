mod analysis;
mod doc_summary;
mod document;
mod document_id;
mod extraction_result;
mod table;
mod table_summary;

pub use analysis::Analysis;
pub use doc_summary::{
    BAD_RESPONSE_SUMMARY, DocSummary, IMAGE_TABLE_SUMMARY, MISSING_SUMMARY, NO_TEXT_SUMMARY,
    RETRIES_EXHAUSTED_SUMMARY,
};
pub use document::{ContentType, Document};
pub use document_id::DocumentId;
pub use extraction_result::ExtractionResult;
pub use table::{RawTable, Table, TableError};
pub use table_summary::{ColumnKind, TableDescription, TableSummary};
