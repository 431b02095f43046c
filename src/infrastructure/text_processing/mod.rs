mod composite_file_loader;
mod csv_adapter;
mod docx_adapter;
mod image_adapter;
mod mock_file_loader;
mod pdf_adapter;
mod plain_text_adapter;
mod table_detector;

pub use composite_file_loader::CompositeFileLoader;
pub use csv_adapter::CsvAdapter;
pub use docx_adapter::{DocxAdapter, parse_document_xml};
pub use image_adapter::ImageAdapter;
pub use mock_file_loader::MockFileLoader;
pub use pdf_adapter::{PageContent, PdfAdapter, assemble_pages};
pub use plain_text_adapter::PlainTextAdapter;
pub use table_detector::{
    BorderlessTableDetector, DEFAULT_COLUMN_GAP, DEFAULT_MIN_CONFIDENCE, text_lines_to_words,
};
