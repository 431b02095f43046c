mod mock_ocr_engine;
mod tesseract_engine;

pub use mock_ocr_engine::MockOcrEngine;
pub use tesseract_engine::{TesseractEngine, parse_tsv};
