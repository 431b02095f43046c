mod file_loader;
mod llm_client;
mod ocr_engine;

pub use file_loader::{FileLoader, FileLoaderError};
pub use llm_client::{LlmClient, LlmClientError};
pub use ocr_engine::{OcrEngine, OcrError, WordBox};
