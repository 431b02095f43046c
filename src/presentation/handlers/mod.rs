mod error;
mod health;
mod summarize_doc;
mod summarize_image;
mod summarize_mixed_doc;
mod summarize_table;
mod text_request;
mod upload;

pub use error::{ErrorResponse, error_response};
pub use health::health_handler;
pub use summarize_doc::summarize_doc_handler;
pub use summarize_image::summarize_image_handler;
pub use summarize_mixed_doc::summarize_mixed_doc_handler;
pub use summarize_table::summarize_table_handler;
pub use text_request::TextRequest;
