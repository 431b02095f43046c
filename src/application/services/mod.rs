mod analysis_service;
mod csv_table;
mod summarization_service;
mod table_insight_formatter;

pub use analysis_service::{
    AnalysisError, AnalysisService, NO_TABLE_DETECTED, NO_TABLES_FOUND, TABLE_DATA_UNPROCESSABLE,
    TABLE_EMPTY_OR_INVALID, TABLE_HEADER_INVALID, TABLE_WITHOUT_DATA,
};
pub use csv_table::{CsvParseError, normalize_header, parse_csv};
pub use summarization_service::{
    AttemptError, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, ResponseParseError, RetryDecision,
    RetryPolicy, SummarizationService, build_prompt, parse_model_response,
};
pub use table_insight_formatter::{EMPTY_TABLE_ERROR, TableInsightFormatter};
