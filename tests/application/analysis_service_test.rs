use std::sync::Arc;

use docbridge::application::ports::{FileLoader, FileLoaderError};
use docbridge::application::services::{
    AnalysisError, AnalysisService, NO_TABLE_DETECTED, NO_TABLES_FOUND, SummarizationService,
    TABLE_DATA_UNPROCESSABLE, TABLE_EMPTY_OR_INVALID, TABLE_HEADER_INVALID, TABLE_WITHOUT_DATA,
};
use docbridge::domain::{ContentType, Document, ExtractionResult, IMAGE_TABLE_SUMMARY, RawTable};
use docbridge::infrastructure::llm::MockLlmClient;
use docbridge::infrastructure::text_processing::{
    CompositeFileLoader, CsvAdapter, MockFileLoader, PlainTextAdapter,
};

const MODEL_ANSWER: &str = r#"{"summary": "Model summary.", "keywords": ["k1"]}"#;

fn grid(rows: &[&[&str]]) -> RawTable {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

fn service_with(loader: Arc<dyn FileLoader>) -> (AnalysisService<MockLlmClient>, Arc<MockLlmClient>) {
    let client = Arc::new(MockLlmClient::answering(MODEL_ANSWER));
    let summarizer = Arc::new(SummarizationService::new(Arc::clone(&client)));
    (AnalysisService::new(loader, summarizer), client)
}

fn extraction(text: &str, tables: Vec<RawTable>, image_count: usize) -> ExtractionResult {
    ExtractionResult {
        full_text: text.to_string(),
        tables,
        image_count,
    }
}

fn pdf() -> Document {
    Document::new("report.pdf".to_string(), ContentType::Pdf, 100)
}

#[tokio::test]
async fn given_pdf_with_table_when_analyzing_then_merges_image_count_and_describes_table() {
    let loader = MockFileLoader::returning(extraction(
        "Report body.",
        vec![grid(&[&["Region", "Sales"], &["North", "10"], &["South", "12"]])],
        3,
    ));
    let (service, client) = service_with(Arc::new(loader));

    let analysis = service.analyze_document(b"%PDF", &pdf()).await.unwrap();

    assert_eq!(analysis.doc_summary.summary, "Model summary.");
    assert_eq!(analysis.doc_summary.image_count, 3);
    let description = analysis.table_summary.description().unwrap();
    assert_eq!(description.num_rows, 2);
    assert!(
        description
            .insights
            .contains(&"Table might track financial/quarterly data.".to_string())
    );
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn given_document_without_tables_when_analyzing_then_reports_none_found() {
    let loader = MockFileLoader::returning(extraction("Just prose.", Vec::new(), 0));
    let (service, _) = service_with(Arc::new(loader));

    let analysis = service.analyze_document(b"%PDF", &pdf()).await.unwrap();

    assert_eq!(analysis.table_summary.error_message(), Some(NO_TABLES_FOUND));
}

#[tokio::test]
async fn given_invalid_first_tables_when_analyzing_then_reports_structural_errors() {
    let cases = [
        (grid(&[&["Only", "Header"]]), TABLE_EMPTY_OR_INVALID),
        (grid(&[&["A", "A"], &["1", "2"]]), TABLE_HEADER_INVALID),
        (grid(&[&["A", ""], &["1", "2"]]), TABLE_HEADER_INVALID),
        (grid(&[&["A", "B"], &["1", "2", "3"]]), TABLE_DATA_UNPROCESSABLE),
    ];

    for (table, expected) in cases {
        let valid_second = grid(&[&["X", "Y"], &["1", "2"]]);
        let loader = MockFileLoader::returning(extraction("text", vec![table, valid_second], 0));
        let (service, _) = service_with(Arc::new(loader));

        let analysis = service.analyze_document(b"doc", &pdf()).await.unwrap();

        assert_eq!(analysis.table_summary.error_message(), Some(expected));
    }
}

#[tokio::test]
async fn given_non_document_type_when_analyzing_then_rejects_without_extraction() {
    let loader = Arc::new(MockFileLoader::default());
    let (service, client) = service_with(loader.clone());
    let document = Document::new("notes.txt".to_string(), ContentType::Text, 4);

    let result = service.analyze_document(b"text", &document).await;

    assert!(matches!(result, Err(AnalysisError::UnsupportedType(_))));
    assert!(loader.requested().is_empty());
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn given_empty_document_text_when_analyzing_then_returns_no_text_summary() {
    let loader = MockFileLoader::returning(extraction("", Vec::new(), 2));
    let (service, client) = service_with(Arc::new(loader));

    let analysis = service.analyze_document(b"doc", &pdf()).await.unwrap();

    assert_eq!(analysis.doc_summary.summary, "No text provided.");
    assert_eq!(analysis.doc_summary.image_count, 2);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn given_image_with_table_when_analyzing_then_overrides_summary() {
    let loader = MockFileLoader::returning(extraction(
        "Name Q1\nAlice 100",
        vec![grid(&[&["Name", "Q1"], &["Alice", "100"]])],
        0,
    ));
    let (service, client) = service_with(Arc::new(loader));

    let analysis = service.analyze_image(b"png", "table.png").await.unwrap();

    assert_eq!(analysis.doc_summary.summary, IMAGE_TABLE_SUMMARY);
    assert_eq!(analysis.doc_summary.keywords, vec!["k1"]);
    assert_eq!(analysis.table_summary.description().unwrap().num_rows, 1);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn given_image_with_header_only_table_when_analyzing_then_reports_no_data() {
    let loader = MockFileLoader::returning(extraction("", vec![grid(&[&["Name", "Q1"]])], 0));
    let (service, _) = service_with(Arc::new(loader));

    let analysis = service.analyze_image(b"png", "table.png").await.unwrap();

    assert_eq!(analysis.table_summary.error_message(), Some(TABLE_WITHOUT_DATA));
    assert_eq!(analysis.doc_summary.summary, IMAGE_TABLE_SUMMARY);
}

#[tokio::test]
async fn given_image_with_prose_only_when_analyzing_then_keeps_model_summary() {
    let loader = MockFileLoader::returning(extraction("A photographed paragraph.", Vec::new(), 0));
    let (service, _) = service_with(Arc::new(loader));

    let analysis = service.analyze_image(b"png", "photo.jpg").await.unwrap();

    assert_eq!(analysis.doc_summary.summary, "Model summary.");
    assert_eq!(analysis.table_summary.error_message(), Some(NO_TABLE_DETECTED));
}

#[tokio::test]
async fn given_csv_loader_when_summarizing_csv_then_describes_table() {
    let loader = CompositeFileLoader::new(vec![(
        ContentType::Csv,
        Arc::new(CsvAdapter) as Arc<dyn FileLoader>,
    )]);
    let (service, client) = service_with(Arc::new(loader));

    let summary = service.summarize_csv("Name,Q1\nAlice,100\n").await.unwrap();

    assert_eq!(summary.description().unwrap().columns, vec!["Name", "Q1"]);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn given_malformed_csv_when_summarizing_then_returns_error_variant() {
    let loader = CompositeFileLoader::new(vec![(
        ContentType::Csv,
        Arc::new(CsvAdapter) as Arc<dyn FileLoader>,
    )]);
    let (service, _) = service_with(Arc::new(loader));

    let summary = service.summarize_csv("a,b\n1,2,3\n").await.unwrap();

    assert_eq!(
        summary.error_message(),
        Some("Could not parse table. Is it valid CSV? (Expected 2 fields in line 2, saw 3)")
    );
}

#[tokio::test]
async fn given_text_loader_when_summarizing_text_then_calls_model() {
    let loader = CompositeFileLoader::new(vec![(
        ContentType::Text,
        Arc::new(PlainTextAdapter) as Arc<dyn FileLoader>,
    )]);
    let (service, client) = service_with(Arc::new(loader));

    let summary = service.summarize_text("Plain text body.").await.unwrap();

    assert_eq!(summary.summary, "Model summary.");
    assert!(summary.entities.is_empty());
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn given_missing_adapter_when_summarizing_text_then_surfaces_extraction_error() {
    let loader = CompositeFileLoader::new(Vec::new());
    let (service, _) = service_with(Arc::new(loader));

    let result = service.summarize_text("Plain text body.").await;

    assert!(matches!(
        result,
        Err(AnalysisError::Extraction(
            FileLoaderError::UnsupportedContentType(_)
        ))
    ));
}
