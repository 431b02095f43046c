use docbridge::application::ports::{FileLoader, FileLoaderError};
use docbridge::domain::{ContentType, Document};
use docbridge::infrastructure::text_processing::CsvAdapter;

fn csv_document(data: &[u8]) -> Document {
    Document::new("data.csv".to_string(), ContentType::Csv, data.len() as u64)
}

#[tokio::test]
async fn given_csv_when_extracting_then_returns_single_grid_with_header_first() {
    let data = b"Name,,Name\nAlice,1,x\n";

    let result = CsvAdapter.extract(data, &csv_document(data)).await.unwrap();

    assert!(result.full_text.is_empty());
    assert_eq!(result.tables.len(), 1);
    assert_eq!(result.tables[0][0], vec!["Name", "Unnamed: 1", "Name.1"]);
    assert_eq!(result.tables[0][1], vec!["Alice", "1", "x"]);
}

#[tokio::test]
async fn given_ragged_csv_when_extracting_then_returns_malformed_table() {
    let data = b"a\n1,2\n";

    let result = CsvAdapter.extract(data, &csv_document(data)).await;

    match result {
        Err(FileLoaderError::MalformedTable(reason)) => {
            assert_eq!(reason, "Expected 1 fields in line 2, saw 2");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn given_image_document_when_extracting_then_returns_unsupported() {
    let data = b"a,b";
    let document = Document::new("a.png".to_string(), ContentType::Image, 3);

    let result = CsvAdapter.extract(data, &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}
