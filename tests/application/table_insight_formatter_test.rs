use docbridge::application::services::{EMPTY_TABLE_ERROR, TableInsightFormatter};
use docbridge::domain::{Table, TableSummary};
use serde_json::json;

#[test]
fn given_quarterly_csv_when_summarizing_then_describes_table() {
    let summary = TableInsightFormatter::new().summarize_csv("Name,Q1\nAlice,100\nBob,200\n");

    let description = summary.description().unwrap();
    assert_eq!(description.columns, vec!["Name", "Q1"]);
    assert_eq!(description.num_rows, 2);
    assert_eq!(description.num_cols, 2);
    assert_eq!(description.column_types, vec!["Name (Text)", "Q1 (Number)"]);
    assert_eq!(description.row_names, vec!["Alice", "Bob"]);
    assert_eq!(
        serde_json::to_value(&description.sample_row).unwrap(),
        json!({"Name": "Alice", "Q1": 100})
    );
    assert_eq!(
        description.insights,
        vec![
            "Table has 2 rows and 2 columns.",
            "Column types: Name (Text), Q1 (Number).",
            "First column 'Name' might be row headers.",
            "Examples: Alice, Bob.",
            "Table might track financial/quarterly data.",
        ]
    );
}

#[test]
fn given_numeric_first_column_when_summarizing_then_has_no_row_names() {
    let summary = TableInsightFormatter::new().summarize_csv("year,count\n2020,3\n2021,4\n");

    let description = summary.description().unwrap();
    assert!(description.row_names.is_empty());
    assert_eq!(
        description.insights,
        vec![
            "Table has 2 rows and 2 columns.",
            "Column types: year (Number), count (Number).",
        ]
    );
}

#[test]
fn given_missing_values_when_summarizing_then_column_stays_numeric() {
    let summary = TableInsightFormatter::new().summarize_csv("a,b\n1,\n2,3.5\n");

    let description = summary.description().unwrap();
    assert_eq!(description.column_types, vec!["a (Number)", "b (Number)"]);
    assert_eq!(
        serde_json::to_value(&description.sample_row).unwrap(),
        json!({"a": 1, "b": null})
    );
}

#[test]
fn given_many_distinct_labels_when_summarizing_then_keeps_first_five() {
    let csv = "item,n\na,1\nb,2\na,3\nc,4\nd,5\ne,6\nf,7\n";

    let summary = TableInsightFormatter::new().summarize_csv(csv);

    assert_eq!(
        summary.description().unwrap().row_names,
        vec!["a", "b", "c", "d", "e"]
    );
}

#[test]
fn given_mixed_column_when_summarizing_then_reports_text_and_keeps_raw_value() {
    let summary = TableInsightFormatter::new().summarize_csv("code,label\n1,x\nA7,y\n");

    let description = summary.description().unwrap();
    assert_eq!(description.column_types[0], "code (Text)");
    assert_eq!(
        serde_json::to_value(&description.sample_row).unwrap(),
        json!({"code": "1", "label": "x"})
    );
}

#[test]
fn given_header_only_csv_when_summarizing_then_returns_empty_error() {
    let summary = TableInsightFormatter::new().summarize_csv("a,b\n");

    assert_eq!(summary.error_message(), Some(EMPTY_TABLE_ERROR));
}

#[test]
fn given_empty_csv_when_summarizing_then_returns_parse_error() {
    let summary = TableInsightFormatter::new().summarize_csv("");

    assert_eq!(
        summary.error_message(),
        Some("Could not parse table. Is it valid CSV? (No columns to parse from file)")
    );
}

#[test]
fn given_table_without_columns_when_summarizing_then_returns_empty_error() {
    let summary = TableInsightFormatter::new().summarize(&Table::default());

    assert_eq!(summary, TableSummary::error(EMPTY_TABLE_ERROR));
}

#[test]
fn given_error_summary_when_serialized_then_has_only_error_field() {
    let json = serde_json::to_value(TableSummary::error("No tables found.")).unwrap();

    assert_eq!(json, json!({"error": "No tables found."}));
}
