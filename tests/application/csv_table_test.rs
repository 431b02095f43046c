use docbridge::application::services::{CsvParseError, normalize_header, parse_csv};

#[test]
fn given_header_and_rows_when_parsing_then_returns_table() {
    let table = parse_csv("Name,Q1\nAlice,100\nBob,200\n").unwrap();

    assert_eq!(table.header, vec!["Name", "Q1"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1], vec!["Bob", "200"]);
}

#[test]
fn given_blank_lines_when_parsing_then_skips_them() {
    let table = parse_csv("\na,b\n\n1,2\n\n").unwrap();

    assert_eq!(table.header, vec!["a", "b"]);
    assert_eq!(table.rows, vec![vec!["1".to_string(), "2".to_string()]]);
}

#[test]
fn given_short_row_when_parsing_then_pads_with_empty_cells() {
    let table = parse_csv("a,b,c\n1\n").unwrap();

    assert_eq!(table.rows[0], vec!["1", "", ""]);
}

#[test]
fn given_row_wider_than_header_when_parsing_then_reports_line() {
    let err = parse_csv("a,b\n1,2\n3,4,5\n").unwrap_err();

    assert_eq!(err.to_string(), "Expected 2 fields in line 3, saw 3");
}

#[test]
fn given_empty_input_when_parsing_then_returns_no_columns() {
    assert_eq!(parse_csv("").unwrap_err(), CsvParseError::NoColumns);
}

#[test]
fn given_quoted_fields_when_parsing_then_keeps_embedded_commas() {
    let table = parse_csv("city,note\n\"Paris, FR\",\"a \"\"quote\"\"\"\n").unwrap();

    assert_eq!(table.rows[0], vec!["Paris, FR", "a \"quote\""]);
}

#[test]
fn given_blank_and_duplicate_names_when_normalizing_then_renames_them() {
    let header = normalize_header(["x", "", "x", "x"].into_iter());

    assert_eq!(header, vec!["x", "Unnamed: 1", "x.1", "x.2"]);
}
