use std::collections::HashSet;

use serde_json::{Map, Number, Value};

use crate::domain::{ColumnKind, Table, TableDescription, TableSummary};

use super::csv_table::{is_missing, normalize_header, parse_csv};

const MAX_ROW_NAMES: usize = 5;
const FINANCIAL_KEYWORDS: &[&str] = &["sales", "revenue", "q1", "q2"];

pub const EMPTY_TABLE_ERROR: &str = "CSV file is empty or could not be read.";

#[derive(Debug, Clone, Copy, PartialEq)]
enum CellValue {
    Missing,
    Integer(i64),
    Float(f64),
    Text,
}

#[derive(Debug, Clone, Copy)]
struct ParsedCell<'a> {
    raw: &'a str,
    value: CellValue,
}

impl<'a> ParsedCell<'a> {
    fn parse(raw: &'a str) -> Self {
        let value = if is_missing(raw) {
            CellValue::Missing
        } else if let Ok(v) = raw.trim().parse::<i64>() {
            CellValue::Integer(v)
        } else if let Some(v) = parse_float(raw.trim()) {
            CellValue::Float(v)
        } else {
            CellValue::Text
        };

        Self { raw, value }
    }

    fn is_missing(&self) -> bool {
        self.value == CellValue::Missing
    }
}

/// Storage class of a column after inspecting all of its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnStorage {
    /// Every cell is a present integer.
    Integer,
    /// Every present cell is numeric; some may be missing.
    Float,
    Text,
}

impl ColumnStorage {
    fn infer(cells: &[ParsedCell<'_>]) -> Self {
        if cells.iter().any(|c| c.value == CellValue::Text) {
            ColumnStorage::Text
        } else if cells
            .iter()
            .all(|c| matches!(c.value, CellValue::Integer(_)))
        {
            ColumnStorage::Integer
        } else {
            ColumnStorage::Float
        }
    }

    fn kind(&self) -> ColumnKind {
        match self {
            ColumnStorage::Integer | ColumnStorage::Float => ColumnKind::Number,
            ColumnStorage::Text => ColumnKind::Text,
        }
    }

    fn render(&self, cell: &ParsedCell<'_>) -> Value {
        match (self, cell.value) {
            (_, CellValue::Missing) => Value::Null,
            (ColumnStorage::Text, _) | (_, CellValue::Text) => Value::String(cell.raw.to_string()),
            (ColumnStorage::Integer, CellValue::Integer(v)) => Value::from(v),
            (_, CellValue::Integer(v)) => float_value(v as f64),
            (_, CellValue::Float(v)) => float_value(v),
        }
    }
}

/// Describes tables with deterministic, heuristic sentences. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableInsightFormatter;

impl TableInsightFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Parses CSV text and describes it. Never fails: parse problems come back
    /// as the error variant.
    pub fn summarize_csv(&self, csv_text: &str) -> TableSummary {
        match parse_csv(csv_text) {
            Ok(table) => self.summarize(&table),
            Err(e) => {
                tracing::warn!(error = %e, "Error parsing table");
                Self::unparseable(&e.to_string())
            }
        }
    }

    pub fn unparseable(reason: &str) -> TableSummary {
        TableSummary::error(format!("Could not parse table. Is it valid CSV? ({reason})"))
    }

    pub fn summarize(&self, table: &Table) -> TableSummary {
        if table.num_rows() == 0 || table.num_cols() == 0 {
            return TableSummary::error(EMPTY_TABLE_ERROR);
        }

        let columns = normalize_header(table.header.iter().map(String::as_str));
        let num_rows = table.num_rows();
        let num_cols = columns.len();

        let parsed: Vec<Vec<ParsedCell<'_>>> = (0..num_cols)
            .map(|index| table.column(index).map(ParsedCell::parse).collect())
            .collect();
        let storage: Vec<ColumnStorage> = parsed.iter().map(|c| ColumnStorage::infer(c)).collect();

        let column_types: Vec<String> = columns
            .iter()
            .zip(&storage)
            .map(|(name, s)| format!("{} ({})", name, s.kind()))
            .collect();

        let row_names = match storage.first() {
            Some(ColumnStorage::Text) => distinct_values(&parsed[0], MAX_ROW_NAMES),
            _ => Vec::new(),
        };

        let sample_row: Map<String, Value> = columns
            .iter()
            .zip(&parsed)
            .zip(&storage)
            .map(|((name, cells), s)| (name.clone(), s.render(&cells[0])))
            .collect();

        let mut insights = vec![
            format!("Table has {num_rows} rows and {num_cols} columns."),
            format!("Column types: {}.", column_types.join(", ")),
        ];
        if !row_names.is_empty() {
            insights.push(format!("First column '{}' might be row headers.", columns[0]));
            insights.push(format!("Examples: {}.", row_names.join(", ")));
        }
        if looks_financial(&columns) {
            insights.push("Table might track financial/quarterly data.".to_string());
        }

        TableSummary::Described(TableDescription {
            columns,
            num_rows,
            num_cols,
            sample_row,
            column_types,
            row_names,
            insights,
        })
    }
}

fn looks_financial(columns: &[String]) -> bool {
    columns.iter().any(|column| {
        let lowered = column.to_lowercase();
        FINANCIAL_KEYWORDS.iter().any(|kw| lowered.contains(kw))
    })
}

fn distinct_values(cells: &[ParsedCell<'_>], limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    cells
        .iter()
        .filter(|c| !c.is_missing())
        .filter(|c| seen.insert(c.raw))
        .take(limit)
        .map(|c| c.raw.to_string())
        .collect()
}

// Digit separators are not numeric.
fn parse_float(raw: &str) -> Option<f64> {
    if raw.is_empty() || raw.contains('_') {
        return None;
    }
    raw.parse::<f64>().ok()
}

fn float_value(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
