use crate::domain::Table;

/// Cell values treated as missing, matching common spreadsheet/dataframe
/// conventions.
const MISSING_SENTINELS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CsvParseError {
    #[error("No columns to parse from file")]
    NoColumns,
    #[error("Expected {expected} fields in line {line}, saw {found}")]
    TooManyFields {
        expected: usize,
        line: u64,
        found: usize,
    },
    #[error("{0}")]
    Malformed(String),
}

/// Parses CSV text into a table. The first non-blank record is the header;
/// short records are padded with empty (missing) cells, long records are an
/// error.
pub fn parse_csv(content: &str) -> Result<Table, CsvParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let header = loop {
        match records.next() {
            None => return Err(CsvParseError::NoColumns),
            Some(Err(e)) => return Err(CsvParseError::Malformed(e.to_string())),
            Some(Ok(record)) if is_blank(&record) => continue,
            Some(Ok(record)) => break record,
        }
    };

    let header = normalize_header(header.iter());
    let width = header.len();
    let mut rows = Vec::new();

    for result in records {
        let record = result.map_err(|e| CsvParseError::Malformed(e.to_string()))?;
        if is_blank(&record) {
            continue;
        }

        if record.len() > width {
            return Err(CsvParseError::TooManyFields {
                expected: width,
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                found: record.len(),
            });
        }

        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(Table::new(header, rows))
}

/// Makes column names usable as keys: blank names become `Unnamed: i` and
/// repeats get a `.n` suffix.
pub fn normalize_header<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut header: Vec<String> = Vec::new();

    for (index, name) in names.enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {index}")
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while header.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        header.push(candidate);
    }

    header
}

pub fn is_missing(value: &str) -> bool {
    MISSING_SENTINELS.contains(&value)
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(str::is_empty)
}
