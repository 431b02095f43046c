use std::collections::HashSet;

/// Rows of cell text as extracted, first row being the candidate header.
pub type RawTable = Vec<Vec<String>>;

/// A rectangular grid of cell text with a header row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("table has no data rows")]
    Empty,
    #[error("header is empty or has blank/duplicate column names")]
    InvalidHeader,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Builds a table from raw extracted rows, treating the first row as the
    /// header. Requires a header plus at least one data row, a header whose
    /// names are all non-empty and distinct, and rows as wide as the header.
    pub fn from_rows(mut grid: RawTable) -> Result<Self, TableError> {
        if grid.len() < 2 {
            return Err(TableError::Empty);
        }

        let rows = grid.split_off(1);
        let header = grid.remove(0);

        let distinct: HashSet<&str> = header
            .iter()
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .collect();
        if header.is_empty() || distinct.len() != header.len() {
            return Err(TableError::InvalidHeader);
        }

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != header.len())
        {
            return Err(TableError::RaggedRow {
                row: index + 1,
                expected: header.len(),
                found: row.len(),
            });
        }

        Ok(Self { header, rows })
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.header.len()
    }

    /// Iterates the cells of column `index`, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}
