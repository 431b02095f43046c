use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Number,
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Number => "Number",
            ColumnKind::Text => "Text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescription {
    pub columns: Vec<String>,
    pub num_rows: usize,
    pub num_cols: usize,
    pub sample_row: Map<String, Value>,
    pub column_types: Vec<String>,
    pub row_names: Vec<String>,
    pub insights: Vec<String>,
}

/// Heuristic description of a table, or the reason none could be produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableSummary {
    Described(TableDescription),
    Error { error: String },
}

impl TableSummary {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn description(&self) -> Option<&TableDescription> {
        match self {
            Self::Described(description) => Some(description),
            Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Described(_) => None,
            Self::Error { error } => Some(error),
        }
    }
}
