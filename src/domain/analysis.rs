use serde::{Deserialize, Serialize};

use super::doc_summary::DocSummary;
use super::table_summary::TableSummary;

/// Combined result for payloads that carry both prose and tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub doc_summary: DocSummary,
    pub table_summary: TableSummary,
}
