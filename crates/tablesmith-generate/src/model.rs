use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One generated row, keyed by column name.
///
/// Column declaration order is recovered from the table's
/// [`tablesmith_core::TableSpec`] when a serializer needs it.
pub type Row = BTreeMap<String, Value>;

/// Generated rows per table, in generation order.
pub type Dataset = BTreeMap<String, Vec<Row>>;

/// Options for the generation engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Rows per table; overrides every table's schema-level `row_count`.
    pub rows: Option<u64>,
    /// Seed for deterministic generation.
    pub seed: u64,
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub rows_requested: u64,
    pub rows_generated: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub tables: Vec<TableReport>,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64) -> Self {
        Self {
            run_id,
            seed,
            tables: Vec::new(),
            duration_ms: 0,
        }
    }
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationRun {
    pub dataset: Dataset,
    pub report: GenerationReport,
}
