use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use tablesmith_core::{NormalizedSchema, SchemaSource};

use crate::errors::{AnalyzeError, Result};
use crate::{json, sql};

/// Result of normalizing one schema file.
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub schema: NormalizedSchema,
    /// Non-fatal anomalies encountered while parsing.
    pub warnings: Vec<ParseWarning>,
}

/// Non-fatal parse anomaly; normalization continues without the constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// A key constraint named a column absent from the extracted column set.
    MalformedConstraint {
        table: String,
        constraint: String,
        column: String,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::MalformedConstraint {
                table,
                constraint,
                column,
            } => write!(
                f,
                "dropped {constraint} constraint on '{table}': column '{column}' not found"
            ),
        }
    }
}

/// Read and normalize a schema file.
pub fn normalize_file(path: impl AsRef<Path>) -> Result<NormalizeOutcome> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    normalize_str(path, &content)
}

/// Normalize already-read schema content.
///
/// The path is threaded explicitly: it selects the format by extension and
/// names the table for JSON schemas. No ambient state is consulted.
pub fn normalize_str(path: &Path, content: &str) -> Result<NormalizeOutcome> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let mut warnings = Vec::new();
    let schema = match extension.as_str() {
        "sql" => {
            let tables = sql::parse_tables(content, &mut warnings);
            if tables.is_empty() {
                return Err(AnalyzeError::SchemaParse {
                    path: path.to_path_buf(),
                    reason: "no CREATE TABLE statements found".to_string(),
                });
            }
            NormalizedSchema::new(SchemaSource::Sql, tables)
        }
        "json" => {
            let table =
                json::parse_table(path, content, &mut warnings).map_err(|err| {
                    AnalyzeError::SchemaParse {
                        path: path.to_path_buf(),
                        reason: err.to_string(),
                    }
                })?;
            NormalizedSchema::new(SchemaSource::Json, vec![table])
        }
        other => return Err(AnalyzeError::UnsupportedFileType(other.to_string())),
    };

    for warning in &warnings {
        warn!(schema_file = %path.display(), "{warning}");
    }

    Ok(NormalizeOutcome { schema, warnings })
}
