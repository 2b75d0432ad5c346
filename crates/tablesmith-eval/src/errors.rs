use thiserror::Error;

/// Errors emitted by the validation engine.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The dataset and schema disagree structurally (e.g. a schema table or
    /// a foreign-key target is missing from the dataset).
    #[error("schema/data mismatch: {0}")]
    SchemaDataMismatch(String),
    /// Strict mode: the report contains violations.
    #[error("validation failed with {0} violation(s)")]
    Violations(u64),
}
