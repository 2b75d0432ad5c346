use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Schema(#[from] tablesmith_core::Error),
    /// A foreign-key column was reached before its referenced table
    /// published any primary keys. Indicates a dependency-ordering bug or a
    /// reference to a table missing from the schema.
    #[error(
        "unresolved reference: {table}.{column} references '{ref_table}', which has no generated primary keys"
    )]
    UnresolvedReference {
        table: String,
        column: String,
        ref_table: String,
    },
}
