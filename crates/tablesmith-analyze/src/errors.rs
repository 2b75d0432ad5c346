use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted while normalizing a schema file.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The schema file extension is neither `.sql` nor `.json`.
    #[error("unsupported schema file type '{0}': expected .sql or .json")]
    UnsupportedFileType(String),
    /// The content could not be parsed into at least one table.
    #[error("failed to parse schema from '{}': {reason}", path.display())]
    SchemaParse { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results returned by the analyzer.
pub type Result<T> = std::result::Result<T, AnalyzeError>;
