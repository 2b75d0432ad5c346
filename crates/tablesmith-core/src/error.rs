use thiserror::Error;

/// Core error type shared across Tablesmith crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// The foreign-key graph contains a cycle; no generation order exists.
    #[error("cyclic foreign-key dependency involving: {}", .0.join(", "))]
    CyclicSchema(Vec<String>),
}

/// Convenience alias for results returned by Tablesmith crates.
pub type Result<T> = std::result::Result<T, Error>;
