//! Schema normalization from declarative schema files.
//!
//! Turns `.sql` files (a best-effort reading of `CREATE TABLE` statements)
//! and `.json` files (the `fields`/`primaryKey` convention) into the
//! canonical [`tablesmith_core::NormalizedSchema`]. Constraint clauses that
//! cannot be attached to an extracted column are dropped with a recorded
//! warning rather than failing the whole parse.

pub mod errors;
mod json;
mod normalize;
mod sql;

pub use errors::{AnalyzeError, Result};
pub use normalize::{NormalizeOutcome, ParseWarning, normalize_file, normalize_str};
