//! Dependency-aware synthetic row generation.
//!
//! Synthesizes rows for every table of a [`tablesmith_core::NormalizedSchema`]
//! in foreign-key dependency order: primary keys are sequential integers,
//! foreign keys draw from the primary-key pools of already-generated parent
//! tables, and remaining columns dispatch on their semantic type. Generation
//! is deterministic for a given seed.

pub mod engine;
pub mod errors;
pub mod foreign;
pub mod model;
pub mod value;

pub use engine::{GenerationEngine, synthesize_table};
pub use errors::GenerationError;
pub use foreign::KeyPools;
pub use model::{
    Dataset, GenerateOptions, GenerationReport, GenerationRun, Row, TableReport,
};
pub use value::Value;
