//! Core contracts and helpers for Tablesmith.
//!
//! This crate defines the canonical normalized-schema types, schema
//! invariant validation, and the foreign-key dependency graph shared by the
//! analyzer, generator, and evaluator crates.

pub mod error;
pub mod graph;
pub mod schema;
pub mod validation;

pub use error::{Error, Result};
pub use graph::{
    DependencyReport, DependencySummary, build_dependency_report, generation_order,
};
pub use schema::{
    ColumnSpec, DEFAULT_ROW_COUNT, ForeignKeyRef, ForeignKeyTarget, NormalizedSchema,
    SchemaSource, SemanticType, TableSpec,
};
pub use validation::validate_schema;

/// Current schema contract version for `schema.json` artifacts.
pub const SCHEMA_VERSION: &str = "0.1";
