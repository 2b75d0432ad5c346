//! Schema-derived validation of generated datasets.
//!
//! Derives per-column expectation sets (not-null, uniqueness, type,
//! set-membership, referential membership) from a normalized schema and
//! checks a generated dataset against them. Expectation failures are data in
//! the returned report, never errors; the checker only fails on structurally
//! mismatched input.

pub mod engine;
pub mod errors;
pub mod model;
pub mod report;
pub mod rules;

pub use engine::ValidationEngine;
pub use errors::EvalError;
pub use model::{
    ConstraintSummary, EvaluateOptions, RuleStats, TableSummary, ValidationReport, Violation,
    ViolationCode,
};
pub use report::render_report;
pub use rules::{ExpectationSet, Expectations, derive_expectations};
