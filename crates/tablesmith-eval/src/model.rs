use serde::Serialize;

/// Options for dataset validation.
#[derive(Debug, Clone)]
pub struct EvaluateOptions {
    /// Return an error when the report contains violations.
    pub strict: bool,
    /// Cap on offending row indices/values recorded per rule.
    pub max_examples: usize,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_examples: 5,
        }
    }
}

/// Expectation kind a violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    Null,
    Uniqueness,
    Type,
    Membership,
    Referential,
}

impl ViolationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationCode::Null => "null",
            ViolationCode::Uniqueness => "uniqueness",
            ViolationCode::Type => "type",
            ViolationCode::Membership => "membership",
            ViolationCode::Referential => "referential",
        }
    }
}

/// One failed expectation, with a bounded sample of the offenders.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub code: ViolationCode,
    /// `table.column` the rule applies to.
    pub path: String,
    pub message: String,
    /// Offending row indices (0-based), capped at `max_examples`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub row_indices: Vec<u64>,
    /// Offending values, capped at `max_examples`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Checked/violated counters for one expectation kind.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RuleStats {
    pub checked: u64,
    pub violations: u64,
}

/// Counters per expectation kind across the whole dataset.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ConstraintSummary {
    pub not_null: RuleStats,
    pub unique: RuleStats,
    pub value_type: RuleStats,
    pub in_set: RuleStats,
    pub foreign_key: RuleStats,
}

/// Per-table row and column counts observed during validation.
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub table: String,
    pub rows: u64,
    pub columns_checked: u64,
}

/// Structured result of validating one dataset against one schema.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub tables: Vec<TableSummary>,
    pub checks: ConstraintSummary,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}
