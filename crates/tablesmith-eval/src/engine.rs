use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use tablesmith_core::NormalizedSchema;
use tablesmith_generate::{Dataset, Row, Value};

use crate::errors::EvalError;
use crate::model::{
    EvaluateOptions, RuleStats, TableSummary, ValidationReport, Violation, ViolationCode,
};
use crate::rules::{ExpectationSet, Expectations, derive_expectations};

/// Checks datasets against schema-derived expectations.
///
/// Purely observational: the dataset is never mutated, and expectation
/// failures come back as report data. The only error conditions are
/// structural mismatches between schema and dataset (and the opt-in strict
/// gate).
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    options: EvaluateOptions,
}

impl ValidationEngine {
    pub fn new(options: EvaluateOptions) -> Self {
        Self { options }
    }

    /// Derive expectations from the schema and check the dataset.
    pub fn run(
        &self,
        schema: &NormalizedSchema,
        dataset: &Dataset,
    ) -> Result<ValidationReport, EvalError> {
        let expectations = derive_expectations(schema);
        self.check(&expectations, dataset)
    }

    /// Check a dataset against explicit expectation sets.
    ///
    /// Exposed separately so callers can attach rules the deriver does not
    /// produce (e.g. `in_set` domains) before checking.
    pub fn check(
        &self,
        expectations: &Expectations,
        dataset: &Dataset,
    ) -> Result<ValidationReport, EvalError> {
        verify_structure(expectations, dataset)?;

        let mut report = ValidationReport::default();

        for (table_name, columns) in expectations {
            let Some(rows) = dataset.get(table_name) else {
                continue;
            };
            info!(table = %table_name, rows = rows.len(), "validating table");

            for (column_name, rules) in columns {
                check_column(
                    table_name,
                    column_name,
                    rules,
                    rows,
                    dataset,
                    self.options.max_examples,
                    &mut report,
                );
            }

            report.tables.push(TableSummary {
                table: table_name.clone(),
                rows: rows.len() as u64,
                columns_checked: columns.len() as u64,
            });
        }

        if self.options.strict && !report.passed() {
            return Err(EvalError::Violations(report.violations.len() as u64));
        }
        Ok(report)
    }
}

/// Both directions of the schema/dataset table mapping must line up, and
/// every foreign-key target table must have data to check against.
fn verify_structure(expectations: &Expectations, dataset: &Dataset) -> Result<(), EvalError> {
    for table_name in expectations.keys() {
        if !dataset.contains_key(table_name) {
            return Err(EvalError::SchemaDataMismatch(format!(
                "table '{table_name}' missing from dataset"
            )));
        }
    }
    for table_name in dataset.keys() {
        if !expectations.contains_key(table_name) {
            return Err(EvalError::SchemaDataMismatch(format!(
                "dataset table '{table_name}' not present in schema"
            )));
        }
    }
    for (table_name, columns) in expectations {
        for (column_name, rules) in columns {
            if let Some(target) = &rules.foreign_key {
                if !dataset.contains_key(&target.table) {
                    return Err(EvalError::SchemaDataMismatch(format!(
                        "foreign key {table_name}.{column_name} references '{}', which is missing from the dataset",
                        target.table
                    )));
                }
            }
        }
    }
    Ok(())
}

fn check_column(
    table: &str,
    column: &str,
    rules: &ExpectationSet,
    rows: &[Row],
    dataset: &Dataset,
    max_examples: usize,
    report: &mut ValidationReport,
) {
    let path = format!("{table}.{column}");
    let values: Vec<Option<&Value>> = rows.iter().map(|row| row.get(column)).collect();

    if rules.not_null {
        report.checks.not_null.checked += 1;
        let offending: Vec<u64> = values
            .iter()
            .enumerate()
            .filter(|(_, value)| value.is_none_or(|value| value.is_null()))
            .map(|(index, _)| index as u64)
            .collect();
        if !offending.is_empty() {
            report.checks.not_null.violations += offending.len() as u64;
            report.violations.push(Violation {
                code: ViolationCode::Null,
                path: path.clone(),
                message: format!(
                    "{} of {} value(s) are null or missing",
                    offending.len(),
                    rows.len()
                ),
                row_indices: truncated(offending, max_examples),
                examples: Vec::new(),
            });
        }
    }

    if rules.unique {
        report.checks.unique.checked += 1;
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for value in values.iter().flatten() {
            if !value.is_null() {
                *counts.entry(value.key()).or_insert(0) += 1;
            }
        }
        let duplicates: Vec<String> = counts
            .into_iter()
            .filter_map(|(key, count)| (count > 1).then_some(key))
            .collect();
        if !duplicates.is_empty() {
            report.checks.unique.violations += duplicates.len() as u64;
            report.violations.push(Violation {
                code: ViolationCode::Uniqueness,
                path: path.clone(),
                message: format!("{} duplicated value(s)", duplicates.len()),
                row_indices: Vec::new(),
                examples: truncated(duplicates, max_examples),
            });
        }
    }

    report.checks.value_type.checked += 1;
    let mut mismatch_rows = Vec::new();
    let mut mismatch_examples = BTreeSet::new();
    for (index, value) in values.iter().enumerate() {
        if let Some(value) = value {
            if !value.is_null() && value.semantic_type() != Some(rules.value_type) {
                mismatch_rows.push(index as u64);
                mismatch_examples.insert(value.key());
            }
        }
    }
    if !mismatch_rows.is_empty() {
        report.checks.value_type.violations += mismatch_rows.len() as u64;
        report.violations.push(Violation {
            code: ViolationCode::Type,
            path: path.clone(),
            message: format!(
                "{} value(s) do not match expected type '{}'",
                mismatch_rows.len(),
                rules.value_type
            ),
            row_indices: truncated(mismatch_rows, max_examples),
            examples: truncated(mismatch_examples.into_iter().collect(), max_examples),
        });
    }

    if let Some(allowed) = &rules.in_set {
        report.checks.in_set.checked += 1;
        let allowed: BTreeSet<String> = allowed.iter().map(Value::key).collect();
        membership_check(
            &values,
            &allowed,
            ViolationCode::Membership,
            &path,
            "allowed set",
            max_examples,
            &mut report.checks.in_set,
            &mut report.violations,
        );
    }

    if let Some(target) = &rules.foreign_key {
        report.checks.foreign_key.checked += 1;
        let allowed: BTreeSet<String> = dataset
            .get(&target.table)
            .map(|parent_rows| {
                parent_rows
                    .iter()
                    .filter_map(|row| row.get(&target.column))
                    .filter(|value| !value.is_null())
                    .map(Value::key)
                    .collect()
            })
            .unwrap_or_default();
        membership_check(
            &values,
            &allowed,
            ViolationCode::Referential,
            &path,
            &format!("{}.{}", target.table, target.column),
            max_examples,
            &mut report.checks.foreign_key,
            &mut report.violations,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn membership_check(
    values: &[Option<&Value>],
    allowed: &BTreeSet<String>,
    code: ViolationCode,
    path: &str,
    domain: &str,
    max_examples: usize,
    stats: &mut RuleStats,
    violations: &mut Vec<Violation>,
) {
    let mut offending_rows = Vec::new();
    let mut offending_values = BTreeSet::new();
    for (index, value) in values.iter().enumerate() {
        if let Some(value) = value {
            if !value.is_null() && !allowed.contains(&value.key()) {
                offending_rows.push(index as u64);
                offending_values.insert(value.key());
            }
        }
    }
    if !offending_rows.is_empty() {
        stats.violations += offending_rows.len() as u64;
        violations.push(Violation {
            code,
            path: path.to_string(),
            message: format!(
                "{} value(s) not found in {domain}",
                offending_rows.len()
            ),
            row_indices: truncated(offending_rows, max_examples),
            examples: truncated(offending_values.into_iter().collect(), max_examples),
        });
    }
}

fn truncated<T>(mut items: Vec<T>, max: usize) -> Vec<T> {
    items.truncate(max);
    items
}
