use crate::model::{RuleStats, ValidationReport};

/// Render a deterministic markdown summary of a validation report.
pub fn render_report(report: &ValidationReport) -> String {
    let mut lines = Vec::new();

    lines.push("# Tablesmith Validation Report".to_string());
    lines.push(String::new());
    lines.push(format!(
        "Result: {}",
        if report.passed() { "PASS" } else { "FAIL" }
    ));
    lines.push(String::new());

    lines.push("## Tables".to_string());
    lines.push("| table | rows | columns_checked |".to_string());
    lines.push("| --- | --- | --- |".to_string());
    for table in &report.tables {
        lines.push(format!(
            "| {} | {} | {} |",
            table.table, table.rows, table.columns_checked
        ));
    }
    lines.push(String::new());

    lines.push("## Constraint summary".to_string());
    lines.push("| constraint | checked | violations |".to_string());
    lines.push("| --- | --- | --- |".to_string());
    push_stats_row(&mut lines, "not_null", &report.checks.not_null);
    push_stats_row(&mut lines, "unique", &report.checks.unique);
    push_stats_row(&mut lines, "type", &report.checks.value_type);
    push_stats_row(&mut lines, "in_set", &report.checks.in_set);
    push_stats_row(&mut lines, "foreign_key", &report.checks.foreign_key);
    lines.push(String::new());

    if !report.violations.is_empty() {
        lines.push("## Violations".to_string());
        for violation in &report.violations {
            let rows = if violation.row_indices.is_empty() {
                String::new()
            } else {
                format!(
                    " rows [{}]",
                    violation
                        .row_indices
                        .iter()
                        .map(u64::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            };
            let examples = if violation.examples.is_empty() {
                String::new()
            } else {
                format!(" examples [{}]", violation.examples.join(", "))
            };
            lines.push(format!(
                "- [{}] {}: {}{}{}",
                violation.code.as_str(),
                violation.path,
                violation.message,
                rows,
                examples
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn push_stats_row(lines: &mut Vec<String>, name: &str, stats: &RuleStats) {
    lines.push(format!(
        "| {} | {} | {} |",
        name, stats.checked, stats.violations
    ));
}
