use regex::Regex;

use tablesmith_core::{ColumnSpec, ForeignKeyRef, ForeignKeyTarget, TableSpec};

use crate::normalize::ParseWarning;

/// Extract one table per `CREATE TABLE` statement.
///
/// Best-effort: statements that do not parse are skipped, a later statement
/// redefining a table name replaces the earlier one, and key constraints
/// naming unknown columns are dropped with a warning.
pub(crate) fn parse_tables(content: &str, warnings: &mut Vec<ParseWarning>) -> Vec<TableSpec> {
    let Some(parser) = SqlParser::new() else {
        return Vec::new();
    };

    let mut tables: Vec<TableSpec> = Vec::new();
    for statement in content.split(';') {
        if let Some(table) = parser.parse_statement(statement, warnings) {
            match tables.iter().position(|existing| existing.name == table.name) {
                Some(index) => tables[index] = table,
                None => tables.push(table),
            }
        }
    }
    tables
}

struct SqlParser {
    table_head: Regex,
    column_def: Regex,
    primary_key: Regex,
    foreign_key: Regex,
}

impl SqlParser {
    fn new() -> Option<Self> {
        Some(Self {
            table_head: Regex::new(
                r#"(?is)^create\s+table\s+(?:if\s+not\s+exists\s+)?["`]?(\w+)["`]?\s*\("#,
            )
            .ok()?,
            column_def: Regex::new(r#"^["`]?(\w+)["`]?\s+([\w()]+)"#).ok()?,
            primary_key: Regex::new(
                r#"(?i)^(?:constraint\s+\w+\s+)?primary\s+key\s*\(\s*["`]?(\w+)["`]?\s*\)"#,
            )
            .ok()?,
            foreign_key: Regex::new(
                r#"(?i)^(?:constraint\s+\w+\s+)?foreign\s+key\s*\(\s*["`]?(\w+)["`]?\s*\)\s*references\s+["`]?(\w+)["`]?\s*\(\s*["`]?(\w+)["`]?\s*\)"#,
            )
            .ok()?,
        })
    }

    fn parse_statement(
        &self,
        statement: &str,
        warnings: &mut Vec<ParseWarning>,
    ) -> Option<TableSpec> {
        let statement = statement.trim();
        if !statement.to_ascii_lowercase().starts_with("create table") {
            return None;
        }

        let head = self.table_head.captures(statement)?;
        let name = head.get(1)?.as_str().to_string();
        let body = table_body(&statement[head.get(0)?.end()..]);
        let items: Vec<&str> = split_top_level(body)
            .into_iter()
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect();

        let mut table = TableSpec::new(name);

        // Columns first; constraint clauses may precede their column in the
        // statement body.
        for item in &items {
            if is_constraint_clause(item) {
                continue;
            }
            if let Some(caps) = self.column_def.captures(item) {
                let column_name = caps[1].to_string();
                if table.column(&column_name).is_none() {
                    table
                        .columns
                        .push(ColumnSpec::new(column_name, caps[2].to_string()));
                }
            }
        }

        for item in &items {
            if let Some(caps) = self.foreign_key.captures(item) {
                self.attach_foreign_key(
                    &mut table,
                    caps[1].to_string(),
                    caps[2].to_string(),
                    caps[3].to_string(),
                    warnings,
                );
            } else if let Some(caps) = self.primary_key.captures(item) {
                self.attach_primary_key(&mut table, caps[1].to_string(), warnings);
            }
        }

        Some(table)
    }

    fn attach_primary_key(
        &self,
        table: &mut TableSpec,
        column: String,
        warnings: &mut Vec<ParseWarning>,
    ) {
        if table.primary_key.is_some() {
            return;
        }
        match table.columns.iter_mut().find(|spec| spec.name == column) {
            Some(spec) => {
                spec.is_primary_key = true;
                table.primary_key = Some(column);
            }
            None => warnings.push(ParseWarning::MalformedConstraint {
                table: table.name.clone(),
                constraint: "primary key".to_string(),
                column,
            }),
        }
    }

    fn attach_foreign_key(
        &self,
        table: &mut TableSpec,
        column: String,
        ref_table: String,
        ref_column: String,
        warnings: &mut Vec<ParseWarning>,
    ) {
        match table.columns.iter_mut().find(|spec| spec.name == column) {
            Some(spec) => {
                spec.foreign_key = Some(ForeignKeyTarget {
                    table: ref_table.clone(),
                    column: ref_column.clone(),
                });
                table.foreign_keys.push(ForeignKeyRef {
                    column,
                    ref_table,
                    ref_column,
                });
            }
            None => warnings.push(ParseWarning::MalformedConstraint {
                table: table.name.clone(),
                constraint: "foreign key".to_string(),
                column,
            }),
        }
    }
}

/// Slice of `rest` up to the parenthesis closing the table body.
///
/// `rest` starts just past the opening parenthesis. Unbalanced input yields
/// everything that remains.
fn table_body(rest: &str) -> &str {
    let mut depth = 1_usize;
    for (index, ch) in rest.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return &rest[..index];
                }
            }
            _ => {}
        }
    }
    rest
}

/// Split a table body on commas outside parentheses, so type tokens like
/// `varchar(255)` and key clauses keep their argument lists intact.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0_usize;
    for (index, ch) in body.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&body[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    items.push(&body[start..]);
    items
}

fn is_constraint_clause(item: &str) -> bool {
    let lower = item.trim_start().to_ascii_lowercase();
    let head: String = lower
        .chars()
        .take_while(|ch| ch.is_ascii_alphabetic() || *ch == '_')
        .collect();
    matches!(
        head.as_str(),
        "primary" | "foreign" | "constraint" | "unique" | "check" | "key" | "index"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (Vec<TableSpec>, Vec<ParseWarning>) {
        let mut warnings = Vec::new();
        let tables = parse_tables(content, &mut warnings);
        (tables, warnings)
    }

    #[test]
    fn extracts_columns_and_primary_key() {
        let (tables, warnings) = parse(
            "CREATE TABLE users (\n  id int,\n  name varchar(50),\n  PRIMARY KEY (id)\n);",
        );

        assert!(warnings.is_empty());
        assert_eq!(tables.len(), 1);
        let users = &tables[0];
        assert_eq!(users.name, "users");
        assert_eq!(users.primary_key.as_deref(), Some("id"));
        assert_eq!(users.columns.len(), 2);
        assert_eq!(users.columns[0].name, "id");
        assert!(users.columns[0].is_primary_key);
        assert_eq!(users.columns[1].name, "name");
        assert_eq!(users.columns[1].declared_type, "varchar(50)");
        assert!(!users.columns[1].is_primary_key);
    }

    #[test]
    fn table_without_constraints_has_no_keys() {
        let (tables, _) = parse("create table logs (message varchar(200), level int)");

        assert_eq!(tables[0].primary_key, None);
        assert!(tables[0].foreign_keys.is_empty());
        assert_eq!(tables[0].columns.len(), 2);
    }

    #[test]
    fn extracts_foreign_keys() {
        let (tables, warnings) = parse(
            "CREATE TABLE users (id int, PRIMARY KEY (id));\n\
             CREATE TABLE orders (\n  id int,\n  user_id int,\n  PRIMARY KEY (id),\n  FOREIGN KEY (user_id) REFERENCES users (id)\n);",
        );

        assert!(warnings.is_empty());
        assert_eq!(tables.len(), 2);
        let orders = &tables[1];
        assert_eq!(orders.foreign_keys.len(), 1);
        let fk = &orders.foreign_keys[0];
        assert_eq!(fk.column, "user_id");
        assert_eq!(fk.ref_table, "users");
        assert_eq!(fk.ref_column, "id");
        let target = orders.column("user_id").unwrap().foreign_key.as_ref().unwrap();
        assert_eq!(target.table, "users");
        assert_eq!(target.column, "id");
    }

    #[test]
    fn captures_multiple_foreign_keys_per_table() {
        let (tables, _) = parse(
            "CREATE TABLE order_items (\n  id int,\n  order_id int,\n  product_id int,\n  PRIMARY KEY (id),\n  FOREIGN KEY (order_id) REFERENCES orders (id),\n  FOREIGN KEY (product_id) REFERENCES products (id)\n);",
        );

        assert_eq!(tables[0].foreign_keys.len(), 2);
    }

    #[test]
    fn drops_constraint_on_unknown_column_with_warning() {
        let (tables, warnings) = parse(
            "CREATE TABLE users (id int, PRIMARY KEY (uid), FOREIGN KEY (tenant) REFERENCES tenants (id));",
        );

        assert_eq!(tables[0].primary_key, None);
        assert!(tables[0].foreign_keys.is_empty());
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            warnings[0],
            ParseWarning::MalformedConstraint {
                table: "users".to_string(),
                constraint: "primary key".to_string(),
                column: "uid".to_string(),
            }
        );
    }

    #[test]
    fn tolerates_trailing_commas_and_casing() {
        let (tables, _) = parse("Create Table Events (\n  id INT,\n  label VARCHAR(30),\n)");

        assert_eq!(tables[0].name, "Events");
        assert_eq!(tables[0].columns.len(), 2);
        assert_eq!(tables[0].columns[1].declared_type, "VARCHAR(30)");
    }

    #[test]
    fn skips_statements_that_are_not_create_table() {
        let (tables, _) = parse(
            "DROP TABLE old_users;\nCREATE TABLE users (id int);\nINSERT INTO users VALUES (1);",
        );

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "users");
    }

    #[test]
    fn later_definition_replaces_earlier_table() {
        let (tables, _) = parse(
            "CREATE TABLE users (id int);\nCREATE TABLE users (id int, email varchar(100));",
        );

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].columns.len(), 2);
    }

    #[test]
    fn unparsed_multi_column_key_does_not_become_a_column() {
        let (tables, _) = parse("CREATE TABLE pairs (a int, b int, PRIMARY KEY (a, b));");

        assert_eq!(tables[0].columns.len(), 2);
        assert_eq!(tables[0].primary_key, None);
    }

    #[test]
    fn no_create_table_yields_no_tables() {
        let (tables, _) = parse("SELECT * FROM users;");
        assert!(tables.is_empty());
    }
}
