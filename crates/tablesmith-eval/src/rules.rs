use std::collections::BTreeMap;

use serde::Serialize;

use tablesmith_core::{ForeignKeyTarget, NormalizedSchema, SemanticType};
use tablesmith_generate::Value;

/// Expectation sets per table, per column.
pub type Expectations = BTreeMap<String, BTreeMap<String, ExpectationSet>>;

/// Declarative validation rules for one column.
#[derive(Debug, Clone, Serialize)]
pub struct ExpectationSet {
    /// Every value must be present and non-null. Always derived.
    pub not_null: bool,
    /// No duplicate values. Derived for primary-key columns.
    pub unique: bool,
    /// Runtime type every value must match. Always derived.
    pub value_type: SemanticType,
    /// Allowed value set. Never derived from the schema; callers attach it
    /// for columns with a known domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_set: Option<Vec<Value>>,
    /// Every value must appear in the referenced table's referenced column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKeyTarget>,
}

/// Derive per-column expectation sets from a normalized schema.
pub fn derive_expectations(schema: &NormalizedSchema) -> Expectations {
    let mut expectations = Expectations::new();

    for table in &schema.tables {
        let mut columns = BTreeMap::new();
        for column in &table.columns {
            let foreign_key = table
                .foreign_keys
                .iter()
                .find(|fk| fk.column == column.name)
                .map(|fk| ForeignKeyTarget {
                    table: fk.ref_table.clone(),
                    column: fk.ref_column.clone(),
                });

            columns.insert(
                column.name.clone(),
                ExpectationSet {
                    not_null: true,
                    unique: table.primary_key.as_deref() == Some(column.name.as_str()),
                    value_type: column.semantic_type(),
                    in_set: None,
                    foreign_key,
                },
            );
        }
        expectations.insert(table.name.clone(), columns);
    }

    expectations
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablesmith_core::{ColumnSpec, ForeignKeyRef, SchemaSource, TableSpec};

    fn schema() -> NormalizedSchema {
        let mut users = TableSpec::new("users");
        let mut id = ColumnSpec::new("id", "int");
        id.is_primary_key = true;
        users.columns.push(id);
        users.columns.push(ColumnSpec::new("name", "varchar(50)"));
        users.primary_key = Some("id".to_string());

        let mut orders = TableSpec::new("orders");
        orders.columns.push(ColumnSpec::new("id", "int"));
        orders.columns.push(ColumnSpec::new("user_id", "int"));
        orders.columns.push(ColumnSpec::new("total", "float"));
        orders.foreign_keys.push(ForeignKeyRef {
            column: "user_id".to_string(),
            ref_table: "users".to_string(),
            ref_column: "id".to_string(),
        });

        NormalizedSchema::new(SchemaSource::Sql, vec![users, orders])
    }

    #[test]
    fn every_column_gets_not_null_and_a_type() {
        let expectations = derive_expectations(&schema());

        for columns in expectations.values() {
            for rules in columns.values() {
                assert!(rules.not_null);
            }
        }
        assert_eq!(
            expectations["users"]["name"].value_type,
            SemanticType::Text
        );
        assert_eq!(
            expectations["orders"]["total"].value_type,
            SemanticType::Float
        );
    }

    #[test]
    fn primary_key_column_is_unique() {
        let expectations = derive_expectations(&schema());
        assert!(expectations["users"]["id"].unique);
        assert!(!expectations["users"]["name"].unique);
        assert!(!expectations["orders"]["id"].unique);
    }

    #[test]
    fn foreign_key_column_carries_its_target() {
        let expectations = derive_expectations(&schema());
        let target = expectations["orders"]["user_id"]
            .foreign_key
            .as_ref()
            .unwrap();
        assert_eq!(target.table, "users");
        assert_eq!(target.column, "id");
        assert!(expectations["orders"]["id"].foreign_key.is_none());
    }

    #[test]
    fn in_set_is_never_derived() {
        let expectations = derive_expectations(&schema());
        for columns in expectations.values() {
            for rules in columns.values() {
                assert!(rules.in_set.is_none());
            }
        }
    }
}
