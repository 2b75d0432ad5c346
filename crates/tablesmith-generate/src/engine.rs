use std::time::Instant;

use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use tablesmith_core::{
    ColumnSpec, NormalizedSchema, SemanticType, TableSpec, generation_order, validate_schema,
};

use crate::errors::GenerationError;
use crate::foreign::KeyPools;
use crate::model::{Dataset, GenerateOptions, GenerationReport, GenerationRun, Row, TableReport};
use crate::value::Value;

/// Entry point for synthesizing a dataset from a normalized schema.
#[derive(Debug, Clone, Default)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Synthesize every table of the schema in dependency order.
    ///
    /// Key pools are scoped to this call; two runs share no state. Cyclic
    /// schemas and invariant violations fail before any rows are produced.
    pub fn run(&self, schema: &NormalizedSchema) -> Result<GenerationRun, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();

        validate_schema(schema)?;
        let order = generation_order(schema)?;

        let mut pools = KeyPools::new();
        let mut dataset = Dataset::new();
        let mut report = GenerationReport::new(run_id, self.options.seed);

        info!(
            run_id = %report.run_id,
            tables = schema.tables.len(),
            seed = self.options.seed,
            "generation started"
        );

        for table_name in order {
            // Tables referenced by a foreign key but never declared show up
            // in the order as phantom nodes; there is nothing to synthesize
            // for them, and their children fail at the pool lookup.
            let Some(table) = schema.table(&table_name) else {
                continue;
            };

            let rows_requested = self.options.rows.unwrap_or(table.row_count);
            let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(self.options.seed, &table.name));
            let rows = synthesize_table(table, &pools, rows_requested, &mut rng)?;

            if let Some(pk) = &table.primary_key {
                let keys = rows.iter().filter_map(|row| row.get(pk)).cloned().collect();
                pools.publish(&table.name, keys);
            }

            info!(table = %table.name, rows = rows.len(), "table generated");
            report.tables.push(TableReport {
                table: table.name.clone(),
                rows_requested,
                rows_generated: rows.len() as u64,
            });
            dataset.insert(table.name.clone(), rows);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %report.run_id,
            tables = report.tables.len(),
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationRun { dataset, report })
    }
}

/// Synthesize `rows` rows for one table against already-published key pools.
///
/// Column rules apply in declaration order: a primary-key column takes the
/// 1-based row index regardless of its declared type, a foreign-key column
/// draws from the referenced table's pool, and everything else dispatches on
/// the semantic type.
pub fn synthesize_table(
    table: &TableSpec,
    pools: &KeyPools,
    rows: u64,
    rng: &mut impl Rng,
) -> Result<Vec<Row>, GenerationError> {
    let mut out = Vec::with_capacity(rows as usize);

    for row_index in 0..rows {
        let mut row = Row::new();
        for column in &table.columns {
            let value = if column.is_primary_key {
                Value::Int(row_index as i64 + 1)
            } else if let Some(fk) = &column.foreign_key {
                pools
                    .pick(&fk.table, rng)
                    .ok_or_else(|| GenerationError::UnresolvedReference {
                        table: table.name.clone(),
                        column: column.name.clone(),
                        ref_table: fk.table.clone(),
                    })?
            } else {
                value_for_column(column, rng)
            };
            row.insert(column.name.clone(), value);
        }
        out.push(row);
    }

    Ok(out)
}

fn value_for_column(column: &ColumnSpec, rng: &mut impl Rng) -> Value {
    match column.semantic_type() {
        SemanticType::Int => Value::Int(rng.random_range(100..=1000)),
        SemanticType::Float => {
            let value: f64 = rng.random_range(1.0..=1000.0);
            Value::Float((value * 100.0).round() / 100.0)
        }
        SemanticType::Bool => Value::Bool(rng.random_bool(0.5)),
        SemanticType::Text => Value::Text(text_for_column(&column.name, rng)),
    }
}

/// Name-like columns get person names, every other text column an email.
fn text_for_column(column_name: &str, rng: &mut impl Rng) -> String {
    if column_name.to_ascii_lowercase().contains("name") {
        Name().fake_with_rng::<String, _>(rng)
    } else {
        SafeEmail().fake_with_rng::<String, _>(rng)
    }
}

/// FNV-style mix of the run seed and table name, so each table gets a
/// stable, distinct rng stream.
fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablesmith_core::{ForeignKeyRef, ForeignKeyTarget, SchemaSource};

    fn users_table() -> TableSpec {
        let mut users = TableSpec::new("users");
        let mut id = ColumnSpec::new("id", "int");
        id.is_primary_key = true;
        users.columns.push(id);
        users.columns.push(ColumnSpec::new("name", "varchar(50)"));
        users.columns.push(ColumnSpec::new("email", "varchar(100)"));
        users.columns.push(ColumnSpec::new("age", "int"));
        users.columns.push(ColumnSpec::new("score", "float"));
        users.columns.push(ColumnSpec::new("active", "bool"));
        users.primary_key = Some("id".to_string());
        users
    }

    fn orders_table() -> TableSpec {
        let mut orders = TableSpec::new("orders");
        let mut id = ColumnSpec::new("id", "int");
        id.is_primary_key = true;
        orders.columns.push(id);
        let mut user_id = ColumnSpec::new("user_id", "int");
        user_id.foreign_key = Some(ForeignKeyTarget {
            table: "users".to_string(),
            column: "id".to_string(),
        });
        orders.columns.push(user_id);
        orders.primary_key = Some("id".to_string());
        orders.foreign_keys.push(ForeignKeyRef {
            column: "user_id".to_string(),
            ref_table: "users".to_string(),
            ref_column: "id".to_string(),
        });
        orders
    }

    fn schema() -> NormalizedSchema {
        NormalizedSchema::new(SchemaSource::Sql, vec![users_table(), orders_table()])
    }

    #[test]
    fn primary_keys_are_sequential_from_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rows = synthesize_table(&users_table(), &KeyPools::new(), 5, &mut rng).unwrap();

        let ids: Vec<i64> = rows
            .iter()
            .map(|row| row.get("id").and_then(Value::as_i64).unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn typed_columns_respect_value_rules() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let rows = synthesize_table(&users_table(), &KeyPools::new(), 50, &mut rng).unwrap();

        for row in &rows {
            let age = row.get("age").and_then(Value::as_i64).unwrap();
            assert!((100..=1000).contains(&age));

            let score = row.get("score").and_then(Value::as_f64).unwrap();
            assert!((1.0..=1000.0).contains(&score));
            assert_eq!((score * 100.0).round() / 100.0, score);

            assert!(row.get("active").and_then(Value::as_bool).is_some());

            let name = row.get("name").and_then(Value::as_str).unwrap();
            assert!(!name.is_empty());

            let email = row.get("email").and_then(Value::as_str).unwrap();
            assert!(email.contains('@'));
        }
    }

    #[test]
    fn foreign_keys_draw_from_parent_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pools = KeyPools::new();
        pools.publish("users", vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

        let rows = synthesize_table(&orders_table(), &pools, 30, &mut rng).unwrap();
        for row in &rows {
            let user_id = row.get("user_id").and_then(Value::as_i64).unwrap();
            assert!((1..=3).contains(&user_id));
        }
    }

    #[test]
    fn missing_pool_is_an_unresolved_reference() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let err = synthesize_table(&orders_table(), &KeyPools::new(), 1, &mut rng).unwrap_err();

        match err {
            GenerationError::UnresolvedReference {
                table,
                column,
                ref_table,
            } => {
                assert_eq!(table, "orders");
                assert_eq!(column, "user_id");
                assert_eq!(ref_table, "users");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn engine_generates_parents_before_children() {
        let engine = GenerationEngine::new(GenerateOptions {
            rows: Some(3),
            seed: 9,
        });
        let run = engine.run(&schema()).unwrap();

        let users = &run.dataset["users"];
        assert_eq!(users.len(), 3);
        for row in &run.dataset["orders"] {
            let user_id = row.get("user_id").and_then(Value::as_i64).unwrap();
            assert!((1..=3).contains(&user_id));
        }
    }

    #[test]
    fn row_count_override_takes_precedence() {
        let engine = GenerationEngine::new(GenerateOptions {
            rows: Some(4),
            seed: 0,
        });
        let run = engine.run(&schema()).unwrap();
        assert_eq!(run.dataset["users"].len(), 4);

        let engine = GenerationEngine::new(GenerateOptions::default());
        let run = engine.run(&schema()).unwrap();
        assert_eq!(run.dataset["users"].len(), 10);
        assert_eq!(run.report.tables[0].rows_requested, 10);
    }

    #[test]
    fn same_seed_reproduces_the_dataset() {
        let engine = GenerationEngine::new(GenerateOptions {
            rows: Some(6),
            seed: 42,
        });
        let first = engine.run(&schema()).unwrap();
        let second = engine.run(&schema()).unwrap();
        assert_eq!(first.dataset, second.dataset);
    }

    #[test]
    fn structure_is_seed_independent() {
        let schema = schema();
        for seed in [0, 1, 99] {
            let engine = GenerationEngine::new(GenerateOptions {
                rows: Some(5),
                seed,
            });
            let run = engine.run(&schema).unwrap();
            assert_eq!(run.dataset["users"].len(), 5);
            for row in &run.dataset["users"] {
                let mut columns: Vec<&str> = row.keys().map(String::as_str).collect();
                columns.sort_unstable();
                assert_eq!(
                    columns,
                    vec!["active", "age", "email", "id", "name", "score"]
                );
            }
        }
    }

    #[test]
    fn reference_to_undeclared_table_fails_the_run() {
        let schema = NormalizedSchema::new(SchemaSource::Sql, vec![orders_table()]);

        let err = GenerationEngine::default().run(&schema).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::UnresolvedReference { ref ref_table, .. } if ref_table == "users"
        ));
    }

    #[test]
    fn cyclic_schema_fails_before_generation() {
        let mut employees = TableSpec::new("employees");
        let mut id = ColumnSpec::new("id", "int");
        id.is_primary_key = true;
        employees.columns.push(id);
        let mut manager = ColumnSpec::new("manager_id", "int");
        manager.foreign_key = Some(ForeignKeyTarget {
            table: "employees".to_string(),
            column: "id".to_string(),
        });
        employees.columns.push(manager);
        employees.primary_key = Some("id".to_string());
        employees.foreign_keys.push(ForeignKeyRef {
            column: "manager_id".to_string(),
            ref_table: "employees".to_string(),
            ref_column: "id".to_string(),
        });
        let schema = NormalizedSchema::new(SchemaSource::Sql, vec![employees]);

        let err = GenerationEngine::default().run(&schema).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Schema(tablesmith_core::Error::CyclicSchema(_))
        ));
    }
}
