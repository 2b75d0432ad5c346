use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::NormalizedSchema;

/// Validate internal consistency of a normalized schema.
///
/// This checks:
/// - duplicate table/column names
/// - the primary-key column exists in its table
/// - foreign-key source columns exist in their table
///
/// Referenced-table existence is deliberately not checked here; the
/// generation ordering enforces it and reports a missing parent as an
/// unresolved reference.
pub fn validate_schema(schema: &NormalizedSchema) -> Result<()> {
    let mut tables = BTreeSet::new();

    for table in &schema.tables {
        if !tables.insert(table.name.clone()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate table name: {}",
                table.name
            )));
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate column name: {}.{}",
                    table.name, column.name
                )));
            }
        }

        if let Some(pk) = &table.primary_key {
            if !columns.contains(pk.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "primary key column not found: {}.{}",
                    table.name, pk
                )));
            }
        }

        for fk in &table.foreign_keys {
            if !columns.contains(fk.column.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "foreign key column not found: {}.{}",
                    table.name, fk.column
                )));
            }
        }
    }

    Ok(())
}
