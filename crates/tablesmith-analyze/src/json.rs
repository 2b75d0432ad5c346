use std::path::Path;

use serde::Deserialize;

use tablesmith_core::{ColumnSpec, TableSpec};

use crate::normalize::ParseWarning;

/// The `fields`/`primaryKey` convention, the only JSON shape recognized.
#[derive(Debug, Deserialize)]
struct JsonSchemaDoc {
    #[serde(rename = "primaryKey")]
    primary_key: Option<String>,
    #[serde(default)]
    fields: Vec<JsonField>,
}

#[derive(Debug, Deserialize)]
struct JsonField {
    name: String,
    #[serde(rename = "type")]
    declared_type: Option<String>,
}

/// Parse a JSON schema document into a single table.
///
/// The table name is the file's base name with directory and extension
/// stripped; two files sharing a base name collide, which the caller must
/// avoid. A `primaryKey` naming no field is dropped with a warning.
pub(crate) fn parse_table(
    path: &Path,
    content: &str,
    warnings: &mut Vec<ParseWarning>,
) -> Result<TableSpec, serde_json::Error> {
    let doc: JsonSchemaDoc = serde_json::from_str(content)?;

    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string();
    let mut table = TableSpec::new(name);

    for field in doc.fields {
        if table.column(&field.name).is_some() {
            continue;
        }
        table.columns.push(ColumnSpec::new(
            field.name,
            field.declared_type.unwrap_or_else(|| "string".to_string()),
        ));
    }

    if let Some(pk) = doc.primary_key {
        match table.columns.iter_mut().find(|column| column.name == pk) {
            Some(column) => {
                column.is_primary_key = true;
                table.primary_key = Some(pk);
            }
            None => warnings.push(ParseWarning::MalformedConstraint {
                table: table.name.clone(),
                constraint: "primary key".to_string(),
                column: pk,
            }),
        }
    }

    Ok(table)
}
