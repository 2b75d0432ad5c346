use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Rows synthesized per table when the schema does not say otherwise.
///
/// Callers override this at generation time; the normalizer never does.
pub const DEFAULT_ROW_COUNT: u64 = 10;

/// Format the schema was normalized from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SchemaSource {
    Sql,
    Json,
}

/// Format-agnostic schema snapshot produced from a `.sql` or `.json` file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct NormalizedSchema {
    /// Contract version for this schema format.
    pub schema_version: String,
    /// Input format the schema was derived from.
    pub source: SchemaSource,
    /// Tables in declaration order.
    pub tables: Vec<TableSpec>,
}

impl NormalizedSchema {
    pub fn new(source: SchemaSource, tables: Vec<TableSpec>) -> Self {
        Self {
            schema_version: crate::SCHEMA_VERSION.to_string(),
            source,
            tables,
        }
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|table| table.name == name)
    }
}

/// One table of the normalized schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct TableSpec {
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnSpec>,
    /// Single-column primary key, when declared.
    pub primary_key: Option<String>,
    pub foreign_keys: Vec<ForeignKeyRef>,
    /// Target number of rows to synthesize.
    pub row_count: u64,
}

impl TableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            row_count: DEFAULT_ROW_COUNT,
        }
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// True when any column carries a foreign-key reference.
    pub fn has_foreign_keys(&self) -> bool {
        !self.foreign_keys.is_empty()
    }
}

/// Column metadata within a table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ColumnSpec {
    pub name: String,
    /// Raw type token from the source schema (e.g. `varchar(50)`, `int`).
    pub declared_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKeyTarget>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            is_primary_key: false,
            foreign_key: None,
        }
    }

    /// Semantic type derived from the declared type token.
    pub fn semantic_type(&self) -> SemanticType {
        SemanticType::from_declared(&self.declared_type)
    }
}

/// Table-level foreign-key declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ForeignKeyRef {
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
}

/// Column-level view of a foreign-key target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ForeignKeyTarget {
    pub table: String,
    pub column: String,
}

/// Semantic value types the synthesizer and checker operate on.
///
/// Raw SQL type tokens collapse onto this enumeration; anything unknown is
/// treated as text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Int,
    Float,
    Bool,
    Text,
}

impl SemanticType {
    /// Collapse a declared type token onto a semantic type.
    ///
    /// `int*` maps to `Int`, `float*`/`double*`/`numeric*`/`decimal*` to
    /// `Float`, `bool*` to `Bool`, and everything else (including
    /// `varchar(...)` and `string`) to `Text`.
    pub fn from_declared(declared: &str) -> Self {
        let declared = declared.trim().to_ascii_lowercase();
        if declared.starts_with("int") || declared.starts_with("bigint")
            || declared.starts_with("smallint")
        {
            SemanticType::Int
        } else if declared.starts_with("float")
            || declared.starts_with("double")
            || declared.starts_with("numeric")
            || declared.starts_with("decimal")
            || declared == "real"
        {
            SemanticType::Float
        } else if declared.starts_with("bool") {
            SemanticType::Bool
        } else {
            SemanticType::Text
        }
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SemanticType::Int => "int",
            SemanticType::Float => "float",
            SemanticType::Bool => "bool",
            SemanticType::Text => "text",
        };
        f.write_str(name)
    }
}
