use serde::{Deserialize, Serialize};

use tablesmith_core::SemanticType;

/// Scalar value generated for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Runtime semantic type; `None` for null.
    pub fn semantic_type(&self) -> Option<SemanticType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(SemanticType::Bool),
            Value::Int(_) => Some(SemanticType::Int),
            Value::Float(_) => Some(SemanticType::Float),
            Value::Text(_) => Some(SemanticType::Text),
        }
    }

    /// Stable string form used for uniqueness and membership bookkeeping.
    pub fn key(&self) -> String {
        match self {
            Value::Null => "<null>".to_string(),
            Value::Bool(value) => value.to_string(),
            Value::Int(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::Text(value) => value.clone(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}
