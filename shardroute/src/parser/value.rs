//! Value extracted from a query.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use shardroute_config::FlexibleType;
use uuid::Uuid;

/// Literal or positional parameter (`?`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
    /// Zero-based position in the parameter list.
    Placeholder(usize),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "'{}'", s.replace("'", "''")),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(s) => write!(f, "{}", s),
            Self::Null => write!(f, "NULL"),
            Self::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Self::Placeholder(_) => write!(f, "?"),
        }
    }
}

impl Value {
    /// Parameter position, if this is a placeholder.
    pub fn placeholder(&self) -> Option<usize> {
        match self {
            Self::Placeholder(position) => Some(*position),
            _ => None,
        }
    }

    /// Value usable as a sharding key. Strings that look like integers
    /// or UUIDs are treated as such; floats, booleans and NULLs can't
    /// be sharded on.
    pub fn sharding_key(&self) -> Option<FlexibleType> {
        match self {
            Self::Integer(integer) => Some(FlexibleType::Integer(*integer)),
            Self::String(s) => {
                if let Ok(integer) = s.parse::<i64>() {
                    Some(FlexibleType::Integer(integer))
                } else if let Ok(uuid) = s.parse::<Uuid>() {
                    Some(FlexibleType::Uuid(uuid))
                } else {
                    Some(FlexibleType::String(s.clone()))
                }
            }
            Self::Float(_) | Self::Boolean(_) | Self::Null | Self::Placeholder(_) => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    Self::Integer(integer)
                } else {
                    Self::Float(number.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            other => Self::String(other.to_string()),
        }
    }
}
