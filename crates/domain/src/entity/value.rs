//! Rendered entity values.

use std::fmt;

use serde::Serialize;

use crate::datapoint::DatapointValue;

/// The value an entity shows to the host after coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

/// Raw passthrough of a cell value.
impl From<DatapointValue> for EntityValue {
    fn from(value: DatapointValue) -> Self {
        match value {
            DatapointValue::Raw(bytes) => Self::Bytes(bytes),
            DatapointValue::Bool(flag) => Self::Bool(flag),
            DatapointValue::Value(number) => Self::Int(i64::from(number)),
            DatapointValue::Enum(number) | DatapointValue::Bitmap(number) => {
                Self::Int(i64::from(number))
            }
            DatapointValue::String(text) => Self::Text(text),
        }
    }
}

impl fmt::Display for EntityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => value.fmt(f),
            Self::Int(value) => value.fmt(f),
            Self::Float(value) => value.fmt(f),
            Self::Text(value) => f.write_str(value),
            Self::Bytes(value) => {
                for byte in value {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}
