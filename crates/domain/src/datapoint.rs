//! Datapoints — small typed values a device exposes under an integer id.
//!
//! A [`Datapoint`] is a snapshot of one cell held by the device transport.
//! Once a cell exists with a given [`DatapointType`], every write to it is
//! coerced into that type with [`DatapointValue::coerce`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoercionError;
use crate::time::{Timestamp, now};

/// Vendor datapoint identifier (`1..=255` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatapointId(u8);

impl DatapointId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for DatapointId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl fmt::Display for DatapointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Declared type of a datapoint cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatapointType {
    Raw,
    Bool,
    Value,
    String,
    Enum,
    Bitmap,
}

impl fmt::Display for DatapointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raw => "raw",
            Self::Bool => "bool",
            Self::Value => "value",
            Self::String => "string",
            Self::Enum => "enum",
            Self::Bitmap => "bitmap",
        })
    }
}

/// A typed datapoint value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DatapointValue {
    Raw(Vec<u8>),
    Bool(bool),
    Value(i32),
    String(String),
    Enum(u32),
    Bitmap(u32),
}

impl DatapointValue {
    /// The type this value carries.
    #[must_use]
    pub fn kind(&self) -> DatapointType {
        match self {
            Self::Raw(_) => DatapointType::Raw,
            Self::Bool(_) => DatapointType::Bool,
            Self::Value(_) => DatapointType::Value,
            Self::String(_) => DatapointType::String,
            Self::Enum(_) => DatapointType::Enum,
            Self::Bitmap(_) => DatapointType::Bitmap,
        }
    }

    /// Zero value used when a cell is created without an explicit default.
    #[must_use]
    pub fn default_for(kind: DatapointType) -> Self {
        match kind {
            DatapointType::Raw => Self::Raw(Vec::new()),
            DatapointType::Bool => Self::Bool(false),
            DatapointType::Value => Self::Value(0),
            DatapointType::String => Self::String(String::new()),
            DatapointType::Enum => Self::Enum(0),
            DatapointType::Bitmap => Self::Bitmap(0),
        }
    }

    /// Truthiness of the value: non-zero numbers and non-empty payloads are `true`.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Value(value) => *value != 0,
            Self::Enum(value) | Self::Bitmap(value) => *value != 0,
            Self::String(value) => !value.is_empty(),
            Self::Raw(value) => !value.is_empty(),
        }
    }

    /// Integer view of numeric and boolean values.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Bool(value) => Some(i64::from(*value)),
            Self::Value(value) => Some(i64::from(*value)),
            Self::Enum(value) | Self::Bitmap(value) => Some(i64::from(*value)),
            Self::String(_) | Self::Raw(_) => None,
        }
    }

    /// Float view of numeric and boolean values.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(value) => Some(f64::from(u8::from(*value))),
            Self::Value(value) => Some(f64::from(*value)),
            Self::Enum(value) | Self::Bitmap(value) => Some(f64::from(*value)),
            Self::String(_) | Self::Raw(_) => None,
        }
    }

    /// Convert this value into one that fits a cell of type `to`.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError::Incompatible`] when the two types have no
    /// sensible conversion, and [`CoercionError::OutOfRange`] when a number
    /// does not fit the target integer width.
    pub fn coerce(self, to: DatapointType) -> Result<Self, CoercionError> {
        let from = self.kind();
        if from == to {
            return Ok(self);
        }

        match (to, self) {
            (DatapointType::Bool, value @ (Self::Value(_) | Self::Enum(_) | Self::Bitmap(_))) => {
                Ok(Self::Bool(value.is_truthy()))
            }
            (DatapointType::Value, Self::Bool(value)) => Ok(Self::Value(i32::from(value))),
            (DatapointType::Value, Self::Enum(value) | Self::Bitmap(value)) => i32::try_from(value)
                .map(Self::Value)
                .map_err(|_| CoercionError::OutOfRange {
                    value: i64::from(value),
                    to,
                }),
            (DatapointType::Enum | DatapointType::Bitmap, value) => {
                let number = match value {
                    Self::Bool(flag) => u32::from(flag),
                    Self::Value(number) => {
                        u32::try_from(number).map_err(|_| CoercionError::OutOfRange {
                            value: i64::from(number),
                            to,
                        })?
                    }
                    Self::Enum(number) | Self::Bitmap(number) => number,
                    Self::String(_) | Self::Raw(_) => {
                        return Err(CoercionError::Incompatible { from, to });
                    }
                };
                Ok(if to == DatapointType::Enum {
                    Self::Enum(number)
                } else {
                    Self::Bitmap(number)
                })
            }
            (DatapointType::String, Self::Raw(bytes)) => String::from_utf8(bytes)
                .map(Self::String)
                .map_err(|_| CoercionError::Incompatible { from, to }),
            (DatapointType::Raw, Self::String(text)) => Ok(Self::Raw(text.into_bytes())),
            _ => Err(CoercionError::Incompatible { from, to }),
        }
    }
}

/// Snapshot of one datapoint cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub id: DatapointId,
    pub value: DatapointValue,
    /// `true` when the last change was reported by the device itself rather
    /// than echoed back from a local write.
    pub changed_by_device: bool,
    pub timestamp: Timestamp,
}

impl Datapoint {
    /// Create a cell snapshot stamped with the current time.
    #[must_use]
    pub fn new(id: DatapointId, value: DatapointValue, changed_by_device: bool) -> Self {
        Self {
            id,
            value,
            changed_by_device,
            timestamp: now(),
        }
    }

    /// Declared type of the cell.
    #[must_use]
    pub fn kind(&self) -> DatapointType {
        self.value.kind()
    }
}
