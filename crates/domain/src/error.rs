//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.

use crate::catalog::MappingScope;
use crate::datapoint::{DatapointId, DatapointType};
use crate::entity::EntityKind;

/// Invalid input when building a domain object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("invalid bluetooth address {0:?}")]
    InvalidAddress(String),
}

/// A static mapping table that breaks one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("{kind} mapping {category}/{scope} declares datapoint {dp_id} more than once")]
    DuplicateDatapoint {
        kind: EntityKind,
        category: &'static str,
        scope: MappingScope,
        dp_id: DatapointId,
    },

    #[error("{kind} {key} in {category}/{scope} declares no options")]
    MissingOptions {
        kind: EntityKind,
        category: &'static str,
        scope: MappingScope,
        key: &'static str,
    },
}

/// A datapoint value that cannot be stored in a cell of another type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoercionError {
    #[error("cannot coerce {from} value into {to}")]
    Incompatible {
        from: DatapointType,
        to: DatapointType,
    },

    #[error("value {value} is out of range for {to}")]
    OutOfRange { value: i64, to: DatapointType },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_duplicate_datapoint_with_scope() {
        let err = CatalogError::DuplicateDatapoint {
            kind: EntityKind::Sensor,
            category: "sfkzq",
            scope: MappingScope::Product("hfgdqhho"),
            dp_id: DatapointId::new(11),
        };
        assert_eq!(
            err.to_string(),
            "sensor mapping sfkzq/hfgdqhho declares datapoint 11 more than once"
        );
    }

    #[test]
    fn should_display_missing_options_for_category_default() {
        let err = CatalogError::MissingOptions {
            kind: EntityKind::Select,
            category: "dd",
            scope: MappingScope::Default,
            key: "mode",
        };
        assert_eq!(err.to_string(), "select mode in dd/* declares no options");
    }

    #[test]
    fn should_display_coercion_errors() {
        let err = CoercionError::Incompatible {
            from: DatapointType::String,
            to: DatapointType::Bool,
        };
        assert_eq!(err.to_string(), "cannot coerce string value into bool");

        let err = CoercionError::OutOfRange {
            value: -1,
            to: DatapointType::Enum,
        };
        assert_eq!(err.to_string(), "value -1 is out of range for enum");
    }
}
