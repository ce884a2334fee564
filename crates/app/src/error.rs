//! Application error types.

use tuyable_domain::error::CoercionError;

/// Errors an entity adapter reports to its caller.
///
/// Transport failures are not among them: writes run in the background and
/// only log their failures.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("{option:?} is not an option of {key}")]
    UnknownOption { key: &'static str, option: String },

    #[error("value rejected before writing")]
    Coercion(#[from] CoercionError),
}
