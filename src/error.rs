use std::sync::Arc;

use thiserror::Error;

/// Result type of fallible `muton` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by `muton`.
///
/// Invalid instructions are not errors; see [`ValidationError`](crate::instruction::ValidationError).
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A caller passed an argument of the wrong shape, e.g. a bucket list that is not an array.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// An instruction set is not valid JSON or does not have the expected shape.
    #[error("error parsing instruction set")]
    // serde_json::Error is not clonable, so we're wrapping it in an Arc.
    InstructionSetParse(#[source] Arc<serde_json::Error>),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::InstructionSetParse(Arc::new(value))
    }
}
