//! Error types for command handlers.

use crate::store::StoreError;

/// Error type for command handler operations.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// No handler registered for this command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// Params decode / deserialization failed.
    #[error("decode failed: {0}")]
    DecodeFailed(String),
    /// Params are well-formed but missing something the command requires.
    /// Also what `before` hooks return to reject a command.
    #[error("{0}")]
    Validation(String),
    /// Store error (missing record, exhausted ids, poisoned lock).
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl HandlerError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::Validation(_) => 422,
            HandlerError::Store(StoreError::NotFound(_)) => 404,
            HandlerError::Store(StoreError::IdsExhausted) => 507,
            HandlerError::Store(StoreError::Poisoned) => 500,
        }
    }
}
