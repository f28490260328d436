use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Serialize, Deserialize)]
pub enum PatchError {
    #[error("malformed document: {0}")]
    StructuralMismatch(String),

    #[error("unsupported mutation: {0}")]
    UnsupportedMutation(String),

    #[error("unsupported entity: {0}")]
    UnsupportedEntity(String),

    #[error("actions not applied: {0}")]
    NotApplied(String),

    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PatchError {
    fn from(err: std::io::Error) -> Self {
        PatchError::Io(err.to_string())
    }
}

impl From<tempfile::PersistError> for PatchError {
    fn from(err: tempfile::PersistError) -> Self {
        PatchError::Io(err.to_string())
    }
}
