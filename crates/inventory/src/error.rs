//! Store-level error model.

use thiserror::Error;

use equiptrack_core::DomainError;

use crate::storage::StorageError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store command.
///
/// Validation and missing references are *not* errors here: those commands
/// are silent no-ops. What reaches the caller is storage trouble.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the durable slot failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The persisted collection could not be parsed.
    #[error("persisted inventory under key `{key}` is malformed: {reason}")]
    CorruptSnapshot { key: String, reason: String },

    /// The collection could not be serialized.
    #[error("failed to encode inventory snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StoreError {
    pub fn is_storage(&self) -> bool {
        matches!(self, StoreError::Storage(_))
    }
}
