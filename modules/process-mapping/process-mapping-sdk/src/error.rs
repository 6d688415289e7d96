//! Error types for the process-mapping SDK.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when using the process-mapping API.
///
/// A resolve call that finds no mapping is not an error; see
/// [`Resolution::NotFound`](crate::Resolution::NotFound).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessMappingError {
    /// The request violates the caller contract.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The addressed mapping does not exist.
    #[error("mapping not found: {id}")]
    NotFound { id: Uuid },

    /// The mapping was modified since the caller read it.
    #[error("version conflict on mapping {id}: expected version {expected}")]
    VersionConflict { id: Uuid, expected: i32 },

    /// The storage collaborator failed.
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl ProcessMappingError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
