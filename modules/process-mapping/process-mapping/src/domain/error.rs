use process_mapping_sdk::ProcessMappingError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Mapping not found: {id}")]
    NotFound { id: Uuid },

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Version conflict on mapping {id}: expected version {expected}")]
    VersionConflict { id: Uuid, expected: i32 },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    #[must_use]
    pub fn version_conflict(id: Uuid, expected: i32) -> Self {
        Self::VersionConflict { id, expected }
    }
}

impl From<DomainError> for ProcessMappingError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { id } => Self::not_found(id),
            DomainError::Validation { field, message } => {
                Self::validation(format!("{field}: {message}"))
            }
            DomainError::VersionConflict { id, expected } => Self::VersionConflict { id, expected },
            DomainError::Storage(err) => Self::storage(format!("{err:#}")),
        }
    }
}
