use async_trait::async_trait;
use process_mapping_sdk::{ApiProcessMapping, ListQuery, MappingId, Page};

use super::error::DomainError;

#[async_trait]
pub trait MappingRepository: Send + Sync {
    async fn find_by_id(&self, id: MappingId) -> Result<Option<ApiProcessMapping>, DomainError>;

    /// Active mappings for the operation, in no particular order. The
    /// effective window is not applied here.
    async fn find_active_by_operation(
        &self,
        operation_id: &str,
    ) -> Result<Vec<ApiProcessMapping>, DomainError>;

    async fn list_page(&self, query: &ListQuery) -> Result<Page<ApiProcessMapping>, DomainError>;

    async fn insert(&self, mapping: ApiProcessMapping) -> Result<ApiProcessMapping, DomainError>;

    /// Stores `mapping` only if the stored version equals `expected_version`.
    /// Fails with `NotFound` or `VersionConflict` otherwise.
    async fn update(
        &self,
        mapping: ApiProcessMapping,
        expected_version: i32,
    ) -> Result<ApiProcessMapping, DomainError>;

    async fn delete(&self, id: MappingId, expected_version: i32) -> Result<(), DomainError>;
}
