//! `ProcessMappingApi` trait definition.

use async_trait::async_trait;

use crate::error::ProcessMappingError;
use crate::models::{
    ApiProcessMapping, ListQuery, MappingDraft, MappingId, Page, Resolution, ResolveRequest,
    TenantId,
};

/// Public API trait for the process-mapping module.
///
/// ```ignore
/// let client = module.client();
/// match client.resolve(&ResolveRequest::new("pay").with_tenant(tenant)).await? {
///     Resolution::Found(mapping) => dispatch(&mapping.process_id),
///     Resolution::NotFound => reject(),
/// }
/// ```
#[async_trait]
pub trait ProcessMappingApi: Send + Sync {
    /// Pick the single mapping that should handle the operation in the given
    /// context. Returns `Resolution::NotFound` when nothing is eligible.
    async fn resolve(&self, request: &ResolveRequest) -> Result<Resolution, ProcessMappingError>;

    /// Drop cached resolutions for one tenant, or all of them for `None`.
    async fn invalidate(&self, tenant_id: Option<TenantId>);

    async fn get_mapping(&self, id: MappingId) -> Result<ApiProcessMapping, ProcessMappingError>;

    async fn list_mappings(
        &self,
        query: &ListQuery,
    ) -> Result<Page<ApiProcessMapping>, ProcessMappingError>;

    /// Create a mapping. `actor` is recorded in the audit fields.
    async fn create_mapping(
        &self,
        actor: &str,
        draft: MappingDraft,
    ) -> Result<ApiProcessMapping, ProcessMappingError>;

    /// Replace the writable fields of a mapping if its version still equals
    /// `expected_version`.
    async fn update_mapping(
        &self,
        actor: &str,
        id: MappingId,
        expected_version: i32,
        draft: MappingDraft,
    ) -> Result<ApiProcessMapping, ProcessMappingError>;

    async fn delete_mapping(
        &self,
        id: MappingId,
        expected_version: i32,
    ) -> Result<(), ProcessMappingError>;
}
