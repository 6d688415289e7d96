//! Local client implementing the `ProcessMappingApi` trait.

use std::sync::Arc;

use async_trait::async_trait;
use process_mapping_sdk::{
    ApiProcessMapping, ListQuery, MappingDraft, MappingId, Page, ProcessMappingApi,
    ProcessMappingError, Resolution, ResolveRequest, TenantId,
};

use crate::domain::service::Service;

/// In-process client that delegates to the domain service.
pub struct LocalClient {
    service: Arc<Service>,
}

impl LocalClient {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ProcessMappingApi for LocalClient {
    async fn resolve(&self, request: &ResolveRequest) -> Result<Resolution, ProcessMappingError> {
        self.service.resolve(request).await.map_err(Into::into)
    }

    async fn invalidate(&self, tenant_id: Option<TenantId>) {
        self.service.invalidate(tenant_id);
    }

    async fn get_mapping(&self, id: MappingId) -> Result<ApiProcessMapping, ProcessMappingError> {
        self.service.get_mapping(id).await.map_err(Into::into)
    }

    async fn list_mappings(
        &self,
        query: &ListQuery,
    ) -> Result<Page<ApiProcessMapping>, ProcessMappingError> {
        self.service.list_mappings(query).await.map_err(Into::into)
    }

    async fn create_mapping(
        &self,
        actor: &str,
        draft: MappingDraft,
    ) -> Result<ApiProcessMapping, ProcessMappingError> {
        self.service
            .create_mapping(actor, draft)
            .await
            .map_err(Into::into)
    }

    async fn update_mapping(
        &self,
        actor: &str,
        id: MappingId,
        expected_version: i32,
        draft: MappingDraft,
    ) -> Result<ApiProcessMapping, ProcessMappingError> {
        self.service
            .update_mapping(actor, id, expected_version, draft)
            .await
            .map_err(Into::into)
    }

    async fn delete_mapping(
        &self,
        id: MappingId,
        expected_version: i32,
    ) -> Result<(), ProcessMappingError> {
        self.service
            .delete_mapping(id, expected_version)
            .await
            .map_err(Into::into)
    }
}
