//! In-memory [`MappingRepository`], used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use process_mapping_sdk::{
    ApiProcessMapping, ListQuery, MappingFilter, MappingId, Page, TenantScope,
};

use crate::domain::error::DomainError;
use crate::domain::repo::MappingRepository;

#[derive(Default)]
pub struct InMemoryMappingRepository {
    rows: RwLock<HashMap<MappingId, ApiProcessMapping>>,
}

impl InMemoryMappingRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mappings(mappings: impl IntoIterator<Item = ApiProcessMapping>) -> Self {
        let rows = mappings.into_iter().map(|m| (m.id, m)).collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    fn check_version(
        rows: &HashMap<MappingId, ApiProcessMapping>,
        id: MappingId,
        expected_version: i32,
    ) -> Result<(), DomainError> {
        match rows.get(&id) {
            None => Err(DomainError::not_found(id)),
            Some(stored) if stored.version != expected_version => {
                Err(DomainError::version_conflict(id, expected_version))
            }
            Some(_) => Ok(()),
        }
    }
}

fn matches_filter(mapping: &ApiProcessMapping, filter: &MappingFilter) -> bool {
    let tenant_ok = match filter.tenant {
        None => true,
        Some(TenantScope::Vanilla) => mapping.tenant_id.is_none(),
        Some(TenantScope::Tenant(tenant_id)) => mapping.tenant_id == Some(tenant_id),
    };
    tenant_ok
        && filter
            .operation_id
            .as_ref()
            .is_none_or(|op| &mapping.operation_id == op)
        && filter
            .process_id
            .as_ref()
            .is_none_or(|p| &mapping.process_id == p)
        && filter.is_active.is_none_or(|a| mapping.is_active == a)
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn find_by_id(&self, id: MappingId) -> Result<Option<ApiProcessMapping>, DomainError> {
        Ok(self.rows.read().get(&id).cloned())
    }

    async fn find_active_by_operation(
        &self,
        operation_id: &str,
    ) -> Result<Vec<ApiProcessMapping>, DomainError> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|m| m.is_active && m.operation_id == operation_id)
            .cloned()
            .collect())
    }

    async fn list_page(&self, query: &ListQuery) -> Result<Page<ApiProcessMapping>, DomainError> {
        let mut matching: Vec<ApiProcessMapping> = self
            .rows
            .read()
            .values()
            .filter(|m| matches_filter(m, &query.filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.operation_id
                .cmp(&b.operation_id)
                .then_with(|| a.priority.cmp(&b.priority))
                .then_with(|| a.id.cmp(&b.id))
        });

        let total_count = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let page_size = usize::try_from(query.page_size).unwrap_or(usize::MAX);
        let offset = usize::try_from(query.page)
            .ok()
            .and_then(|page| page.checked_mul(page_size))
            .unwrap_or(usize::MAX);

        Ok(Page {
            items: matching.into_iter().skip(offset).take(page_size).collect(),
            total_count,
            page: query.page,
            page_size: query.page_size,
        })
    }

    async fn insert(&self, mapping: ApiProcessMapping) -> Result<ApiProcessMapping, DomainError> {
        let mut rows = self.rows.write();
        if rows.contains_key(&mapping.id) {
            return Err(DomainError::Storage(anyhow::anyhow!(
                "mapping {} already exists",
                mapping.id
            )));
        }
        rows.insert(mapping.id, mapping.clone());
        Ok(mapping)
    }

    async fn update(
        &self,
        mapping: ApiProcessMapping,
        expected_version: i32,
    ) -> Result<ApiProcessMapping, DomainError> {
        let mut rows = self.rows.write();
        Self::check_version(&rows, mapping.id, expected_version)?;
        rows.insert(mapping.id, mapping.clone());
        Ok(mapping)
    }

    async fn delete(&self, id: MappingId, expected_version: i32) -> Result<(), DomainError> {
        let mut rows = self.rows.write();
        Self::check_version(&rows, id, expected_version)?;
        rows.remove(&id);
        Ok(())
    }
}
