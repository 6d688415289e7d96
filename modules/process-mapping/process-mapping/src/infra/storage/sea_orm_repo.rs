use async_trait::async_trait;
use process_mapping_sdk::{
    ApiProcessMapping, ListQuery, MappingFilter, MappingId, Page, TenantScope,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::domain::error::DomainError;
use crate::domain::repo::MappingRepository;

use super::entity::{Column, Entity as MappingEntity};
use super::mapper::{to_active_model, to_update_model};

fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(anyhow::Error::new(e).context("process mapping storage"))
}

fn filter_condition(filter: &MappingFilter) -> Condition {
    let mut cond = Condition::all();
    match filter.tenant {
        Some(TenantScope::Vanilla) => cond = cond.add(Column::TenantId.is_null()),
        Some(TenantScope::Tenant(tenant_id)) => cond = cond.add(Column::TenantId.eq(tenant_id)),
        None => {}
    }
    if let Some(operation_id) = &filter.operation_id {
        cond = cond.add(Column::OperationId.eq(operation_id.as_str()));
    }
    if let Some(process_id) = &filter.process_id {
        cond = cond.add(Column::ProcessId.eq(process_id.as_str()));
    }
    if let Some(is_active) = filter.is_active {
        cond = cond.add(Column::IsActive.eq(is_active));
    }
    cond
}

/// SeaORM-backed implementation of [`MappingRepository`].
pub struct SeaOrmMappingRepository {
    db: DatabaseConnection,
}

impl SeaOrmMappingRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Explains a conditional write that touched no rows.
    async fn missed_write(&self, id: MappingId, expected_version: i32) -> DomainError {
        match self.find_by_id(id).await {
            Ok(Some(_)) => DomainError::version_conflict(id, expected_version),
            Ok(None) => DomainError::not_found(id),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl MappingRepository for SeaOrmMappingRepository {
    async fn find_by_id(&self, id: MappingId) -> Result<Option<ApiProcessMapping>, DomainError> {
        let found = MappingEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_active_by_operation(
        &self,
        operation_id: &str,
    ) -> Result<Vec<ApiProcessMapping>, DomainError> {
        let rows = MappingEntity::find()
            .filter(Column::OperationId.eq(operation_id))
            .filter(Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_page(&self, query: &ListQuery) -> Result<Page<ApiProcessMapping>, DomainError> {
        let paginator = MappingEntity::find()
            .filter(filter_condition(&query.filter))
            .order_by_asc(Column::OperationId)
            .order_by_asc(Column::Priority)
            .order_by_asc(Column::Id)
            .paginate(&self.db, query.page_size);

        let total_count = paginator.num_items().await.map_err(db_err)?;
        let rows = paginator.fetch_page(query.page).await.map_err(db_err)?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total_count,
            page: query.page,
            page_size: query.page_size,
        })
    }

    async fn insert(&self, mapping: ApiProcessMapping) -> Result<ApiProcessMapping, DomainError> {
        let model = to_active_model(&mapping)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.into())
    }

    async fn update(
        &self,
        mapping: ApiProcessMapping,
        expected_version: i32,
    ) -> Result<ApiProcessMapping, DomainError> {
        let result = MappingEntity::update_many()
            .set(to_update_model(&mapping))
            .filter(Column::Id.eq(mapping.id))
            .filter(Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(self.missed_write(mapping.id, expected_version).await);
        }
        Ok(mapping)
    }

    async fn delete(&self, id: MappingId, expected_version: i32) -> Result<(), DomainError> {
        let result = MappingEntity::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(self.missed_write(id, expected_version).await);
        }
        Ok(())
    }
}
