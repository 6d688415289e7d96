use process_mapping_sdk::ApiProcessMapping;
use sea_orm::ActiveValue::{NotSet, Set};

use super::entity;

impl From<entity::Model> for ApiProcessMapping {
    fn from(entity: entity::Model) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            product_id: entity.product_id,
            channel_type: entity.channel_type,
            operation_id: entity.operation_id,
            api_path: entity.api_path,
            http_method: entity.http_method,
            process_id: entity.process_id,
            process_version: entity.process_version,
            priority: entity.priority,
            effective_from: entity.effective_from,
            effective_to: entity.effective_to,
            is_active: entity.is_active,
            created_by: entity.created_by,
            updated_by: entity.updated_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            version: entity.version,
        }
    }
}

/// Active model with every column set, for inserts.
pub fn to_active_model(mapping: &ApiProcessMapping) -> entity::ActiveModel {
    entity::ActiveModel {
        id: Set(mapping.id),
        ..to_update_model(mapping)
    }
}

/// Active model with every column but the primary key set, for conditional
/// bulk updates.
pub fn to_update_model(mapping: &ApiProcessMapping) -> entity::ActiveModel {
    entity::ActiveModel {
        id: NotSet,
        tenant_id: Set(mapping.tenant_id),
        product_id: Set(mapping.product_id.clone()),
        channel_type: Set(mapping.channel_type.clone()),
        operation_id: Set(mapping.operation_id.clone()),
        api_path: Set(mapping.api_path.clone()),
        http_method: Set(mapping.http_method.clone()),
        process_id: Set(mapping.process_id.clone()),
        process_version: Set(mapping.process_version.clone()),
        priority: Set(mapping.priority),
        effective_from: Set(mapping.effective_from),
        effective_to: Set(mapping.effective_to),
        is_active: Set(mapping.is_active),
        created_by: Set(mapping.created_by.clone()),
        updated_by: Set(mapping.updated_by.clone()),
        created_at: Set(mapping.created_at),
        updated_at: Set(mapping.updated_at),
        version: Set(mapping.version),
    }
}
