#[cfg(test)]
mod tests {
    use super::super::mapper::{to_active_model, to_update_model};
    use super::super::*;
    use process_mapping_sdk::ApiProcessMapping;
    use sea_orm::ActiveValue;
    use time::macros::datetime;
    use uuid::Uuid;

    fn model() -> entity::Model {
        entity::Model {
            id: Uuid::new_v4(),
            tenant_id: Some(Uuid::new_v4()),
            product_id: Some("CARD".to_owned()),
            channel_type: Some("WEB".to_owned()),
            operation_id: "payments.create".to_owned(),
            api_path: Some("/v1/payments".to_owned()),
            http_method: Some("POST".to_owned()),
            process_id: "card-payment".to_owned(),
            process_version: Some("3".to_owned()),
            priority: 10,
            effective_from: Some(datetime!(2026-01-01 00:00 UTC)),
            effective_to: None,
            is_active: true,
            created_by: Some("alice".to_owned()),
            updated_by: Some("bob".to_owned()),
            created_at: datetime!(2025-12-01 08:30 UTC),
            updated_at: datetime!(2025-12-02 09:00 UTC),
            version: 4,
        }
    }

    #[test]
    fn test_entity_to_mapping_conversion() {
        let entity = model();
        let mapping: ApiProcessMapping = entity.clone().into();

        assert_eq!(mapping.id, entity.id);
        assert_eq!(mapping.tenant_id, entity.tenant_id);
        assert_eq!(mapping.channel(), Some("WEB"));
        assert_eq!(mapping.process_id, "card-payment");
        assert_eq!(mapping.effective_from, Some(datetime!(2026-01-01 00:00 UTC)));
        assert_eq!(mapping.effective_to, None);
        assert_eq!(mapping.updated_by.as_deref(), Some("bob"));
        assert_eq!(mapping.version, 4);
    }

    #[test]
    fn test_update_model_leaves_primary_key_unset() {
        let mapping: ApiProcessMapping = model().into();

        let update = to_update_model(&mapping);
        assert_eq!(update.id, ActiveValue::NotSet);
        assert_eq!(update.version, ActiveValue::Set(4));

        let insert = to_active_model(&mapping);
        assert_eq!(insert.id, ActiveValue::Set(mapping.id));
        assert_eq!(insert.operation_id, ActiveValue::Set(mapping.operation_id));
    }
}
