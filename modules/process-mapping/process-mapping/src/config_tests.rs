//! Tests for configuration parsing.

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::config::ProcessMappingConfig;
    use std::time::Duration;
    use time::macros::datetime;

    #[test]
    fn test_config_default() {
        let config = ProcessMappingConfig::default();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(config.cache.max_entries, 10_000);
        assert!(config.database.is_none());
        assert!(config.mappings.is_empty());
        assert_eq!(config.max_field_length, 255);
        assert_eq!(config.max_page_size, 200);
    }

    #[test]
    fn test_config_parse_cache_ttl_from_string() {
        let yaml = r#"
cache:
  enabled: false
  ttl: "5m"
  max_entries: 1000
"#;
        let config: ProcessMappingConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
        assert_eq!(config.cache.max_entries, 1000);
    }

    #[test]
    fn test_config_parse_database_defaults_to_migrations() {
        let yaml = r#"
database:
  dsn: "sqlite::memory:"
"#;
        let config: ProcessMappingConfig = serde_saphyr::from_str(yaml).unwrap();
        let db = config.database.unwrap();
        assert_eq!(db.dsn, "sqlite::memory:");
        assert!(db.run_migrations);
    }

    #[test]
    fn test_config_parse_seed_mappings() {
        let yaml = r#"
mappings:
  - operation_id: "payments.transfer"
    process_id: "default-transfer"
  - tenant_id: "6f1c8f4e-2b43-4c55-9a55-3d8f7b1f0a11"
    channel_type: "MOBILE"
    operation_id: "payments.transfer"
    process_id: "mobile-transfer"
    priority: 10
    effective_from: "2026-01-01T00:00:00Z"
"#;
        let config: ProcessMappingConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.mappings.len(), 2);

        let vanilla = &config.mappings[0];
        assert!(vanilla.tenant_id.is_none());
        assert_eq!(vanilla.priority, 100); // default
        assert!(vanilla.is_active); // default

        let scoped = config.mappings[1].to_draft();
        assert!(scoped.tenant_id.is_some());
        assert_eq!(scoped.channel_type.as_deref(), Some("MOBILE"));
        assert_eq!(scoped.priority, 10);
        assert_eq!(scoped.effective_from, Some(datetime!(2026-01-01 00:00:00 UTC)));
        assert_eq!(scoped.effective_to, None);
    }

    #[test]
    fn test_config_reject_unknown_fields() {
        let yaml = r#"
cache:
  ttl: "10s"
  unknown_field: "should fail"
"#;
        let result: Result<ProcessMappingConfig, _> = serde_saphyr::from_str(yaml);
        assert!(
            result.is_err(),
            "Config should reject unknown fields due to deny_unknown_fields"
        );
    }

    #[test]
    fn test_config_seed_requires_process_id() {
        let yaml = r#"
mappings:
  - operation_id: "payments.transfer"
"#;
        let result: Result<ProcessMappingConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
