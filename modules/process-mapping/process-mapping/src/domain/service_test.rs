#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::super::*;
    use crate::infra::cache::MokaResolutionCache;
    use crate::infra::storage::InMemoryMappingRepository;
    use async_trait::async_trait;
    use process_mapping_sdk::{
        ApiProcessMapping, ListQuery, MappingDraft, MappingId, Page, Resolution, ResolveRequest,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use time::OffsetDateTime;
    use uuid::Uuid;

    // Counts candidate lookups so tests can tell cache hits from misses.
    struct CountingRepository {
        inner: InMemoryMappingRepository,
        lookups: AtomicUsize,
    }

    impl CountingRepository {
        fn new() -> Self {
            Self {
                inner: InMemoryMappingRepository::new(),
                lookups: AtomicUsize::new(0),
            }
        }

        fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl repo::MappingRepository for CountingRepository {
        async fn find_by_id(
            &self,
            id: MappingId,
        ) -> Result<Option<ApiProcessMapping>, error::DomainError> {
            self.inner.find_by_id(id).await
        }

        async fn find_active_by_operation(
            &self,
            operation_id: &str,
        ) -> Result<Vec<ApiProcessMapping>, error::DomainError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_active_by_operation(operation_id).await
        }

        async fn list_page(
            &self,
            query: &ListQuery,
        ) -> Result<Page<ApiProcessMapping>, error::DomainError> {
            self.inner.list_page(query).await
        }

        async fn insert(
            &self,
            mapping: ApiProcessMapping,
        ) -> Result<ApiProcessMapping, error::DomainError> {
            self.inner.insert(mapping).await
        }

        async fn update(
            &self,
            mapping: ApiProcessMapping,
            expected_version: i32,
        ) -> Result<ApiProcessMapping, error::DomainError> {
            self.inner.update(mapping, expected_version).await
        }

        async fn delete(
            &self,
            id: MappingId,
            expected_version: i32,
        ) -> Result<(), error::DomainError> {
            self.inner.delete(id, expected_version).await
        }
    }

    fn setup() -> (service::Service, Arc<CountingRepository>) {
        let repo = Arc::new(CountingRepository::new());
        let cache = Arc::new(MokaResolutionCache::new(Duration::from_secs(60), 1_000));
        let svc = service::Service::new(repo.clone(), cache, service::ServiceConfig::default());
        (svc, repo)
    }

    fn process_of(resolution: &Resolution) -> Option<&str> {
        resolution.mapping().map(|m| m.process_id.as_str())
    }

    #[tokio::test]
    async fn test_resolve_worked_example() {
        let (svc, _) = setup();
        let t1 = Uuid::new_v4();
        let t2 = Uuid::new_v4();
        svc.create_mapping("admin", MappingDraft::new("pay", "default-pay"))
            .await
            .unwrap();
        svc.create_mapping(
            "admin",
            MappingDraft::new("pay", "t1-pay")
                .with_tenant(t1)
                .with_priority(50),
        )
        .await
        .unwrap();

        let r1 = svc
            .resolve(&ResolveRequest::new("pay").with_tenant(t1))
            .await
            .unwrap();
        let r2 = svc
            .resolve(&ResolveRequest::new("pay").with_tenant(t2))
            .await
            .unwrap();
        let r3 = svc
            .resolve(&ResolveRequest::new("refund").with_tenant(t1))
            .await
            .unwrap();

        assert_eq!(process_of(&r1), Some("t1-pay"));
        assert_eq!(process_of(&r2), Some("default-pay"));
        assert_eq!(r3, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_rejects_blank_operation() {
        let (svc, repo) = setup();

        let err = svc.resolve(&ResolveRequest::new("")).await.unwrap_err();
        assert!(matches!(err, error::DomainError::Validation { .. }));
        assert_eq!(repo.lookups(), 0);
    }

    #[tokio::test]
    async fn test_repeated_resolve_hits_cache() {
        let (svc, repo) = setup();
        svc.create_mapping("admin", MappingDraft::new("pay", "default-pay"))
            .await
            .unwrap();
        let request = ResolveRequest::new("pay").with_tenant(Uuid::new_v4());

        let first = svc.resolve(&request).await.unwrap();
        let second = svc.resolve(&request).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.lookups(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_cached_too() {
        let (svc, repo) = setup();
        let request = ResolveRequest::new("unknown");

        assert_eq!(svc.resolve(&request).await.unwrap(), Resolution::NotFound);
        assert_eq!(svc.resolve(&request).await.unwrap(), Resolution::NotFound);
        assert_eq!(repo.lookups(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_recompute() {
        let (svc, repo) = setup();
        let tenant = Uuid::new_v4();
        let request = ResolveRequest::new("pay").with_tenant(tenant);

        svc.resolve(&request).await.unwrap();
        svc.invalidate(Some(tenant));
        svc.resolve(&request).await.unwrap();

        assert_eq!(repo.lookups(), 2);
    }

    #[tokio::test]
    async fn test_create_invalidates_cached_resolution() {
        let (svc, _) = setup();
        let tenant = Uuid::new_v4();
        svc.create_mapping("admin", MappingDraft::new("pay", "default-pay"))
            .await
            .unwrap();
        let request = ResolveRequest::new("pay").with_tenant(tenant);
        assert_eq!(
            process_of(&svc.resolve(&request).await.unwrap()),
            Some("default-pay")
        );

        svc.create_mapping(
            "admin",
            MappingDraft::new("pay", "tenant-pay").with_tenant(tenant),
        )
        .await
        .unwrap();

        assert_eq!(
            process_of(&svc.resolve(&request).await.unwrap()),
            Some("tenant-pay")
        );
    }

    #[tokio::test]
    async fn test_vanilla_update_invalidates_all_tenants() {
        let (svc, _) = setup();
        let tenant = Uuid::new_v4();
        let vanilla = svc
            .create_mapping("admin", MappingDraft::new("pay", "old"))
            .await
            .unwrap();
        let request = ResolveRequest::new("pay").with_tenant(tenant);
        svc.resolve(&request).await.unwrap();

        svc.update_mapping("ops", vanilla.id, 1, MappingDraft::new("pay", "new"))
            .await
            .unwrap();

        assert_eq!(
            process_of(&svc.resolve(&request).await.unwrap()),
            Some("new")
        );
    }

    #[tokio::test]
    async fn test_update_bumps_version_and_keeps_creation_audit() {
        let (svc, _) = setup();
        let created = svc
            .create_mapping("alice", MappingDraft::new("pay", "v1"))
            .await
            .unwrap();

        let updated = svc
            .update_mapping("bob", created.id, 1, MappingDraft::new("pay", "v2"))
            .await
            .unwrap();

        assert_eq!(updated.version, 2);
        assert_eq!(updated.process_id, "v2");
        assert_eq!(updated.created_by.as_deref(), Some("alice"));
        assert_eq!(updated.updated_by.as_deref(), Some("bob"));
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_stale_update_is_rejected() {
        let (svc, _) = setup();
        let created = svc
            .create_mapping("admin", MappingDraft::new("pay", "v1"))
            .await
            .unwrap();
        svc.update_mapping("admin", created.id, 1, MappingDraft::new("pay", "v2"))
            .await
            .unwrap();

        let err = svc
            .update_mapping("admin", created.id, 1, MappingDraft::new("pay", "v3"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            error::DomainError::VersionConflict { expected: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (svc, _) = setup();
        let err = svc.delete_mapping(Uuid::new_v4(), 1).await.unwrap_err();
        assert!(matches!(err, error::DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_mapping_from_resolution() {
        let (svc, _) = setup();
        let created = svc
            .create_mapping("admin", MappingDraft::new("pay", "p"))
            .await
            .unwrap();
        let request = ResolveRequest::new("pay");
        assert!(svc.resolve(&request).await.unwrap().is_found());

        svc.delete_mapping(created.id, created.version).await.unwrap();

        assert_eq!(svc.resolve(&request).await.unwrap(), Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_draft_with_inverted_window_is_rejected() {
        let (svc, _) = setup();
        let now = OffsetDateTime::now_utc();
        let draft = MappingDraft::new("pay", "p").with_window(Some(now), Some(now));

        let err = svc.create_mapping("admin", draft).await.unwrap_err();
        assert!(matches!(
            err,
            error::DomainError::Validation { ref field, .. } if field == "effective_to"
        ));
    }

    #[tokio::test]
    async fn test_draft_with_oversized_field_is_rejected() {
        let (svc, _) = setup();
        let draft = MappingDraft::new("pay", "p").with_product("x".repeat(256));

        let err = svc.create_mapping("admin", draft).await.unwrap_err();
        assert!(matches!(
            err,
            error::DomainError::Validation { ref field, .. } if field == "product_id"
        ));
    }

    #[tokio::test]
    async fn test_empty_channel_is_stored_as_wildcard() {
        let (svc, _) = setup();
        let created = svc
            .create_mapping("admin", MappingDraft::new("pay", "p").with_channel(""))
            .await
            .unwrap();

        assert_eq!(created.channel_type, None);
    }

    #[tokio::test]
    async fn test_list_page_size_is_clamped_and_validated() {
        let (svc, _) = setup();
        for i in 0..3 {
            svc.create_mapping("admin", MappingDraft::new(format!("op-{i}"), "p"))
                .await
                .unwrap();
        }

        let page = svc
            .list_mappings(&ListQuery::new().with_page(0, 10_000))
            .await
            .unwrap();
        assert_eq!(page.page_size, 200);
        assert_eq!(page.total_count, 3);

        let err = svc
            .list_mappings(&ListQuery::new().with_page(0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, error::DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_list_rejects_page_offset_overflow() {
        let (svc, _) = setup();

        let err = svc
            .list_mappings(&ListQuery::new().with_page(u64::MAX / 2, 50))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            error::DomainError::Validation { ref field, .. } if field == "page"
        ));
    }

    #[tokio::test]
    async fn test_cached_resolution_expires_at_effective_to() {
        let (svc, repo) = setup();
        let ends_at = OffsetDateTime::now_utc() + time::Duration::milliseconds(300);
        svc.create_mapping(
            "admin",
            MappingDraft::new("pay", "closing").with_window(None, Some(ends_at)),
        )
        .await
        .unwrap();
        let request = ResolveRequest::new("pay");

        assert_eq!(
            process_of(&svc.resolve(&request).await.unwrap()),
            Some("closing")
        );
        assert_eq!(
            process_of(&svc.resolve(&request).await.unwrap()),
            Some("closing")
        );
        assert_eq!(repo.lookups(), 1);

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(svc.resolve(&request).await.unwrap(), Resolution::NotFound);
        assert_eq!(repo.lookups(), 2);
    }

    #[tokio::test]
    async fn test_cached_resolution_expires_at_effective_from() {
        let (svc, repo) = setup();
        let tenant = Uuid::new_v4();
        let starts_at = OffsetDateTime::now_utc() + time::Duration::milliseconds(300);
        svc.create_mapping("admin", MappingDraft::new("pay", "default-pay"))
            .await
            .unwrap();
        svc.create_mapping(
            "admin",
            MappingDraft::new("pay", "tenant-pay")
                .with_tenant(tenant)
                .with_window(Some(starts_at), None),
        )
        .await
        .unwrap();
        let request = ResolveRequest::new("pay").with_tenant(tenant);

        assert_eq!(
            process_of(&svc.resolve(&request).await.unwrap()),
            Some("default-pay")
        );

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(
            process_of(&svc.resolve(&request).await.unwrap()),
            Some("tenant-pay")
        );
        assert_eq!(repo.lookups(), 2);
    }

    #[tokio::test]
    async fn test_unbounded_resolution_stays_cached() {
        let (svc, repo) = setup();
        let tenant = Uuid::new_v4();
        svc.create_mapping("admin", MappingDraft::new("pay", "default-pay"))
            .await
            .unwrap();
        // Another tenant's window does not shorten this tenant's entry.
        svc.create_mapping(
            "admin",
            MappingDraft::new("pay", "other-pay")
                .with_tenant(Uuid::new_v4())
                .with_window(
                    None,
                    Some(OffsetDateTime::now_utc() + time::Duration::milliseconds(100)),
                ),
        )
        .await
        .unwrap();
        let request = ResolveRequest::new("pay").with_tenant(tenant);

        svc.resolve(&request).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        svc.resolve(&request).await.unwrap();

        assert_eq!(repo.lookups(), 1);
    }

    #[tokio::test]
    async fn test_update_moving_mapping_between_tenants_refreshes_both() {
        let (svc, _) = setup();
        let t1 = Uuid::new_v4();
        let t2 = Uuid::new_v4();
        svc.create_mapping("admin", MappingDraft::new("pay", "default-pay"))
            .await
            .unwrap();
        let moved = svc
            .create_mapping(
                "admin",
                MappingDraft::new("pay", "moved-pay").with_tenant(t1),
            )
            .await
            .unwrap();
        let t1_request = ResolveRequest::new("pay").with_tenant(t1);
        let t2_request = ResolveRequest::new("pay").with_tenant(t2);
        assert_eq!(
            process_of(&svc.resolve(&t1_request).await.unwrap()),
            Some("moved-pay")
        );
        assert_eq!(
            process_of(&svc.resolve(&t2_request).await.unwrap()),
            Some("default-pay")
        );

        svc.update_mapping(
            "admin",
            moved.id,
            moved.version,
            MappingDraft::new("pay", "moved-pay").with_tenant(t2),
        )
        .await
        .unwrap();

        assert_eq!(
            process_of(&svc.resolve(&t1_request).await.unwrap()),
            Some("default-pay")
        );
        assert_eq!(
            process_of(&svc.resolve(&t2_request).await.unwrap()),
            Some("moved-pay")
        );
    }

    #[tokio::test]
    async fn test_vanilla_delete_flushes_every_tenant() {
        let (svc, repo) = setup();
        let vanilla = svc
            .create_mapping("admin", MappingDraft::new("pay", "default-pay"))
            .await
            .unwrap();
        let requests = [
            ResolveRequest::new("pay").with_tenant(Uuid::new_v4()),
            ResolveRequest::new("pay").with_tenant(Uuid::new_v4()),
            ResolveRequest::new("pay"),
        ];
        for request in &requests {
            assert!(svc.resolve(request).await.unwrap().is_found());
        }
        assert_eq!(repo.lookups(), 3);

        svc.delete_mapping(vanilla.id, vanilla.version)
            .await
            .unwrap();

        for request in &requests {
            assert_eq!(svc.resolve(request).await.unwrap(), Resolution::NotFound);
        }
        assert_eq!(repo.lookups(), 6);
    }
}
