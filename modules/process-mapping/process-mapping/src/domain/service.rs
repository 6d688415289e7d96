//! Domain service for process mappings.
//!
//! Resolution follows the cache-aside pattern: look up the cache, fall back
//! to storage + [`resolver::select`], then store the result. A cached result
//! never outlives the next effective-window boundary of its candidates, and
//! every write invalidates the cache scope it touched.

use std::sync::Arc;
use std::time::Duration;

use process_mapping_sdk::{
    ApiProcessMapping, ListQuery, MappingDraft, MappingId, Page, Resolution, ResolveRequest,
    TenantId,
};
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use super::cache::{ResolutionCache, ResolutionKey};
use super::error::DomainError;
use super::repo::MappingRepository;
use super::resolver;

pub struct ServiceConfig {
    pub max_field_length: usize,
    pub max_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_field_length: 255,
            max_page_size: 200,
        }
    }
}

pub struct Service {
    repo: Arc<dyn MappingRepository>,
    cache: Arc<dyn ResolutionCache>,
    config: ServiceConfig,
}

impl Service {
    #[must_use]
    pub fn new(
        repo: Arc<dyn MappingRepository>,
        cache: Arc<dyn ResolutionCache>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            cache,
            config,
        }
    }

    /// Resolve the mapping for `request`, consulting the cache first.
    ///
    /// # Errors
    ///
    /// - `Validation` if `operation_id` is blank
    /// - `Storage` if fetching candidates fails
    #[tracing::instrument(skip_all, fields(
        operation_id = %request.operation_id,
        tenant_id = ?request.tenant_id
    ))]
    pub async fn resolve(&self, request: &ResolveRequest) -> Result<Resolution, DomainError> {
        validate_operation_id(&request.operation_id)?;

        let key = ResolutionKey::from(request);
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Cache hit for process mapping resolution");
            return Ok(cached);
        }

        let epoch = self.cache.epoch();
        let (resolution, boundary) = self
            .evaluate(request, OffsetDateTime::now_utc())
            .await?;

        let max_lifetime = boundary.map(|at| {
            Duration::try_from(at - OffsetDateTime::now_utc()).unwrap_or(Duration::ZERO)
        });
        if let Some(lifetime) = max_lifetime {
            debug!(?lifetime, "Resolution expires at next effective-window boundary");
        }
        self.cache
            .put(key, resolution.clone(), epoch, max_lifetime)
            .await;

        Ok(resolution)
    }

    /// Resolve against storage as of `now`, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Same as [`Service::resolve`].
    pub async fn resolve_at(
        &self,
        request: &ResolveRequest,
        now: OffsetDateTime,
    ) -> Result<Resolution, DomainError> {
        validate_operation_id(&request.operation_id)?;
        let (resolution, _) = self.evaluate(request, now).await?;
        Ok(resolution)
    }

    /// Selects the mapping as of `now`, along with the next instant at which
    /// a candidate enters or leaves its window.
    async fn evaluate(
        &self,
        request: &ResolveRequest,
        now: OffsetDateTime,
    ) -> Result<(Resolution, Option<OffsetDateTime>), DomainError> {
        let candidates = self
            .repo
            .find_active_by_operation(&request.operation_id)
            .await?;
        debug!(candidates = candidates.len(), "Loaded candidate mappings");

        let boundary = resolver::next_boundary(&candidates, request, now);
        Ok((resolver::select(candidates, request, now), boundary))
    }

    /// Drop cached resolutions for `tenant_id`, or all of them for `None`.
    pub fn invalidate(&self, tenant_id: Option<TenantId>) {
        info!(tenant_id = ?tenant_id, "Invalidating process mapping cache");
        self.cache.invalidate(tenant_id);
    }

    /// # Errors
    ///
    /// `NotFound` if no mapping has this id.
    pub async fn get_mapping(&self, id: MappingId) -> Result<ApiProcessMapping, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))
    }

    /// # Errors
    ///
    /// `Validation` for a zero page size or a page whose offset does not fit
    /// a signed 64-bit row offset; storage errors otherwise.
    pub async fn list_mappings(
        &self,
        query: &ListQuery,
    ) -> Result<Page<ApiProcessMapping>, DomainError> {
        if query.page_size == 0 {
            return Err(DomainError::validation("page_size", "must be positive"));
        }
        let mut query = query.clone();
        query.page_size = query.page_size.min(self.config.max_page_size);

        let offset_in_range = query
            .page
            .checked_mul(query.page_size)
            .and_then(|offset| offset.checked_add(query.page_size))
            .is_some_and(|end| i64::try_from(end).is_ok());
        if !offset_in_range {
            return Err(DomainError::validation("page", "offset out of range"));
        }

        self.repo.list_page(&query).await
    }

    /// # Errors
    ///
    /// `Validation` if the draft is malformed.
    #[tracing::instrument(skip_all, fields(
        operation_id = %draft.operation_id,
        tenant_id = ?draft.tenant_id
    ))]
    pub async fn create_mapping(
        &self,
        actor: &str,
        draft: MappingDraft,
    ) -> Result<ApiProcessMapping, DomainError> {
        self.create_mapping_with_id(actor, Uuid::new_v4(), draft).await
    }

    /// Create a mapping under a caller-chosen id, e.g. when seeding from
    /// configuration.
    ///
    /// # Errors
    ///
    /// `Validation` if the draft is malformed; storage errors otherwise.
    pub async fn create_mapping_with_id(
        &self,
        actor: &str,
        id: MappingId,
        draft: MappingDraft,
    ) -> Result<ApiProcessMapping, DomainError> {
        let draft = self.validate_draft(draft)?;
        let now = OffsetDateTime::now_utc();

        let mapping = from_draft(id, draft, actor, now);
        let created = self.repo.insert(mapping).await?;
        info!(
            mapping_id = %created.id,
            process_id = %created.process_id,
            "Created process mapping"
        );

        self.invalidate(created.tenant_id);
        Ok(created)
    }

    /// # Errors
    ///
    /// - `NotFound` if the mapping does not exist
    /// - `VersionConflict` if it changed since `expected_version`
    /// - `Validation` if the draft is malformed
    #[tracing::instrument(skip_all, fields(mapping_id = %id, expected_version))]
    pub async fn update_mapping(
        &self,
        actor: &str,
        id: MappingId,
        expected_version: i32,
        draft: MappingDraft,
    ) -> Result<ApiProcessMapping, DomainError> {
        let draft = self.validate_draft(draft)?;
        let existing = self.get_mapping(id).await?;
        if existing.version != expected_version {
            return Err(DomainError::version_conflict(id, expected_version));
        }
        let next_version = expected_version
            .checked_add(1)
            .ok_or_else(|| DomainError::version_conflict(id, expected_version))?;

        let now = OffsetDateTime::now_utc();
        let mut mapping = from_draft(id, draft, actor, now);
        mapping.created_by = existing.created_by;
        mapping.created_at = existing.created_at;
        mapping.version = next_version;

        let updated = self.repo.update(mapping, expected_version).await?;
        info!(version = updated.version, "Updated process mapping");

        self.invalidate_scopes(existing.tenant_id, updated.tenant_id);
        Ok(updated)
    }

    /// # Errors
    ///
    /// - `NotFound` if the mapping does not exist
    /// - `VersionConflict` if it changed since `expected_version`
    #[tracing::instrument(skip_all, fields(mapping_id = %id, expected_version))]
    pub async fn delete_mapping(
        &self,
        id: MappingId,
        expected_version: i32,
    ) -> Result<(), DomainError> {
        let existing = self.get_mapping(id).await?;
        if existing.version != expected_version {
            return Err(DomainError::version_conflict(id, expected_version));
        }

        self.repo.delete(id, expected_version).await?;
        info!("Deleted process mapping");

        self.invalidate(existing.tenant_id);
        Ok(())
    }

    /// A write that moved a mapping between tenants affects both scopes.
    fn invalidate_scopes(&self, before: Option<TenantId>, after: Option<TenantId>) {
        match (before, after) {
            (Some(a), Some(b)) if a != b => {
                self.invalidate(Some(a));
                self.invalidate(Some(b));
            }
            (Some(tenant), Some(_)) => self.invalidate(Some(tenant)),
            _ => self.invalidate(None),
        }
    }

    fn validate_draft(&self, mut draft: MappingDraft) -> Result<MappingDraft, DomainError> {
        validate_operation_id(&draft.operation_id)?;
        if draft.process_id.trim().is_empty() {
            return Err(DomainError::validation("process_id", "must not be blank"));
        }

        draft.channel_type = draft.channel_type.filter(|c| !c.is_empty());

        let fields = [
            ("operation_id", Some(draft.operation_id.as_str())),
            ("process_id", Some(draft.process_id.as_str())),
            ("product_id", draft.product_id.as_deref()),
            ("channel_type", draft.channel_type.as_deref()),
            ("api_path", draft.api_path.as_deref()),
            ("http_method", draft.http_method.as_deref()),
            ("process_version", draft.process_version.as_deref()),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                self.validate_length(field, value)?;
            }
        }

        if let (Some(from), Some(to)) = (draft.effective_from, draft.effective_to)
            && from >= to
        {
            return Err(DomainError::validation(
                "effective_to",
                "must be later than effective_from",
            ));
        }

        Ok(draft)
    }

    fn validate_length(&self, field: &str, value: &str) -> Result<(), DomainError> {
        if value.len() > self.config.max_field_length {
            return Err(DomainError::validation(
                field,
                format!("exceeds maximum length of {}", self.config.max_field_length),
            ));
        }
        Ok(())
    }
}

fn validate_operation_id(operation_id: &str) -> Result<(), DomainError> {
    if operation_id.trim().is_empty() {
        return Err(DomainError::validation("operation_id", "must not be blank"));
    }
    Ok(())
}

fn from_draft(
    id: MappingId,
    draft: MappingDraft,
    actor: &str,
    now: OffsetDateTime,
) -> ApiProcessMapping {
    ApiProcessMapping {
        id,
        tenant_id: draft.tenant_id,
        product_id: draft.product_id,
        channel_type: draft.channel_type,
        operation_id: draft.operation_id,
        api_path: draft.api_path,
        http_method: draft.http_method,
        process_id: draft.process_id,
        process_version: draft.process_version,
        priority: draft.priority,
        effective_from: draft.effective_from,
        effective_to: draft.effective_to,
        is_active: draft.is_active,
        created_by: Some(actor.to_owned()),
        updated_by: Some(actor.to_owned()),
        created_at: now,
        updated_at: now,
        version: 1,
    }
}
