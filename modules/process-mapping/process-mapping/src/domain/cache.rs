//! Resolution cache port.
//!
//! The resolver is stateless; caching of its results is owned by the service
//! through this trait. Implementations live in `infra::cache`.

use std::time::Duration;

use async_trait::async_trait;
use process_mapping_sdk::{Resolution, ResolveRequest, TenantId};

/// Cache key: the full resolve context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    pub tenant_id: Option<TenantId>,
    pub operation_id: String,
    pub product_id: Option<String>,
    pub channel_type: Option<String>,
}

impl From<&ResolveRequest> for ResolutionKey {
    fn from(request: &ResolveRequest) -> Self {
        Self {
            tenant_id: request.tenant_id,
            operation_id: request.operation_id.clone(),
            product_id: request.product_id.clone(),
            channel_type: request.channel().map(str::to_owned),
        }
    }
}

/// Opaque invalidation epoch observed before a lookup.
///
/// A value computed under an older epoch must not survive in the cache once
/// an invalidation has happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEpoch(pub u64);

#[async_trait]
pub trait ResolutionCache: Send + Sync {
    /// Current invalidation epoch; read it before fetching from storage.
    fn epoch(&self) -> CacheEpoch;

    async fn get(&self, key: &ResolutionKey) -> Option<Resolution>;

    /// Stores `value` unless an invalidation happened after `observed`.
    ///
    /// `max_lifetime` shortens the entry's lifetime below the configured TTL,
    /// e.g. up to the next effective-window boundary of a candidate.
    async fn put(
        &self,
        key: ResolutionKey,
        value: Resolution,
        observed: CacheEpoch,
        max_lifetime: Option<Duration>,
    );

    /// Drops entries of one tenant, or every entry for `None`.
    fn invalidate(&self, tenant_id: Option<TenantId>);
}
