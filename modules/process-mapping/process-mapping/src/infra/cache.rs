//! Resolution cache implementations.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use process_mapping_sdk::{Resolution, TenantId};
use tracing::warn;

use crate::config::CacheConfig;
use crate::domain::cache::{CacheEpoch, ResolutionCache, ResolutionKey};

/// Builds the cache selected by configuration.
#[must_use]
pub fn from_config(cfg: &CacheConfig) -> Arc<dyn ResolutionCache> {
    if cfg.enabled {
        Arc::new(MokaResolutionCache::new(cfg.ttl, cfg.max_entries))
    } else {
        Arc::new(NoopResolutionCache)
    }
}

#[derive(Clone)]
struct CachedResolution {
    resolution: Resolution,
    max_lifetime: Option<Duration>,
}

/// Per-entry expiry; the cache-wide TTL still applies on top of it.
struct WindowBoundaryExpiry;

impl Expiry<ResolutionKey, CachedResolution> for WindowBoundaryExpiry {
    fn expire_after_create(
        &self,
        _key: &ResolutionKey,
        value: &CachedResolution,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.max_lifetime
    }

    fn expire_after_update(
        &self,
        _key: &ResolutionKey,
        value: &CachedResolution,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.max_lifetime
    }
}

/// In-memory cache with TTL and capacity eviction.
pub struct MokaResolutionCache {
    cache: Cache<ResolutionKey, CachedResolution>,
    epoch: AtomicU64,
}

impl MokaResolutionCache {
    #[must_use]
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .expire_after(WindowBoundaryExpiry)
            .support_invalidation_closures()
            .build();

        Self {
            cache,
            epoch: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl ResolutionCache for MokaResolutionCache {
    fn epoch(&self) -> CacheEpoch {
        CacheEpoch(self.epoch.load(Ordering::Acquire))
    }

    async fn get(&self, key: &ResolutionKey) -> Option<Resolution> {
        self.cache.get(key).await.map(|cached| cached.resolution)
    }

    async fn put(
        &self,
        key: ResolutionKey,
        value: Resolution,
        observed: CacheEpoch,
        max_lifetime: Option<Duration>,
    ) {
        if self.epoch() != observed || max_lifetime.is_some_and(|d| d.is_zero()) {
            return;
        }
        let cached = CachedResolution {
            resolution: value,
            max_lifetime,
        };
        self.cache.insert(key.clone(), cached).await;

        // An invalidation that raced with the insert may have registered its
        // predicate before the entry landed.
        if self.epoch() != observed {
            self.cache.invalidate(&key).await;
        }
    }

    fn invalidate(&self, tenant_id: Option<TenantId>) {
        self.epoch.fetch_add(1, Ordering::AcqRel);

        let Some(tenant_id) = tenant_id else {
            self.cache.invalidate_all();
            return;
        };

        if let Err(e) = self
            .cache
            .invalidate_entries_if(move |key, _| key.tenant_id == Some(tenant_id))
        {
            warn!(
                tenant_id = %tenant_id,
                error = %e,
                "Scoped cache invalidation unavailable, flushing entire cache"
            );
            self.cache.invalidate_all();
        }
    }
}

/// Cache that stores nothing; every resolve goes to storage.
pub struct NoopResolutionCache;

#[async_trait]
impl ResolutionCache for NoopResolutionCache {
    fn epoch(&self) -> CacheEpoch {
        CacheEpoch(0)
    }

    async fn get(&self, _key: &ResolutionKey) -> Option<Resolution> {
        None
    }

    async fn put(
        &self,
        _key: ResolutionKey,
        _value: Resolution,
        _observed: CacheEpoch,
        _max_lifetime: Option<Duration>,
    ) {
    }

    fn invalidate(&self, _tenant_id: Option<TenantId>) {}
}
