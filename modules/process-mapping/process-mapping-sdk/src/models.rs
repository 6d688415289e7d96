//! Public models for the process-mapping module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the process-mapping module and its consumers.

use time::OffsetDateTime;
use uuid::Uuid;

/// Tenant identifier.
pub type TenantId = Uuid;

/// Mapping identifier.
pub type MappingId = Uuid;

/// Default number of items per page when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// Routes an API operation to the backend process plugin that executes it.
///
/// Scope keys (`tenant_id`, `product_id`, `channel_type`) narrow the mapping;
/// an absent key acts as a wildcard. A mapping without a tenant is a vanilla
/// mapping and applies to every tenant as the fallback tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiProcessMapping {
    pub id: MappingId,
    pub tenant_id: Option<TenantId>,
    pub product_id: Option<String>,
    pub channel_type: Option<String>,
    pub operation_id: String,
    pub api_path: Option<String>,
    pub http_method: Option<String>,
    pub process_id: String,
    /// `None` means the latest process version.
    pub process_version: Option<String>,
    /// Lower value wins among mappings of equal specificity.
    pub priority: i32,
    pub effective_from: Option<OffsetDateTime>,
    pub effective_to: Option<OffsetDateTime>,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    /// Optimistic-lock version, bumped on every successful update.
    pub version: i32,
}

impl ApiProcessMapping {
    /// Returns `true` if the mapping has no tenant scope.
    #[must_use]
    pub fn is_vanilla(&self) -> bool {
        self.tenant_id.is_none()
    }

    /// Channel type, with an empty string treated as absent.
    #[must_use]
    pub fn channel(&self) -> Option<&str> {
        self.channel_type.as_deref().filter(|c| !c.is_empty())
    }
}

/// Writable fields of a mapping, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingDraft {
    pub tenant_id: Option<TenantId>,
    pub product_id: Option<String>,
    pub channel_type: Option<String>,
    pub operation_id: String,
    pub api_path: Option<String>,
    pub http_method: Option<String>,
    pub process_id: String,
    pub process_version: Option<String>,
    pub priority: i32,
    pub effective_from: Option<OffsetDateTime>,
    pub effective_to: Option<OffsetDateTime>,
    pub is_active: bool,
}

impl MappingDraft {
    /// Creates an active, unscoped draft with priority 100.
    #[must_use]
    pub fn new(operation_id: impl Into<String>, process_id: impl Into<String>) -> Self {
        Self {
            tenant_id: None,
            product_id: None,
            channel_type: None,
            operation_id: operation_id.into(),
            api_path: None,
            http_method: None,
            process_id: process_id.into(),
            process_version: None,
            priority: 100,
            effective_from: None,
            effective_to: None,
            is_active: true,
        }
    }

    #[must_use]
    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    #[must_use]
    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel_type: impl Into<String>) -> Self {
        self.channel_type = Some(channel_type.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_window(
        mut self,
        effective_from: Option<OffsetDateTime>,
        effective_to: Option<OffsetDateTime>,
    ) -> Self {
        self.effective_from = effective_from;
        self.effective_to = effective_to;
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Context of a resolve call.
///
/// `operation_id` is required; the scope keys are optional and an absent key
/// means "no tenant/product/channel context".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolveRequest {
    pub tenant_id: Option<TenantId>,
    pub operation_id: String,
    pub product_id: Option<String>,
    pub channel_type: Option<String>,
}

impl ResolveRequest {
    #[must_use]
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            tenant_id: None,
            operation_id: operation_id.into(),
            product_id: None,
            channel_type: None,
        }
    }

    #[must_use]
    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    #[must_use]
    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel_type: impl Into<String>) -> Self {
        self.channel_type = Some(channel_type.into());
        self
    }

    /// Channel type, with an empty string treated as absent.
    #[must_use]
    pub fn channel(&self) -> Option<&str> {
        self.channel_type.as_deref().filter(|c| !c.is_empty())
    }
}

/// Outcome of a resolve call. `NotFound` is a regular result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ApiProcessMapping),
    NotFound,
}

impl Resolution {
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    #[must_use]
    pub fn mapping(&self) -> Option<&ApiProcessMapping> {
        match self {
            Self::Found(mapping) => Some(mapping),
            Self::NotFound => None,
        }
    }

    #[must_use]
    pub fn into_mapping(self) -> Option<ApiProcessMapping> {
        match self {
            Self::Found(mapping) => Some(mapping),
            Self::NotFound => None,
        }
    }
}

/// Tenant scope used when filtering mapping listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Only mappings without a tenant.
    Vanilla,
    /// Only mappings of the given tenant.
    Tenant(TenantId),
}

/// Predicate for mapping listings. Unset fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingFilter {
    pub tenant: Option<TenantScope>,
    pub operation_id: Option<String>,
    pub process_id: Option<String>,
    pub is_active: Option<bool>,
}

/// Paged listing request. Pages are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: MappingFilter,
    pub page: u64,
    pub page_size: u64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: MappingFilter::default(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_filter(mut self, filter: MappingFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u64, page_size: u64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn empty(page: u64, page_size: u64) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page,
            page_size,
        }
    }
}
