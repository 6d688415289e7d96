//! Process Mapping SDK
//!
//! This crate provides the public API for the process-mapping module:
//! - `ProcessMappingApi` trait for inter-module communication
//! - Model types (`ApiProcessMapping`, `ResolveRequest`, `Resolution`, ...)
//! - Error type (`ProcessMappingError`)
//!
//! Consumers obtain the client from the module handle:
//! ```ignore
//! let client = module.client();
//! let resolution = client
//!     .resolve(&ResolveRequest::new("payments.transfer").with_tenant(tenant_id))
//!     .await?;
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod models;

pub use api::ProcessMappingApi;
pub use error::ProcessMappingError;
pub use models::{
    ApiProcessMapping, ListQuery, MappingDraft, MappingFilter, MappingId, Page, Resolution,
    ResolveRequest, TenantId, TenantScope,
};
