//! Process Mapping Module Implementation
//!
//! Resolves which backend process plugin handles an API operation for a
//! tenant/product/channel context. The public API is defined in
//! `process-mapping-sdk` and re-exported here.

pub use process_mapping_sdk::{
    ApiProcessMapping, ListQuery, MappingDraft, MappingFilter, Page, ProcessMappingApi,
    ProcessMappingError, Resolution, ResolveRequest, TenantScope,
};

pub mod module;
pub use module::ProcessMappingModule;

pub mod local_client;

#[doc(hidden)]
pub mod config;
#[cfg(test)]
mod config_tests;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
