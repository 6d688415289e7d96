//! Configuration for the process-mapping module.

use std::time::Duration;

use process_mapping_sdk::{MappingDraft, TenantId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Module configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessMappingConfig {
    /// Resolution cache settings.
    pub cache: CacheConfig,

    /// Database connection. When absent, mappings live in memory and are
    /// seeded from `mappings`.
    pub database: Option<DatabaseConfig>,

    /// Static mappings loaded at startup.
    pub mappings: Vec<MappingSeedConfig>,

    /// Upper bound for free-text mapping fields.
    pub max_field_length: usize,

    /// Upper bound for listing page sizes.
    pub max_page_size: u64,
}

impl Default for ProcessMappingConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            database: None,
            mappings: Vec::new(),
            max_field_length: default_max_field_length(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_max_field_length() -> usize {
    255
}

fn default_max_page_size() -> u64 {
    200
}

/// Resolution cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Disable to resolve against storage on every call.
    pub enabled: bool,

    /// Time-to-live for cached resolutions.
    #[serde(with = "humantime_duration")]
    pub ttl: Duration,

    /// Maximum number of cached resolutions.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(60),
            max_entries: 10_000,
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection string, e.g. `sqlite://mappings.db?mode=rwc`.
    pub dsn: String,

    /// Apply pending migrations on startup.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_run_migrations() -> bool {
    true
}

/// A mapping declared in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingSeedConfig {
    /// Stable id; generated when omitted.
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub channel_type: Option<String>,
    pub operation_id: String,
    #[serde(default)]
    pub api_path: Option<String>,
    #[serde(default)]
    pub http_method: Option<String>,
    pub process_id: String,
    #[serde(default)]
    pub process_version: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub effective_from: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub effective_to: Option<OffsetDateTime>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_priority() -> i32 {
    100
}

fn default_is_active() -> bool {
    true
}

impl MappingSeedConfig {
    #[must_use]
    pub fn to_draft(&self) -> MappingDraft {
        MappingDraft {
            tenant_id: self.tenant_id,
            product_id: self.product_id.clone(),
            channel_type: self.channel_type.clone(),
            operation_id: self.operation_id.clone(),
            api_path: self.api_path.clone(),
            http_method: self.http_method.clone(),
            process_id: self.process_id.clone(),
            process_version: self.process_version.clone(),
            priority: self.priority,
            effective_from: self.effective_from,
            effective_to: self.effective_to,
            is_active: self.is_active,
        }
    }
}

/// Serde support for human-readable durations such as `"5m"` or `"250ms"`.
mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(de::Error::custom)
    }
}
