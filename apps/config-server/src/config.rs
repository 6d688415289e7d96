//! Layered application configuration.
//!
//! Precedence, lowest first: built-in defaults, the YAML file passed with
//! `--config`, then `APP__*` environment variables with `__` as the nesting
//! separator (e.g. `APP__PROCESS_MAPPING__CACHE__TTL=5m`).

use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use process_mapping::config::ProcessMappingConfig;
use provider_config_sdk::ProviderConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "APP__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub process_mapping: ProcessMappingConfig,
    /// Provider configurations; values are validated while loading.
    pub providers: Vec<ProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset, e.g. `info` or
    /// `process_mapping=debug,info`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads the layered configuration.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be parsed or a value has the wrong shape.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")
    }
}
