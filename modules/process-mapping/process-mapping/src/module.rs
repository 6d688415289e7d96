//! Module wiring: storage, cache and service assembled from configuration.

use std::sync::Arc;

use anyhow::Context;
use process_mapping_sdk::ProcessMappingApi;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info, warn};

use crate::config::{DatabaseConfig, MappingSeedConfig, ProcessMappingConfig};
use crate::domain::error::DomainError;
use crate::domain::repo::MappingRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::infra::cache;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{InMemoryMappingRepository, SeaOrmMappingRepository};

/// Actor recorded on mappings seeded from configuration.
pub const SEED_ACTOR: &str = "config";

/// Process mapping module.
///
/// Owns the domain service and exposes it through [`ProcessMappingApi`].
pub struct ProcessMappingModule {
    service: Arc<Service>,
    client: Arc<dyn ProcessMappingApi>,
}

impl ProcessMappingModule {
    /// Builds the module and seeds mappings declared in configuration.
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be opened or migrated, or if a seed
    /// mapping is rejected.
    pub async fn init(cfg: &ProcessMappingConfig) -> anyhow::Result<Self> {
        info!("Initializing process_mapping module");
        debug!(
            cache_enabled = cfg.cache.enabled,
            cache_ttl = ?cfg.cache.ttl,
            cache_max_entries = cfg.cache.max_entries,
            seeds = cfg.mappings.len(),
            "Loaded process_mapping config"
        );

        let persistent = cfg.database.is_some();
        let repo: Arc<dyn MappingRepository> = match &cfg.database {
            Some(db_cfg) => Arc::new(SeaOrmMappingRepository::new(connect(db_cfg).await?)),
            None => Arc::new(InMemoryMappingRepository::new()),
        };

        let service = Arc::new(Service::new(
            repo,
            cache::from_config(&cfg.cache),
            ServiceConfig {
                max_field_length: cfg.max_field_length,
                max_page_size: cfg.max_page_size,
            },
        ));

        seed_mappings(&service, &cfg.mappings, persistent).await?;

        let client: Arc<dyn ProcessMappingApi> =
            Arc::new(crate::local_client::LocalClient::new(service.clone()));

        info!("Process mapping module initialized");
        Ok(Self { service, client })
    }

    #[must_use]
    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn ProcessMappingApi> {
        self.client.clone()
    }
}

/// Stores seed mappings. With persistent storage a seed whose id is already
/// stored is left untouched, so restarts do not overwrite edits.
async fn seed_mappings(
    service: &Service,
    seeds: &[MappingSeedConfig],
    persistent: bool,
) -> anyhow::Result<()> {
    for seed in seeds {
        let id = match seed.id {
            Some(id) => id,
            None if persistent => {
                warn!(
                    operation_id = %seed.operation_id,
                    "Skipping seed mapping without id: persistent storage needs a stable id"
                );
                continue;
            }
            None => uuid::Uuid::new_v4(),
        };
        if persistent {
            match service.get_mapping(id).await {
                Ok(_) => {
                    debug!(mapping_id = %id, "Seed mapping already stored");
                    continue;
                }
                Err(DomainError::NotFound { .. }) => {}
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("failed to look up seed mapping {id}"));
                }
            }
        }
        service
            .create_mapping_with_id(SEED_ACTOR, id, seed.to_draft())
            .await
            .with_context(|| format!("invalid seed mapping for '{}'", seed.operation_id))?;
    }
    Ok(())
}

async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<sea_orm::DatabaseConnection> {
    let db = sea_orm::Database::connect(cfg.dsn.as_str())
        .await
        .context("failed to connect to process mapping database")?;
    if cfg.run_migrations {
        Migrator::up(&db, None)
            .await
            .context("failed to run process mapping migrations")?;
    }
    Ok(db)
}
