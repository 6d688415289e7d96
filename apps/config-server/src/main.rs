mod config;
mod logging;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use process_mapping::{
    ApiProcessMapping, ListQuery, MappingFilter, ProcessMappingModule, Resolution,
    ResolveRequest, TenantScope,
};
use provider_config_sdk::{ConfigValue, merged_parameters};
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::config::AppConfig;

/// Provider configuration server
#[derive(Parser)]
#[command(name = "config-server")]
#[command(about = "Provider configuration server: process mapping resolution and config checks")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and seed mappings, then exit
    Check,
    /// Resolve the process mapping for an operation
    Resolve {
        #[arg(long)]
        operation: String,
        #[arg(long)]
        tenant: Option<Uuid>,
        #[arg(long)]
        product: Option<String>,
        #[arg(long)]
        channel: Option<String>,
    },
    /// List stored mappings
    List {
        /// Tenant id, or `vanilla` for tenant-agnostic mappings
        #[arg(long, value_parser = parse_tenant_scope)]
        tenant: Option<TenantScope>,
        #[arg(long)]
        operation: Option<String>,
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: u64,
        #[arg(long, default_value_t = process_mapping_sdk::models::DEFAULT_PAGE_SIZE)]
        page_size: u64,
    },
    /// Show the effective parameters of a provider
    Provider {
        #[arg(long)]
        code: String,
        #[arg(long)]
        tenant: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !path.is_file()
    {
        bail!("config file does not exist: {}", path.display());
    }

    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    logging::init_logging(&config.logging, cli.verbose)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => check_config(&config).await,
        Commands::Resolve {
            operation,
            tenant,
            product,
            channel,
        } => {
            let request = ResolveRequest {
                tenant_id: tenant,
                operation_id: operation,
                product_id: product,
                channel_type: channel,
            };
            resolve(&config, &request).await
        }
        Commands::List {
            tenant,
            operation,
            page,
            page_size,
        } => {
            let filter = MappingFilter {
                tenant,
                operation_id: operation,
                ..MappingFilter::default()
            };
            let query = ListQuery::new()
                .with_filter(filter)
                .with_page(page, page_size);
            list(&config, &query).await
        }
        Commands::Provider { code, tenant } => show_provider(&config, &code, tenant),
    }
}

async fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    let module = ProcessMappingModule::init(&config.process_mapping).await?;
    let stored = module
        .client()
        .list_mappings(&ListQuery::new().with_page(0, 1))
        .await?
        .total_count;

    let secret_refs: usize = config.providers.iter().map(|p| p.secret_refs().count()).sum();

    println!("Configuration is valid");
    println!(
        "{}",
        json!({
            "mappings": stored,
            "cache_enabled": config.process_mapping.cache.enabled,
            "persistent_storage": config.process_mapping.database.is_some(),
            "providers": config.providers.len(),
            "secret_refs": secret_refs,
        })
    );
    Ok(())
}

async fn resolve(config: &AppConfig, request: &ResolveRequest) -> Result<()> {
    let module = ProcessMappingModule::init(&config.process_mapping).await?;
    let output = match module.client().resolve(request).await? {
        Resolution::Found(mapping) => json!({
            "status": "found",
            "mapping": mapping_json(&mapping),
        }),
        Resolution::NotFound => json!({ "status": "not_found" }),
    };
    println!("{output}");
    Ok(())
}

async fn list(config: &AppConfig, query: &ListQuery) -> Result<()> {
    let module = ProcessMappingModule::init(&config.process_mapping).await?;
    let page = module.client().list_mappings(query).await?;
    let items: Vec<Value> = page.items.iter().map(mapping_json).collect();
    println!(
        "{}",
        json!({
            "items": items,
            "total_count": page.total_count,
            "page": page.page,
            "page_size": page.page_size,
        })
    );
    Ok(())
}

fn show_provider(config: &AppConfig, code: &str, tenant: Option<Uuid>) -> Result<()> {
    if !config.providers.iter().any(|p| p.provider_code == code) {
        bail!("unknown provider: {code}");
    }
    let merged = merged_parameters(&config.providers, code, tenant);
    let parameters: serde_json::Map<String, Value> = merged
        .into_iter()
        .map(|(name, value)| {
            let rendered = match value {
                ConfigValue::Secret(vault_ref) => json!({ "vault_ref": vault_ref.to_string() }),
                ConfigValue::Plaintext(value) => json!({ "plaintext": value }),
            };
            (name, rendered)
        })
        .collect();

    println!(
        "{}",
        json!({
            "provider_code": code,
            "tenant_id": tenant,
            "parameters": parameters,
        })
    );
    Ok(())
}

fn mapping_json(mapping: &ApiProcessMapping) -> Value {
    json!({
        "id": mapping.id,
        "tenant_id": mapping.tenant_id,
        "product_id": mapping.product_id,
        "channel_type": mapping.channel_type,
        "operation_id": mapping.operation_id,
        "api_path": mapping.api_path,
        "http_method": mapping.http_method,
        "process_id": mapping.process_id,
        "process_version": mapping.process_version,
        "priority": mapping.priority,
        "effective_from": mapping.effective_from.and_then(rfc3339),
        "effective_to": mapping.effective_to.and_then(rfc3339),
        "is_active": mapping.is_active,
        "version": mapping.version,
    })
}

fn rfc3339(ts: OffsetDateTime) -> Option<String> {
    ts.format(&Rfc3339).ok()
}

fn parse_tenant_scope(raw: &str) -> Result<TenantScope, String> {
    if raw.eq_ignore_ascii_case("vanilla") {
        return Ok(TenantScope::Vanilla);
    }
    Uuid::parse_str(raw)
        .map(TenantScope::Tenant)
        .map_err(|e| format!("expected a tenant UUID or 'vanilla': {e}"))
}
