//! CLI subcommands: onboard, catalog, init, config, and config loading.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::services::{InMemoryBackend, RestBackend, Services};

/// Read configuration from `config_path` or the default locations, without validating
pub(crate) fn read_config(config_path: Option<&Path>, offline: bool) -> Result<Config> {
    let mut config = if let Some(path) = config_path {
        tracing::info!("Loading configuration from custom path: {:?}", path);
        Config::load_from_path(path)?
    } else {
        Config::load()?
    };

    if offline {
        config.backend.offline = true;
    }
    Ok(config)
}

/// Read and validate configuration
pub(crate) fn load_config(config_path: Option<&Path>, offline: bool) -> Result<Config> {
    let config = read_config(config_path, offline)?;
    config.validate()?;
    Ok(config)
}

/// Build the collaborators the wizard talks to
pub(crate) fn build_services(config: &Config) -> Result<Services> {
    if config.backend.offline {
        tracing::info!("Offline mode: using in-memory backend");
        return Ok(Services::from_backend(Arc::new(InMemoryBackend::new())));
    }

    let backend = RestBackend::new(
        &config.backend.url,
        config.backend.api_key.as_deref().unwrap_or_default(),
        config.backend.timeout(),
    )
    .context("Failed to create backend client")?
    .with_notify_function(config.collections.notify_function.clone());

    tracing::info!(url = backend.base_url(), "Using hosted backend");
    Ok(Services::from_backend(Arc::new(backend)))
}

/// Launch the TUI wizard
pub(crate) async fn cmd_onboard(config: &Config) -> Result<()> {
    let services = build_services(config)?;
    crate::tui::run(config, services).await
}

/// Print the public catalog
pub(crate) async fn cmd_catalog(config: &Config, json: bool) -> Result<()> {
    let services = build_services(config)?;
    let items = services
        .catalog
        .fetch_all(&config.collections.catalog)
        .await
        .context("Failed to fetch catalog")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No coupons available right now.");
        return Ok(());
    }
    for item in &items {
        println!("{} {}  [{}]", item.icon, item.title, item.id);
        if !item.description.is_empty() {
            println!("    {}", item.description);
        }
    }
    Ok(())
}

/// Write a default configuration file to `path`
pub(crate) fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            path.display()
        );
    }

    Config::default().save(path)?;

    println!("Configuration initialized at: {}", path.display());
    println!("\nNext steps:");
    println!("   1. Set backend.url and backend.api_key (or NEIGHBORHUB_BACKEND_URL / NEIGHBORHUB_API_KEY)");
    println!("   2. Run 'neighborhub' to start the wizard, or 'neighborhub --offline' to try it locally");
    Ok(())
}

/// Print the effective configuration with secrets hidden
pub(crate) fn cmd_config(config: &Config) -> Result<()> {
    let shown = toml::to_string_pretty(&config.redacted())
        .context("Failed to serialize config to TOML")?;
    println!("{}", shown);
    Ok(())
}
