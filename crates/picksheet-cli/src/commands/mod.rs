//! Subcommands and the helpers they share.

pub mod catalog;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use picksheet_core::catalog::Catalog;
use picksheet_core::models::config::ScanConfig;

/// `<config_dir>/picksheet/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("picksheet")
        .join("config.json")
}

/// The config file in use: the `--config` flag, or the default location.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the configuration.
///
/// An explicit `--config` file must exist; the default file is optional.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ScanConfig> {
    if let Some(path) = config_path {
        let path = Path::new(path);
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        debug!("Loading config from {}", path.display());
        return Ok(ScanConfig::from_file(path)?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(ScanConfig::from_file(&path)?)
    } else {
        Ok(ScanConfig::default())
    }
}

/// Load the catalog: an explicit file, then the configured one, then the builtin one.
///
/// Load warnings are logged by the catalog loader.
pub fn load_catalog(explicit: Option<&Path>, config: &ScanConfig) -> anyhow::Result<Catalog> {
    let Some(path) = explicit.or(config.catalog.path.as_deref()) else {
        debug!("Using builtin catalog");
        return Ok(Catalog::builtin());
    };

    if !path.exists() {
        anyhow::bail!("Catalog file not found: {}", path.display());
    }

    let (catalog, warnings) = Catalog::from_path(path)?;
    debug!(
        "Loaded {} catalog entries from {} ({} warnings)",
        catalog.len(),
        path.display(),
        warnings.len()
    );

    Ok(catalog)
}
