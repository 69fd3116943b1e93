//! Command handlers -- one module per subcommand

pub mod config;
pub mod modules;
pub mod render;

use std::path::Path;

use tracing::{info, warn};

use loghint_core::config::LoghintConfig;
use loghint_core::error::{ConfigError, LoghintError};
use loghint_hints::{ModuleLoader, StaticModuleRegistry};

use crate::error::CliError;

/// Load the configuration, falling back to defaults when the file does not exist.
///
/// Environment overrides apply in both cases.
pub async fn load_config_or_default(config_path: &Path) -> Result<LoghintConfig, CliError> {
    match LoghintConfig::load(config_path).await {
        Ok(config) => Ok(config),
        Err(LoghintError::Config(ConfigError::FileNotFound { path })) => {
            warn!(path = %path, "config file not found, using defaults");
            let mut config = LoghintConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
        Err(e) => Err(e.into()),
    }
}

/// Load module manifests from `dir`.
///
/// A missing directory yields an empty registry so that rendering still works
/// for events without module hints.
pub async fn load_registry(dir: &Path) -> Result<StaticModuleRegistry, CliError> {
    if !tokio::fs::try_exists(dir).await? {
        warn!(dir = %dir.display(), "module directory not found, no modules available");
        return Ok(StaticModuleRegistry::new());
    }

    let registry = ModuleLoader::load_directory(dir).await?;
    info!(dir = %dir.display(), modules = registry.len(), "module registry ready");
    Ok(registry)
}
