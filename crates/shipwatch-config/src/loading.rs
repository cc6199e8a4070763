//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.shipwatch/config.toml`
//! 3. **Project config** - `./.shipwatch/config.toml`
//! 4. **Environment** - `SHIPWATCH_TOKEN` replaces the token
//! 5. **CLI arguments** - Command-line flags (highest priority)

use crate::errors::ConfigError;
use crate::types::{ApiConfig, FilterConfig, PollingConfig, ScopeConfig, ShipwatchConfig};
use crate::validation::validate_config;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable that overrides `[api] token`.
pub const TOKEN_ENV_VAR: &str = "SHIPWATCH_TOKEN";

/// Config files consulted by [`load_hierarchy`], lowest priority first.
pub fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);

    match shipwatch_paths::ShipwatchPaths::resolve() {
        Ok(p) => paths.push(p.user_config()),
        Err(e) => warn!(event = "config.paths.user_unresolved", error = %e),
    }

    match std::env::current_dir() {
        Ok(dir) => paths.push(shipwatch_paths::ShipwatchPaths::project_config(&dir)),
        Err(e) => warn!(event = "config.paths.cwd_unresolved", error = %e),
    }

    paths
}

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a file exists but cannot be read or parsed, or if
/// validation fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<ShipwatchConfig, ConfigError> {
    load_from_paths(&config_file_paths())
}

/// Load and merge the given files in order, then apply env overrides and validate.
pub fn load_from_paths(paths: &[PathBuf]) -> Result<ShipwatchConfig, ConfigError> {
    let mut config = ShipwatchConfig::default();

    for path in paths {
        match load_config_file(path) {
            Ok(file_config) => {
                debug!(event = "config.file.loaded", path = %path.display());
                config = merge_configs(config, file_config);
            }
            Err(ConfigError::IoError { source }) if source.kind() == std::io::ErrorKind::NotFound => {
                debug!(event = "config.file.absent", path = %path.display());
            }
            Err(e) => return Err(e),
        }
    }

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load a configuration file from the given path.
fn load_config_file(path: &Path) -> Result<ShipwatchConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|e| std::io::Error::new(e.kind(), format!("'{}': {}", path.display(), e)))?;
    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("'{}': {}", path.display(), e),
    })
}

/// Replace the token with `SHIPWATCH_TOKEN` when that variable is set and non-blank.
pub fn apply_env_overrides(config: &mut ShipwatchConfig) {
    if let Ok(token) = std::env::var(TOKEN_ENV_VAR)
        && !token.trim().is_empty()
    {
        config.api.token = Some(token);
    }
}

/// Merge two configurations, with override_config taking precedence.
///
/// Only values explicitly present in `override_config` replace base values.
/// Lists are replaced wholesale, never concatenated.
pub fn merge_configs(base: ShipwatchConfig, override_config: ShipwatchConfig) -> ShipwatchConfig {
    ShipwatchConfig {
        api: ApiConfig::merge(&base.api, &override_config.api),
        scope: ScopeConfig::merge(&base.scope, &override_config.scope),
        filter: FilterConfig::merge(&base.filter, &override_config.filter),
        polling: PollingConfig::merge(&base.polling, &override_config.polling),
    }
}
