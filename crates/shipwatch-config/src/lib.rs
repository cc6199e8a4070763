//! # shipwatch-config
//!
//! TOML configuration types, loading, and validation for shipwatch.
//!
//! Single source of truth for `ShipwatchConfig` and the scope/project
//! selectors derived from it. Depends only on `shipwatch-paths`.

mod loading;
mod validation;

pub mod errors;
pub mod types;

// Public API re-exports
pub use errors::ConfigError;
pub use loading::{
    TOKEN_ENV_VAR, apply_env_overrides, config_file_paths, load_from_paths, load_hierarchy,
    merge_configs,
};
pub use types::{
    ApiConfig, EnvironmentToggles, FilterConfig, PERSONAL_SCOPE, PollingConfig, ProjectSelector,
    ScopeConfig, ScopeId, ScopeSelector, ShipwatchConfig, StateToggles,
};
pub use validation::{MAX_DURATION_SECS, validate_config};

impl ShipwatchConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self)
    }
}
