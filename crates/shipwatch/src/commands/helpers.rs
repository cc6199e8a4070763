use clap::ArgMatches;
use tracing::{error, warn};

use shipwatch_config::apply_env_overrides;
use shipwatch_core::{FetchError, ShipwatchConfig, ShipwatchError, VercelClient};

use crate::color;

/// Command-line scope overrides (`--team`, `--project`) as a partial config.
///
/// Fields stay `None` when a flag is absent so merging keeps the file values.
pub fn scope_overlay(matches: &ArgMatches) -> ShipwatchConfig {
    let mut overlay = ShipwatchConfig::default();
    if let Some(teams) = matches.get_many::<String>("team") {
        overlay.scope.teams = Some(teams.cloned().collect());
    }
    if let Some(projects) = matches.get_many::<String>("project") {
        overlay.scope.projects = Some(projects.cloned().collect());
    }
    overlay
}

/// Load configuration with warning on errors, then apply `overlay`.
///
/// Falls back to defaults (plus the token env var) if loading fails, but
/// notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
pub fn load_config_with_warning(overlay: ShipwatchConfig) -> ShipwatchConfig {
    let base = match ShipwatchConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{}",
                color::warning(&format!(
                    "Warning: Could not load config: {}. Using defaults.",
                    e
                ))
            );
            eprintln!(
                "{}",
                color::hint(
                    "Tip: Check ~/.shipwatch/config.toml and ./.shipwatch/config.toml for syntax errors."
                )
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            let mut config = ShipwatchConfig::default();
            apply_env_overrides(&mut config);
            config
        }
    };
    shipwatch_config::merge_configs(base, overlay)
}

pub fn build_client(config: &ShipwatchConfig) -> Result<VercelClient, Box<dyn std::error::Error>> {
    VercelClient::new(&config.api).map_err(|e| report_error("Failed to set up HTTP client", e))
}

pub fn require_token(config: &ShipwatchConfig) -> Result<&str, Box<dyn std::error::Error>> {
    config
        .api
        .token()
        .ok_or_else(|| report_error("Cannot reach the API", FetchError::MissingToken))
}

pub fn build_runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    tokio::runtime::Runtime::new().map_err(|e| {
        eprintln!("{}", color::error(&format!("Failed to start async runtime: {}", e)));
        error!(event = "cli.runtime.start_failed", error = %e);
        e.into()
    })
}

/// Print a failure for the user, log it, and hand it back boxed for `?`.
pub fn report_error<E: ShipwatchError>(context: &str, error: E) -> Box<dyn std::error::Error> {
    eprintln!("{}", color::error(&format!("{}: {}", context, error)));
    if let Some(tip) = tip_for(&error) {
        eprintln!("{}", color::hint(tip));
    }
    error!(
        event = "cli.command_failed",
        context = context,
        error_code = error.error_code(),
        error = %error
    );
    Box::new(error)
}

fn tip_for<E: ShipwatchError>(error: &E) -> Option<&'static str> {
    match error.error_code() {
        "API_HTTP_ERROR" if error.is_user_error() => {
            Some("Tip: Check that the token is valid and can access the configured teams.")
        }
        "API_TRANSPORT_ERROR" => Some("Tip: Check your network connection and [api] base_url."),
        _ => None,
    }
}
