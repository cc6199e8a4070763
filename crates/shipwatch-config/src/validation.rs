//! Configuration validation logic.

use crate::errors::ConfigError;
use crate::types::ShipwatchConfig;

/// Upper bound for poll intervals and HTTP timeouts: one day.
pub const MAX_DURATION_SECS: u64 = 86_400;

/// Validate a ShipwatchConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - Poll intervals and HTTP timeouts must be positive and at most
///   [`MAX_DURATION_SECS`]
/// - The API base URL must use http or https
pub fn validate_config(config: &ShipwatchConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("polling.idle_interval_secs", config.polling.idle_interval_secs),
        (
            "polling.active_interval_secs",
            config.polling.active_interval_secs,
        ),
        ("api.connect_timeout_secs", config.api.connect_timeout_secs),
        ("api.request_timeout_secs", config.api.request_timeout_secs),
    ] {
        match value {
            Some(0) => {
                return Err(ConfigError::InvalidConfiguration {
                    message: format!("{} must be greater than 0", name),
                });
            }
            Some(secs) if secs > MAX_DURATION_SECS => {
                return Err(ConfigError::InvalidConfiguration {
                    message: format!(
                        "{} must be at most {} (got {})",
                        name, MAX_DURATION_SECS, secs
                    ),
                });
            }
            _ => {}
        }
    }

    let base_url = config.api.base_url();
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "api.base_url '{}' must start with http:// or https://",
                base_url
            ),
        });
    }

    Ok(())
}
