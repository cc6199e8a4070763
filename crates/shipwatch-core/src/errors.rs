use std::error::Error;

/// Base trait for all application errors
pub trait ShipwatchError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type ShipwatchResult<T> = Result<T, Box<dyn ShipwatchError>>;

impl ShipwatchError for shipwatch_config::ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            shipwatch_config::ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            shipwatch_config::ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            shipwatch_config::ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            shipwatch_config::ConfigError::ConfigParseError { .. }
                | shipwatch_config::ConfigError::InvalidConfiguration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipwatch_result() {
        let _result: ShipwatchResult<i32> = Ok(42);
    }

    #[test]
    fn test_config_parse_error() {
        let error = shipwatch_config::ConfigError::ConfigParseError {
            message: "invalid TOML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse config file: invalid TOML syntax"
        );
        assert_eq!(error.error_code(), "CONFIG_PARSE_ERROR");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_config_io_error_is_not_user_error() {
        let error = shipwatch_config::ConfigError::IoError {
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(error.error_code(), "CONFIG_IO_ERROR");
        assert!(!error.is_user_error());
    }
}
