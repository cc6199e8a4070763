use crate::api::ApiError;
use crate::errors::ShipwatchError;

/// Failure of a whole aggregation cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error(
        "No API token configured. Set SHIPWATCH_TOKEN or add `token` under [api] in ~/.shipwatch/config.toml"
    )]
    MissingToken,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ShipwatchError for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            FetchError::MissingToken => "MISSING_TOKEN",
            FetchError::Api(inner) => inner.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            FetchError::MissingToken => true,
            FetchError::Api(inner) => inner.is_user_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_user_error() {
        let error = FetchError::MissingToken;
        assert_eq!(error.error_code(), "MISSING_TOKEN");
        assert!(error.is_user_error());
        assert!(error.to_string().starts_with("No API token configured"));
    }

    #[test]
    fn test_api_error_is_transparent() {
        let inner = ApiError::Http {
            status: 500,
            body: "boom".to_string(),
        };
        let error = FetchError::from(inner.clone());
        assert_eq!(error.to_string(), inner.to_string());
        assert_eq!(error.error_code(), "API_HTTP_ERROR");
        assert!(!error.is_user_error());
    }
}
