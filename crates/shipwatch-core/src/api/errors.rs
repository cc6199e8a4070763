use crate::errors::ShipwatchError;

/// Failures from a single remote API call.
///
/// `Clone` so the last error can be published in a shared snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}

impl ApiError {
    /// HTTP status for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl ShipwatchError for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Http { .. } => "API_HTTP_ERROR",
            ApiError::Transport { .. } => "API_TRANSPORT_ERROR",
            ApiError::Decode { .. } => "API_DECODE_ERROR",
            ApiError::ClientBuild { .. } => "API_CLIENT_BUILD_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        // 401/403: bad or under-privileged token
        matches!(self, ApiError::Http { status, .. } if *status == 401 || *status == 403)
    }
}
