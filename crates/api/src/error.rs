use thiserror::Error;

use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("Invalid request path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    #[error("Authentication failed ({status}): {body}")]
    Auth { status: u16, body: String },

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        ApiError::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Auth { status, .. } | ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether repeating the same request could succeed. The client never
    /// retries on its own; this is a hint for callers layering a policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(TransportError::Build(_)) => false,
            ApiError::Network(_) => true,
            ApiError::Api { status, .. } if *status >= 500 => true,
            _ => false,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::Auth { .. } => {
                Some("Verify your username and password using: beanstalk whoami")
            }
            ApiError::Network(TransportError::Build(_)) => {
                Some("Check the configured user agent and content type")
            }
            ApiError::Network(_) => Some("Check your network connection or try again later"),
            ApiError::Api { status: 404, .. } => Some("Check if the resource ID is correct"),
            ApiError::Api { status, .. } if *status >= 500 => {
                Some("The Beanstalk API is having trouble, try again later")
            }
            ApiError::Decode(_) => {
                Some("The response did not match the expected shape; the API may have changed")
            }
            ApiError::Config(_) => Some("Review the base URL configured for this profile"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
