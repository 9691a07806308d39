use thiserror::Error;

/// Failures at the REST boundary.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request failed with status {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The text shown to the admin: the backend's `message` when it sent one,
    /// otherwise the caller's generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status { message: Some(message), .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Failures surfaced by a list resource handle.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResourceError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),
    #[error("Invalid value for filter {field}: {reason}")]
    InvalidFilter { field: String, reason: String },
    #[error("Action cancelled: {0}")]
    Cancelled(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable '{0}'")]
    Missing(String),
    #[error("Invalid value for '{name}': {reason}")]
    Invalid { name: String, reason: String },
}
