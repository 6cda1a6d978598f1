//! Backend request errors.

use std::path::PathBuf;

/// Errors that can occur while talking to the analysis backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: &'static str, message: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid backend URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Short message for the user-facing banner.
    pub fn banner_message(&self) -> String {
        match self {
            ApiError::Network(e) if e.is_timeout() => "The backend did not answer in time.".to_string(),
            ApiError::Network(_) => "Could not reach the backend.".to_string(),
            ApiError::Status { status, .. } => format!("The backend reported an error ({status})."),
            ApiError::Decode { endpoint, .. } => format!("The backend sent an unexpected reply to {endpoint}."),
            ApiError::Io { path, .. } => format!("Could not read {}.", path.display()),
            ApiError::InvalidBaseUrl(url) => format!("Invalid backend URL: {url}"),
        }
    }
}

/// Result type for backend operations.
pub type ApiResult<T> = Result<T, ApiError>;
