//! Error types for the feature-layer client.

use thiserror::Error;

/// Errors that can occur while talking to the feature service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// Request could not be sent or the response body could not be read
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Service answered 200 with an embedded error object
    #[error("Feature service error {code}: {message}")]
    Remote { code: i64, message: String },

    /// Response body was not the expected JSON
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Endpoint could not be turned into a request URL
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}

impl From<crate::feature::RemoteError> for ServiceError {
    fn from(e: crate::feature::RemoteError) -> Self {
        ServiceError::Remote {
            code: e.code,
            message: e.message,
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Decode(e.to_string())
    }
}
