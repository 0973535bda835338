//! Error types for stream resolution and relaying

use axum::http::StatusCode;
use serde_json::{json, Value};

/// Result type alias for stream operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or relaying a stream
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source or station code missing from the request
    #[error("Source and code are required")]
    BadRequest,

    /// Source identifier is not one of the known sources
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// The scanner page could not be fetched
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// The scanner page was fetched but carries no stream URL
    #[error("Stream URL not found for station: {0}")]
    StreamUrlNotFound(String),

    /// The resolved audio URL could not be fetched or has no body
    #[error("{0}")]
    UpstreamFetchFailed(String),

    /// Anything else (misconfiguration, HTTP client setup...)
    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// Create an internal error from a string
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status this error maps to on the relay endpoints
    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest | Error::UnknownSource(_) => StatusCode::BAD_REQUEST,
            Error::StreamUrlNotFound(_) => StatusCode::NOT_FOUND,
            Error::UpstreamUnavailable(_) | Error::UpstreamFetchFailed(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON body returned to the client
    ///
    /// Client errors carry only a message; upstream and internal failures
    /// carry a generic message plus the underlying failure in `details`.
    pub fn body(&self) -> Value {
        match self {
            Error::BadRequest | Error::UnknownSource(_) => json!({ "error": self.to_string() }),
            Error::StreamUrlNotFound(_) => {
                json!({ "error": "Stream URL not found in radioscanner page" })
            }
            Error::UpstreamUnavailable(details)
            | Error::UpstreamFetchFailed(details)
            | Error::Internal(details) => json!({
                "error": "Failed to proxy stream",
                "details": details,
            }),
        }
    }

    /// JSON body of the one-segment `/api/stream-proxy/{code}` route
    ///
    /// That route predates the two-segment form and never exposes details.
    pub fn legacy_body(&self) -> Value {
        match self {
            Error::BadRequest => json!({ "error": "Station code is required" }),
            Error::UnknownSource(_) => json!({ "error": self.to_string() }),
            Error::StreamUrlNotFound(_) => json!({ "error": "Stream URL not found" }),
            Error::UpstreamUnavailable(_) | Error::UpstreamFetchFailed(_) | Error::Internal(_) => {
                json!({ "error": "Failed to proxy stream" })
            }
        }
    }
}
