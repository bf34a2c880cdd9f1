//! Error types for the NEPSE dashboard API client.

use std::fmt;

/// Result type alias for NEPSE API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the NEPSE dashboard API client.
#[derive(Debug)]
pub enum Error {
    /// HTTP request failed
    Http(reqwest::Error),
    /// JSON serialization/deserialization error
    Json(serde_json::Error),
    /// Backend returned an error response
    Api(ApiError),
    /// Rate limit exceeded (HTTP 429 from the backend)
    RateLimited {
        /// Retry after this many milliseconds (if provided)
        retry_after_ms: Option<u64>,
    },
    /// Invalid parameter provided
    InvalidParameter(String),
    /// URL parsing error
    UrlParse(url::ParseError),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::UrlParse(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
            Error::Api(e) => write!(f, "API error: {e}"),
            Error::RateLimited { retry_after_ms } => {
                if let Some(ms) = retry_after_ms {
                    write!(f, "Rate limited, retry after {ms}ms")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {msg}"),
            Error::UrlParse(e) => write!(f, "URL parse error: {e}"),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::UrlParse(err)
    }
}

/// Error envelope returned by the dashboard backend.
///
/// The backend answers failed requests with a JSON body of the shape
/// `{"error": "...", "details": "...", "status": ..., "invalid": [...]}`
/// where every field but `error` is optional.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Error message from the backend.
    pub message: String,
    /// Optional detail string (upstream exception text, invalid keys, ...).
    pub details: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "[{}] {}: {}", self.status, self.message, details),
            None => write!(f, "[{}] {}", self.status, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Attach a detail string.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Check if this error came from the upstream exchange rather than the
    /// dashboard backend itself.
    pub fn is_upstream(&self) -> bool {
        self.status == 502
    }

    /// Check if this is a client-side request error.
    pub fn is_bad_request(&self) -> bool {
        self.status == 400
    }
}
