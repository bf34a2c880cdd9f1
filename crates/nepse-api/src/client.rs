//! HTTP client for the NEPSE dashboard backend.

use reqwest::{Client, Response};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ApiError, Error, Result};

/// HTTP client for making requests to the dashboard backend.
///
/// All endpoints are public and read-only; there is no signing and no
/// built-in retry. Every method issues exactly one request.
#[derive(Debug, Clone)]
pub struct NepseClient {
    config: Arc<Config>,
    http: Client,
}

impl NepseClient {
    /// Create a new client with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        url::Url::parse(&config.base_url)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// Create a client with the default configuration.
    pub fn public() -> Result<Self> {
        Self::new(Config::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Make a GET request and deserialize the JSON response.
    pub async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<HashMap<String, String>>,
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, endpoint);

        let mut request = self.http.get(&url);
        if let Some(params) = params {
            request = request.query(&params);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle the backend response.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T> {
        let status = response.status();

        // The backend rate-limits per client with HTTP 429 and a
        // Retry-After header in seconds.
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .map(|s: u64| s * 1000);

            return Err(Error::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
                let mut err = ApiError::new(status.as_u16(), envelope.error);
                if let Some(details) = envelope.details {
                    err = err.with_details(details);
                }
                return Err(Error::Api(err));
            }

            return Err(Error::Api(ApiError::new(
                status.as_u16(),
                format!("HTTP {status}: {body}"),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse response: {}", body);
            Error::Json(e)
        })
    }
}

/// Error envelope returned by the backend on failed requests.
#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_client_creation() {
        let client = NepseClient::public().unwrap();
        assert_eq!(client.config().base_url, crate::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_error_envelope_parsing() {
        let envelope: ErrorEnvelope =
            serde_json::from_str(r#"{"error": "Unable to fetch TA history", "details": "boom"}"#)
                .unwrap();
        assert_eq!(envelope.error, "Unable to fetch TA history");
        assert_eq!(envelope.details.as_deref(), Some("boom"));
    }

    #[test]
    fn test_error_envelope_without_details() {
        let envelope: ErrorEnvelope =
            serde_json::from_str(r#"{"error": "securityId must be an integer"}"#).unwrap();
        assert!(envelope.details.is_none());
    }
}
