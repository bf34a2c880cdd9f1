//! Market data endpoints of the dashboard backend.

use std::collections::HashMap;

use crate::client::NepseClient;
use crate::error::{Error, Result};
use crate::types::{HistoryPayload, IndicatorsPayload, SecurityRecord};

/// Market data API.
#[derive(Debug, Clone)]
pub struct MarketApi {
    client: NepseClient,
}

impl MarketApi {
    /// Create a new Market API instance.
    pub fn new(client: NepseClient) -> Self {
        Self { client }
    }

    /// Get the full list of listed securities.
    ///
    /// # Example
    /// ```ignore
    /// let client = NepseClient::public()?;
    /// let market = MarketApi::new(client);
    /// let securities = market.security_list().await?;
    /// ```
    pub async fn security_list(&self) -> Result<Vec<SecurityRecord>> {
        self.client.get("/SecurityList", None).await
    }

    /// Get daily OHLC history for a security.
    ///
    /// # Arguments
    /// * `security_id` - Stable security identifier
    pub async fn ta_history(&self, security_id: i64) -> Result<HistoryPayload> {
        let mut params = HashMap::new();
        params.insert("securityId".to_string(), security_id.to_string());

        self.client.get("/api/ta/history", Some(params)).await
    }

    /// Get indicator series for a security.
    ///
    /// Keys are normalized to lowercase, deduplicated and joined with
    /// commas, matching the backend's request contract. An empty key list
    /// is rejected locally rather than falling through to the backend's
    /// "all indicators" default.
    ///
    /// # Arguments
    /// * `security_id` - Stable security identifier
    /// * `indicators` - Indicator keys (e.g., `["sma20", "rsi14"]`)
    pub async fn ta_indicators(
        &self,
        security_id: i64,
        indicators: &[&str],
    ) -> Result<IndicatorsPayload> {
        if indicators.is_empty() {
            return Err(Error::InvalidParameter(
                "at least one indicator key is required".to_string(),
            ));
        }

        let mut keys: Vec<String> = indicators.iter().map(|k| k.to_lowercase()).collect();
        keys.sort();
        keys.dedup();

        let mut params = HashMap::new();
        params.insert("securityId".to_string(), security_id.to_string());
        params.insert("indicators".to_string(), keys.join(","));

        self.client.get("/api/ta/indicators", Some(params)).await
    }
}

#[cfg(test)]
mod tests {
    // Endpoint tests against a live backend live in tests/integration_tests.rs.
}
